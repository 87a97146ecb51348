//! Working state for one reconciliation run

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use etcup_fs::NormalizedPath;

use crate::config::ReconciliationConfig;

/// Original file → staged candidates, in discovery order.
///
/// Keys iterate in path order, which keeps menu numbering stable between
/// redisplays.
pub type CandidateMap = BTreeMap<NormalizedPath, Vec<NormalizedPath>>;

/// Caller-supplied options for a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationOptions {
    /// Suppress progress notices
    pub quiet: bool,
    /// Root-relative protected paths (files or directories). Derived from
    /// the profile environment when empty.
    pub paths: Vec<String>,
    /// Root-relative paths merged without asking
    pub mask_paths: Vec<String>,
    /// Start the run with "merge all" already selected
    pub automerge_all: bool,
    /// Start the run with "discard all" already selected
    pub discard_all: bool,
}

/// Mutable state of a run: what is left to resolve and the bulk overrides.
///
/// A key is present if and only if it still has at least one unresolved
/// candidate. Candidate lists only ever shrink after the scan.
#[derive(Debug)]
pub struct ReconciliationTask {
    root: PathBuf,
    config: ReconciliationConfig,
    options: ReconciliationOptions,
    files: CandidateMap,
    /// Resolve every remaining candidate by replacing the original
    pub automerge_all: bool,
    /// Resolve every remaining candidate by deleting it
    pub discard_all: bool,
}

impl ReconciliationTask {
    /// Create a task over a scan result. Empty candidate lists are dropped.
    pub fn new(
        root: impl Into<PathBuf>,
        config: ReconciliationConfig,
        options: ReconciliationOptions,
        mut files: CandidateMap,
    ) -> Self {
        files.retain(|_, candidates| !candidates.is_empty());
        Self {
            root: root.into(),
            automerge_all: options.automerge_all,
            discard_all: options.discard_all,
            config,
            options,
            files,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ReconciliationConfig {
        &self.config
    }

    pub fn options(&self) -> &ReconciliationOptions {
        &self.options
    }

    /// Absolute location of a root-relative path.
    pub fn absolute(&self, path: &NormalizedPath) -> PathBuf {
        path.under_root(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of originals with unresolved candidates.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Snapshot of the originals still awaiting resolution, in menu order.
    pub fn originals(&self) -> Vec<NormalizedPath> {
        self.files.keys().cloned().collect()
    }

    pub fn contains(&self, original: &NormalizedPath) -> bool {
        self.files.contains_key(original)
    }

    /// Remaining candidates of `original`, in discovery order.
    pub fn candidates(&self, original: &NormalizedPath) -> Option<&[NormalizedPath]> {
        self.files.get(original).map(Vec::as_slice)
    }

    /// All unresolved candidates, grouped by original.
    pub fn iter(&self) -> impl Iterator<Item = (&NormalizedPath, &[NormalizedPath])> {
        self.files.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Mark `candidate` of `original` as resolved. Removes the original
    /// once its last candidate is gone.
    pub fn resolve_candidate(&mut self, original: &NormalizedPath, candidate: &NormalizedPath) {
        if let Some(candidates) = self.files.get_mut(original) {
            candidates.retain(|c| c != candidate);
            if candidates.is_empty() {
                self.files.remove(original);
            }
        }
    }

    /// Drop `original` and all of its candidates from the task.
    pub fn remove_original(&mut self, original: &NormalizedPath) -> Option<Vec<NormalizedPath>> {
        self.files.remove(original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn path(s: &str) -> NormalizedPath {
        NormalizedPath::new(s)
    }

    fn task_with(entries: &[(&str, &[&str])]) -> ReconciliationTask {
        let files = entries
            .iter()
            .map(|(orig, cands)| (path(orig), cands.iter().map(|c| path(c)).collect()))
            .collect();
        ReconciliationTask::new(
            "/tmp/root",
            ReconciliationConfig::default(),
            ReconciliationOptions::default(),
            files,
        )
    }

    #[test]
    fn resolving_last_candidate_removes_key() {
        let mut task = task_with(&[("/etc/a", &["/etc/._cfg0000_a", "/etc/._cfg0001_a"])]);
        let original = path("/etc/a");

        task.resolve_candidate(&original, &path("/etc/._cfg0000_a"));
        assert_eq!(task.candidates(&original).unwrap(), &[path("/etc/._cfg0001_a")]);

        task.resolve_candidate(&original, &path("/etc/._cfg0001_a"));
        assert!(!task.contains(&original));
        assert!(task.is_empty());
    }

    #[test]
    fn resolving_keeps_remaining_order() {
        let mut task = task_with(&[(
            "/etc/a",
            &["/etc/._cfg0000_a", "/etc/._cfg0001_a", "/etc/._cfg0002_a"],
        )]);
        let original = path("/etc/a");

        task.resolve_candidate(&original, &path("/etc/._cfg0001_a"));

        assert_eq!(
            task.candidates(&original).unwrap(),
            &[path("/etc/._cfg0000_a"), path("/etc/._cfg0002_a")]
        );
    }

    #[test]
    fn empty_candidate_lists_are_not_keys() {
        let task = task_with(&[("/etc/a", &[]), ("/etc/b", &["/etc/._cfg0000_b"])]);
        assert_eq!(task.originals(), vec![path("/etc/b")]);
    }

    #[test]
    fn originals_are_sorted() {
        let task = task_with(&[
            ("/etc/z.conf", &["/etc/._cfg0000_z.conf"]),
            ("/etc/a.conf", &["/etc/._cfg0000_a.conf"]),
        ]);
        assert_eq!(task.originals(), vec![path("/etc/a.conf"), path("/etc/z.conf")]);
    }

    #[test]
    fn options_seed_overrides() {
        let options = ReconciliationOptions {
            discard_all: true,
            ..Default::default()
        };
        let task = ReconciliationTask::new(
            "/",
            ReconciliationConfig::default(),
            options,
            CandidateMap::new(),
        );
        assert!(task.discard_all);
        assert!(!task.automerge_all);
    }

    #[test]
    fn absolute_joins_root() {
        let task = task_with(&[]);
        assert_eq!(task.absolute(&path("/etc/a")), PathBuf::from("/tmp/root/etc/a"));
    }
}
