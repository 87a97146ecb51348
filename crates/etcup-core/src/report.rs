//! Summary of a reconciliation run

use serde::{Deserialize, Serialize};

use etcup_fs::NormalizedPath;

/// What a run did, by root-relative path.
///
/// `unresolved` lists the candidates still on disk when the run ended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// Originals overwritten by a candidate
    pub replaced: Vec<String>,
    /// Candidates deleted with the original kept
    pub discarded: Vec<String>,
    /// Originals overwritten by an accepted merge
    pub merged: Vec<String>,
    /// Masked originals resolved without asking
    pub masked: Vec<String>,
    /// Candidates deleted for being identical to their original
    pub trivial: Vec<String>,
    /// Staged files deleted because their original was missing
    pub orphans_removed: Vec<String>,
    pub unresolved: Vec<String>,
}

impl ReconcileReport {
    /// Whether the run changed anything on disk.
    pub fn is_noop(&self) -> bool {
        self.replaced.is_empty()
            && self.discarded.is_empty()
            && self.merged.is_empty()
            && self.masked.is_empty()
            && self.trivial.is_empty()
            && self.orphans_removed.is_empty()
    }

    pub(crate) fn paths(paths: &[NormalizedPath]) -> Vec<String> {
        paths.iter().map(ToString::to_string).collect()
    }
}
