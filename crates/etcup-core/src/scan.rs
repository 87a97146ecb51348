//! Discovery of staged replacement files
//!
//! Walks the protected paths beneath the scan root and groups every staged
//! replacement under the original it would replace. Staged files whose
//! original is gone are deleted on the spot.

use std::fs;
use std::path::{Path, PathBuf};

use etcup_fs::NormalizedPath;
use walkdir::WalkDir;

use crate::matcher;
use crate::task::CandidateMap;
use crate::{Error, Result};

/// What a scan found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Originals with at least one candidate
    pub files: CandidateMap,
    /// Staged files deleted because their original does not exist
    pub orphans_removed: Vec<NormalizedPath>,
}

/// Scan `paths` (root-relative files or directories) beneath `root`.
///
/// - symlinks named directly in `paths` are skipped, and directory walks
///   never follow symlinked directories
/// - paths that do not exist are skipped
/// - directory entries are visited depth-first in file name order, which
///   is also the order candidates are recorded in
///
/// # Errors
///
/// Any I/O error aborts the scan.
pub fn scan(root: &Path, paths: &[String]) -> Result<ScanOutcome> {
    let mut scanner = Scanner {
        root,
        outcome: ScanOutcome::default(),
    };

    for path in paths {
        let absolute = NormalizedPath::new(path).under_root(root);
        let metadata = match fs::symlink_metadata(&absolute) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %absolute.display(), "Path doesn't exist. Ignoring.");
                continue;
            }
            Err(e) => return Err(etcup_fs::Error::io(&absolute, e).into()),
        };

        if metadata.file_type().is_symlink() {
            tracing::debug!(path = %absolute.display(), "Skipping symlink");
        } else if metadata.is_dir() {
            scanner.scan_dir(&absolute)?;
        } else if metadata.is_file() {
            scanner.scan_original(&absolute)?;
        }
    }

    Ok(scanner.outcome)
}

struct Scanner<'a> {
    root: &'a Path,
    outcome: ScanOutcome,
}

impl Scanner<'_> {
    fn scan_dir(&mut self, dir: &Path) -> Result<()> {
        let walker = WalkDir::new(dir)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| walk_error(dir, e))?;
            if entry.file_type().is_dir() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            let Some(basename) = matcher::recognize(&file_name) else {
                continue;
            };
            let Some(parent) = entry.path().parent() else {
                continue;
            };

            let original = parent.join(basename);
            if original
                .try_exists()
                .map_err(|e| etcup_fs::Error::io(&original, e))?
            {
                self.scan_original(&original)?;
            } else {
                tracing::info!(file = %entry.path().display(), "Removing orphaned update");
                etcup_fs::io::remove_file(entry.path())?;
                self.outcome
                    .orphans_removed
                    .push(NormalizedPath::from_root(self.root, entry.path()));
            }
        }

        Ok(())
    }

    /// Record every staged replacement of `original` found next to it.
    /// An original already recorded is not listed again.
    fn scan_original(&mut self, original: &Path) -> Result<()> {
        let key = NormalizedPath::from_root(self.root, original);
        if self.outcome.files.contains_key(&key) {
            return Ok(());
        }
        if original.is_dir() {
            tracing::debug!(path = %original.display(), "Staged directory ignored");
            return Ok(());
        }

        let (Some(dir), Some(basename)) = (key.parent(), key.file_name()) else {
            return Err(Error::invalid_state(format!("{key} has no parent directory")));
        };
        let native_dir = dir.under_root(self.root);

        let mut names = Vec::new();
        for entry in fs::read_dir(&native_dir).map_err(|e| etcup_fs::Error::io(&native_dir, e))? {
            let entry = entry.map_err(|e| etcup_fs::Error::io(&native_dir, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| etcup_fs::Error::io(entry.path(), e))?;
            if file_type.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if matcher::is_candidate_for(&name, basename) {
                names.push(name);
            }
        }
        names.sort();

        tracing::debug!(original = %key, candidates = names.len(), "Scanned file");
        if !names.is_empty() {
            let candidates = names.iter().map(|name| dir.join(name)).collect();
            self.outcome.files.insert(key, candidates);
        }
        Ok(())
    }
}

fn walk_error(dir: &Path, err: walkdir::Error) -> Error {
    let path: PathBuf = err.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
    etcup_fs::Error::io(path, source).into()
}
