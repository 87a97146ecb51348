//! Updates that need no decision
//!
//! With `eu_automerge` enabled, a candidate byte-identical to its original
//! is deleted without being shown to the operator. Any other difference,
//! comments included, is left for the menus.

use etcup_fs::NormalizedPath;
use etcup_fs::checksum::compute_file_checksum;

use crate::Result;
use crate::operator::{Notice, Operator};
use crate::task::ReconciliationTask;

/// A candidate deleted by [`apply_trivial`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrivialResolution {
    pub original: NormalizedPath,
    pub candidate: NormalizedPath,
}

/// Delete every candidate in `task` that is identical to its original.
/// Does nothing unless the configuration enables `eu_automerge`.
///
/// The original is never written, so the result is the same whichever
/// bulk override is in force.
///
/// # Errors
///
/// I/O errors while reading or deleting files abort the pass.
pub fn apply_trivial(
    task: &mut ReconciliationTask,
    operator: &mut dyn Operator,
) -> Result<Vec<TrivialResolution>> {
    let mut resolved = Vec::new();
    if !task.config().eu_automerge {
        return Ok(resolved);
    }

    for original in task.originals() {
        let candidates = task.candidates(&original).map(<[_]>::to_vec).unwrap_or_default();
        let original_abs = task.absolute(&original);
        for candidate in candidates {
            let candidate_abs = task.absolute(&candidate);
            if compute_file_checksum(&original_abs)? != compute_file_checksum(&candidate_abs)? {
                continue;
            }

            etcup_fs::io::remove_file(&candidate_abs)?;
            if !task.options().quiet {
                operator.notify(
                    Notice::Info,
                    &format!("Update {candidate} is identical to {original}. Removed."),
                );
            }

            task.resolve_candidate(&original, &candidate);
            resolved.push(TrivialResolution {
                original: original.clone(),
                candidate,
            });
        }
    }

    Ok(resolved)
}
