//! Protect-masked files
//!
//! A masked original is never offered to the operator: every staged
//! candidate is moved over it in discovery order, so the last one wins.

use etcup_fs::NormalizedPath;

use crate::Result;
use crate::operator::{Notice, Operator};
use crate::task::ReconciliationTask;

/// Whether `path` names the same file as an entry of `mask_paths`.
///
/// Entries are normalized like scan keys, so `etc/local.conf` and
/// `/etc/local.conf/` both mask `/etc/local.conf`. There is no prefix or
/// glob matching: masking `/etc/env.d` does not mask `/etc/env.d/00basic`.
pub fn is_masked(path: &NormalizedPath, mask_paths: &[String]) -> bool {
    mask_paths.iter().any(|mask| NormalizedPath::new(mask) == *path)
}

/// Resolve every masked original in `task` without asking and drop it from
/// the task. Returns the originals that were resolved.
///
/// Ownership is not restored: a masked file is taken exactly as shipped.
///
/// # Errors
///
/// The first I/O failure aborts the pass.
pub fn apply_masking(
    task: &mut ReconciliationTask,
    operator: &mut dyn Operator,
) -> Result<Vec<NormalizedPath>> {
    let masked: Vec<NormalizedPath> = task
        .originals()
        .into_iter()
        .filter(|original| is_masked(original, &task.options().mask_paths))
        .collect();

    for original in &masked {
        let Some(candidates) = task.remove_original(original) else {
            continue;
        };
        if !task.options().quiet {
            operator.notify(
                Notice::Info,
                &format!("Automerging file {original} config protect masked."),
            );
        }

        let target = task.absolute(original);
        for candidate in &candidates {
            etcup_fs::io::overwrite(&target, &task.absolute(candidate))?;
            tracing::debug!(original = %original, candidate = %candidate, "Applied masked update");
        }
    }

    Ok(masked)
}
