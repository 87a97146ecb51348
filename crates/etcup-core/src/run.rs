//! One complete reconciliation run

use std::fs;
use std::path::Path;

use crate::command;
use crate::config::{ProtectPaths, ReconciliationConfig, RunEnvironment};
use crate::controller::ResolutionController;
use crate::executor::MergeExecutor;
use crate::mask::apply_masking;
use crate::operator::{Notice, Operator};
use crate::report::ReconcileReport;
use crate::scan::scan;
use crate::task::{ReconciliationOptions, ReconciliationTask};
use crate::trivial::apply_trivial;
use crate::{Error, Result};

/// Shown when there is nothing (left) to resolve.
pub const NOTHING_LEFT: &str = "Nothing left to do; exiting.";

/// Reconcile every staged update beneath `root`.
///
/// Startup order:
/// 1. load `etc/etc-update.conf` (a malformed file is reported and the
///    defaults are used) and reject the menu interface
/// 2. fold in `env`
/// 3. check the diff command on two identical files, unless it is an editor
/// 4. derive protect and mask paths from `etc/profile.env` when `options`
///    names no paths
///
/// Then: scan, resolve masked files, drop identical updates, and hand the
/// rest to the operator.
///
/// # Errors
///
/// Fails on I/O errors, operator input errors, an unsupported interface
/// mode and a diff command that does not work.
pub fn run(
    root: &Path,
    mut options: ReconciliationOptions,
    env: &RunEnvironment,
    operator: &mut dyn Operator,
) -> Result<ReconcileReport> {
    let config = ReconciliationConfig::load_from_root(root, operator);
    config.ensure_supported()?;
    let config = config.with_environment(env);
    tracing::debug!(?config, root = %root.display(), "Loaded configuration");

    if !config.using_editor {
        probe_diff(&config, env)?;
    }

    if options.paths.is_empty() {
        ProtectPaths::from_profile(root)?.apply_to(&mut options);
    }

    if !options.quiet {
        operator.notify(Notice::Info, "Scanning Configuration files...");
    }
    let outcome = scan(root, &options.paths)?;
    let orphans_removed = ReconcileReport::paths(&outcome.orphans_removed);

    let mut task = ReconciliationTask::new(root, config.clone(), options, outcome.files);
    if task.is_empty() {
        operator.notify(Notice::Info, NOTHING_LEFT);
        return Ok(ReconcileReport {
            orphans_removed,
            ..Default::default()
        });
    }
    tracing::info!(files = task.len(), "Found pending updates");

    let masked = apply_masking(&mut task, operator)?;
    let trivial = apply_trivial(&mut task, operator)?;

    let executor = MergeExecutor::new(root, config, env.scratch_base.clone());
    let mut report = ResolutionController::new(&mut task, executor, &mut *operator).run()?;
    report.masked = ReconcileReport::paths(&masked);
    report.trivial = trivial.iter().map(|t| t.candidate.to_string()).collect();
    report.orphans_removed = orphans_removed;

    operator.notify(Notice::Info, NOTHING_LEFT);
    Ok(report)
}

/// Run the diff command quietly on two identical files; it must exit 0.
fn probe_diff(config: &ReconciliationConfig, env: &RunEnvironment) -> Result<()> {
    let scratch = etcup_fs::io::scratch_dir(env.scratch_base.as_deref())?;
    let first = scratch.path().join("test1");
    let second = scratch.path().join("test2");
    for path in [&first, &second] {
        fs::write(path, "test").map_err(|e| etcup_fs::Error::io(path, e))?;
    }

    command::diff_quiet(&config.diff_command, &first, &second).map_err(|e| {
        tracing::debug!(error = %e, "Diff probe failed");
        Error::external(&config.diff_command, "does not seem to work, aborting")
    })
}
