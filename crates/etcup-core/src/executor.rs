//! The actions that resolve a candidate
//!
//! Every action works on root-relative paths and reports what it did to the
//! operator. Nothing is rolled back: if a step fails, the error names the
//! path and the files stay as the failing step left them.

use std::path::{Path, PathBuf};

use etcup_fs::NormalizedPath;
use etcup_fs::io;

use crate::Result;
use crate::command;
use crate::config::{DEFAULT_DIFF_COMMAND, ReconciliationConfig};
use crate::operator::{Notice, Operator};

/// Question asked after the merge tool exits.
pub const MERGE_CONFIRMATION: &str = "Replace original with merged file? (yes|y|n|no): ";

/// Whether an action consumed the candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The candidate is gone from disk
    Resolved,
    /// The candidate is still there (e.g. a declined merge)
    Unresolved,
}

/// Runs replace, discard, merge and diff for one root.
#[derive(Debug, Clone)]
pub struct MergeExecutor {
    root: PathBuf,
    config: ReconciliationConfig,
    scratch_base: Option<PathBuf>,
}

impl MergeExecutor {
    pub fn new(
        root: impl Into<PathBuf>,
        config: ReconciliationConfig,
        scratch_base: Option<PathBuf>,
    ) -> Self {
        Self {
            root: root.into(),
            config,
            scratch_base,
        }
    }

    fn absolute(&self, path: &NormalizedPath) -> PathBuf {
        path.under_root(&self.root)
    }

    /// Move `candidate` over `original`, keeping the original's owner,
    /// group and mode.
    pub fn replace(
        &self,
        original: &NormalizedPath,
        candidate: &NormalizedPath,
        operator: &mut dyn Operator,
    ) -> Result<()> {
        io::replace_preserving(&self.absolute(original), &self.absolute(candidate))?;
        operator.notify(Notice::Success, &format!("Original file {original} replaced."));
        Ok(())
    }

    /// Delete `candidate`, leaving the original untouched.
    pub fn discard(&self, candidate: &NormalizedPath, operator: &mut dyn Operator) -> Result<()> {
        io::remove_file(&self.absolute(candidate))?;
        let name = candidate.file_name().unwrap_or(candidate.as_str());
        operator.notify(Notice::Success, &format!("File {name} deleted."));
        Ok(())
    }

    /// Produce a merged file with the configured tool, then ask whether it
    /// should replace the original.
    ///
    /// In editor mode the candidate is copied into the scratch directory and
    /// edited there against a copy of the original; the edited copy is the
    /// merge result. Otherwise the merge command writes the result itself.
    ///
    /// # Errors
    ///
    /// A failing external tool is returned as
    /// [`Error::ExternalCommand`](crate::Error::ExternalCommand) with the
    /// candidate untouched.
    pub fn merge(
        &self,
        original: &NormalizedPath,
        candidate: &NormalizedPath,
        operator: &mut dyn Operator,
    ) -> Result<ActionOutcome> {
        let original_abs = self.absolute(original);
        let candidate_abs = self.absolute(candidate);
        let scratch = io::scratch_dir(self.scratch_base.as_deref())?;

        let original_name = original.file_name().unwrap_or("original");
        let candidate_name = candidate.file_name().unwrap_or("update");
        let merged = scratch
            .path()
            .join(format!(".{original_name}-{candidate_name}-merged"));

        if self.config.using_editor {
            let copy = scratch.path().join(format!(".{original_name}-copy"));
            io::copy_file(&candidate_abs, &merged)?;
            io::copy_file(&original_abs, &copy)?;
            command::diff_attached(&self.config.diff_command, &copy, &merged)?;
        } else {
            command::merge(&self.config.merge_command, &merged, &original_abs, &candidate_abs)?;
        }

        if !operator.confirm(MERGE_CONFIRMATION)? {
            operator.notify(
                Notice::Info,
                &format!("Merge operation for file {original} cancelled."),
            );
            return Ok(ActionOutcome::Unresolved);
        }

        install_merged(&original_abs, &merged)?;
        io::remove_file(&candidate_abs)?;
        operator.notify(
            Notice::Success,
            &format!("File {original} replaced by merged file."),
        );
        Ok(ActionOutcome::Resolved)
    }

    /// Page the differences between `original` and `candidate`.
    ///
    /// Always uses the stock diff template: a configured `diff_command` may
    /// be an editor.
    pub fn show_diff(&self, original: &NormalizedPath, candidate: &NormalizedPath) -> Result<()> {
        command::diff_paged(
            DEFAULT_DIFF_COMMAND,
            &self.absolute(original),
            &self.absolute(candidate),
            &self.config.pager,
        )
    }
}

/// Copy the merge result over the original (the scratch directory may be
/// on another filesystem), then drop the merge result.
fn install_merged(original: &Path, merged: &Path) -> Result<()> {
    io::copy_preserving(original, merged)?;
    io::remove_file(merged)?;
    Ok(())
}
