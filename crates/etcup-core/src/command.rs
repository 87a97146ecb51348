//! External diff, merge and pager invocation
//!
//! Commands come from user templates such as `diff -uN %file1 %file2`. A
//! template is split on whitespace, placeholders are replaced with concrete
//! paths, the first token names the program (looked up in `PATH`) and the
//! rest are its arguments. No shell is involved: a diff shown through a
//! pager is two processes connected by a pipe.

use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};

use crate::{Error, Result};

/// How an exit status is judged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitPolicy {
    /// Only 0 is success
    Strict,
    /// diff/sdiff convention: 0 (same) and 1 (different) are success, 2
    /// and above mean trouble
    Comparison,
}

impl ExitPolicy {
    /// Policy for a merge program: `sdiff` exits 1 whenever the inputs
    /// differ, every other tool must exit 0.
    pub fn for_merge(program_name: &str) -> Self {
        if program_name == "sdiff" {
            Self::Comparison
        } else {
            Self::Strict
        }
    }

    /// Whether an exit code is acceptable. `None` (killed by a signal) never
    /// is.
    pub fn accepts(self, code: Option<i32>) -> bool {
        match (self, code) {
            (_, None) => false,
            (Self::Strict, Some(code)) => code == 0,
            (Self::Comparison, Some(code)) => code == 0 || code == 1,
        }
    }
}

/// A program and its arguments, ready to spawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
}

impl ExternalCommand {
    /// Build a command from `template`, replacing every placeholder in
    /// `substitutions` (e.g. `("%file1", path)`).
    ///
    /// Placeholders are substituted per whitespace-separated token, so a
    /// substituted path is always a single argument.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExternalCommand`] for a template with no tokens.
    pub fn from_template(template: &str, substitutions: &[(&str, &Path)]) -> Result<Self> {
        let mut tokens = template
            .split_whitespace()
            .map(|token| substitute(token, substitutions));
        let program = tokens
            .next()
            .ok_or_else(|| Error::external(template, "empty command"))?;
        Ok(Self {
            program,
            args: tokens.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Basename of the program, used to pick the exit policy.
    pub fn program_name(&self) -> &str {
        Path::new(&self.program)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.program)
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    fn spawn(&self, mut cmd: Command) -> Result<Child> {
        tracing::debug!(command = %self, "Spawning external command");
        cmd.spawn()
            .map_err(|e| Error::external(self.to_string(), format!("failed to start: {e}")))
    }

    fn check(&self, status: ExitStatus, policy: ExitPolicy) -> Result<()> {
        if policy.accepts(status.code()) {
            return Ok(());
        }
        let message = match status.code() {
            Some(code) => format!("exited with status {code}"),
            None => "terminated by signal".to_string(),
        };
        Err(Error::external(self.to_string(), message))
    }

    fn wait(&self, mut child: Child, policy: ExitPolicy) -> Result<()> {
        let status = child
            .wait()
            .map_err(|e| Error::external(self.to_string(), format!("failed to wait: {e}")))?;
        self.check(status, policy)
    }
}

impl std::fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

fn substitute(token: &str, substitutions: &[(&str, &Path)]) -> String {
    substitutions
        .iter()
        .fold(token.to_string(), |token, (placeholder, path)| {
            token.replace(placeholder, &path.to_string_lossy())
        })
}

fn diff_command(template: &str, file1: &Path, file2: &Path) -> Result<ExternalCommand> {
    ExternalCommand::from_template(template, &[("%file1", file1), ("%file2", file2)])
}

/// Run a diff with all output discarded; any non-zero exit fails.
///
/// Used for the startup sanity check against two identical files.
pub fn diff_quiet(template: &str, file1: &Path, file2: &Path) -> Result<()> {
    let diff = diff_command(template, file1, file2)?;
    let mut cmd = diff.command();
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    let child = diff.spawn(cmd)?;
    diff.wait(child, ExitPolicy::Strict)
}

/// Run a diff attached to the terminal, without a pager.
///
/// Used when the diff command is really an editor (`vim -d`), whose exit
/// status must be 0.
pub fn diff_attached(template: &str, file1: &Path, file2: &Path) -> Result<()> {
    let diff = diff_command(template, file1, file2)?;
    let child = diff.spawn(diff.command())?;
    diff.wait(child, ExitPolicy::Strict)
}

/// Run a diff and page its output: the diff's stdout feeds the pager's
/// stdin and both are awaited.
///
/// The pager must exit 0; the diff may report "different" (1) but not
/// trouble (2 and above).
pub fn diff_paged(template: &str, file1: &Path, file2: &Path, pager: &str) -> Result<()> {
    let diff = diff_command(template, file1, file2)?;
    let pager = ExternalCommand::from_template(pager, &[])?;

    let mut cmd = diff.command();
    cmd.stdin(Stdio::null()).stdout(Stdio::piped());
    let mut diff_child = diff.spawn(cmd)?;
    let output = diff_child
        .stdout
        .take()
        .ok_or_else(|| Error::external(diff.to_string(), "no output pipe"))?;

    let mut pager_cmd = pager.command();
    pager_cmd.stdin(Stdio::from(output));
    let pager_child = match pager.spawn(pager_cmd) {
        Ok(child) => child,
        Err(e) => {
            let _ = diff_child.kill();
            let _ = diff_child.wait();
            return Err(e);
        }
    };

    let paged = pager.wait(pager_child, ExitPolicy::Strict);
    let diffed = diff.wait(diff_child, ExitPolicy::Comparison);
    paged.and(diffed)
}

/// Run the merge tool writing its result to `merged`.
pub fn merge(template: &str, merged: &Path, original: &Path, new: &Path) -> Result<()> {
    let merge = ExternalCommand::from_template(
        template,
        &[("%merged", merged), ("%orig", original), ("%new", new)],
    )?;
    let policy = ExitPolicy::for_merge(merge.program_name());
    let child = merge.spawn(merge.command())?;
    merge.wait(child, policy)
}
