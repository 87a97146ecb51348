//! Loading of the tool's own `etc-update.conf`

use std::path::Path;

use etcup_fs::{EnvMap, NormalizedPath, parse_env_file};

use super::RunEnvironment;
use crate::operator::{Notice, Operator};
use crate::{Error, Result};

/// Location of the configuration file, relative to the scan root.
pub const CONFIG_FILE: &str = "/etc/etc-update.conf";

/// Diff template used when none is configured, and always for "show
/// differences".
pub const DEFAULT_DIFF_COMMAND: &str = "diff -uN %file1 %file2";

/// Merge template used when none is configured.
pub const DEFAULT_MERGE_COMMAND: &str = "sdiff -s -o %merged %orig %new";

/// Settings read from `etc-update.conf`
///
/// Loaded once at startup. Environment overrides are folded in by
/// [`ReconciliationConfig::with_environment`] before the run begins; after
/// that the value is never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationConfig {
    /// `mode=0`: line-based text interface. Anything else asks for the
    /// menu interface, which is rejected at startup.
    pub mode_text: bool,
    /// Clear the terminal before each file list
    pub clear_term: bool,
    /// Delete updates identical to their original without asking
    pub eu_automerge: bool,
    pub rm_opts: String,
    pub mv_opts: String,
    pub cp_opts: String,
    /// Pager for diff output. Empty means `$PAGER`, then `cat`.
    pub pager: String,
    /// `diff_command` opens an editor instead of printing a diff
    pub using_editor: bool,
    /// Template with `%file1` and `%file2` placeholders
    pub diff_command: String,
    /// Template with `%merged`, `%orig` and `%new` placeholders
    pub merge_command: String,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            mode_text: true,
            clear_term: false,
            eu_automerge: true,
            rm_opts: "-i".to_string(),
            mv_opts: "-i".to_string(),
            cp_opts: "-i".to_string(),
            pager: String::new(),
            using_editor: false,
            diff_command: DEFAULT_DIFF_COMMAND.to_string(),
            merge_command: DEFAULT_MERGE_COMMAND.to_string(),
        }
    }
}

impl ReconciliationConfig {
    /// Build a configuration from parsed variables. Keys that are absent
    /// keep their defaults; unknown keys are ignored.
    pub fn from_vars(vars: &EnvMap) -> Self {
        let mut config = Self::default();
        let get = |key: &str| vars.get(key).map(String::as_str);

        if let Some(mode) = get("mode") {
            config.mode_text = mode == "0";
        }
        if let Some(clear) = get("clear_term") {
            config.clear_term = clear == "yes";
        }
        if let Some(automerge) = get("eu_automerge") {
            config.eu_automerge = automerge == "yes";
        }
        if let Some(opts) = get("rm_opts") {
            config.rm_opts = opts.to_string();
        }
        if let Some(opts) = get("mv_opts") {
            config.mv_opts = opts.to_string();
        }
        if let Some(opts) = get("cp_opts") {
            config.cp_opts = opts.to_string();
        }
        if let Some(pager) = get("pager") {
            config.pager = pager.to_string();
        }
        if let Some(editor) = get("using_editor") {
            config.using_editor = editor == "1";
        }
        if let Some(command) = get("diff_command") {
            config.diff_command = command.to_string();
        }
        if let Some(command) = get("merge_command") {
            config.merge_command = command.to_string();
        }
        config
    }

    /// Load the configuration file at `path`.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigFormat`] if the file exists but cannot be
    /// read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        match parse_env_file(path) {
            Ok(vars) => Ok(Self::from_vars(&vars)),
            Err(e) if e.is_not_found() => Ok(Self::default()),
            Err(e) => Err(Error::ConfigFormat {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Load `etc-update.conf` beneath `root`, reporting a malformed file to
    /// the operator and falling back to the defaults.
    pub fn load_from_root(root: &Path, operator: &mut dyn Operator) -> Self {
        let path = NormalizedPath::new(CONFIG_FILE).under_root(root);
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Using default configuration");
                operator.notify(Notice::Warning, &format!("{e}. Skipped."));
                Self::default()
            }
        }
    }

    /// Fail fast unless the text interface was requested.
    pub fn ensure_supported(&self) -> Result<()> {
        if self.mode_text {
            Ok(())
        } else {
            Err(Error::UnsupportedMode)
        }
    }

    /// Fold process environment overrides into the configuration.
    ///
    /// - an empty `pager` becomes `$PAGER`, or `cat` when that is unset
    /// - `NONINTERACTIVE_MV` strips `-i` from `mv_opts`
    pub fn with_environment(mut self, env: &RunEnvironment) -> Self {
        if self.pager.is_empty() {
            self.pager = env
                .pager
                .clone()
                .filter(|pager| !pager.is_empty())
                .unwrap_or_else(|| "cat".to_string());
        }
        if env.noninteractive_mv {
            self.mv_opts = self
                .mv_opts
                .split_whitespace()
                .filter(|opt| *opt != "-i")
                .collect::<Vec<_>>()
                .join(" ");
        }
        self
    }
}
