//! Process environment consulted at startup

use std::path::PathBuf;

/// Base directory for scratch directories
pub const SCRATCH_BASE_VAR: &str = "PORTAGE_TMPDIR";
/// Pager used when the configuration leaves `pager` empty
pub const PAGER_VAR: &str = "PAGER";
/// When set, `-i` is stripped from `mv_opts`
pub const NONINTERACTIVE_MV_VAR: &str = "NONINTERACTIVE_MV";

/// Snapshot of the environment variables a run depends on.
///
/// Captured once by the caller so the engine never reads the process
/// environment itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunEnvironment {
    pub scratch_base: Option<PathBuf>,
    pub pager: Option<String>,
    pub noninteractive_mv: bool,
}

impl RunEnvironment {
    /// Read the current process environment.
    pub fn from_process() -> Self {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            scratch_base: non_empty(SCRATCH_BASE_VAR).map(PathBuf::from),
            pager: non_empty(PAGER_VAR),
            noninteractive_mv: non_empty(NONINTERACTIVE_MV_VAR).is_some(),
        }
    }
}
