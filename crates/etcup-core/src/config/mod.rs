//! Configuration for a reconciliation run
//!
//! This module provides:
//! - **loader**: the tool's own `etc-update.conf` and its defaults
//! - **environment**: process environment overrides applied at startup
//! - **protect**: protected and masked paths from the profile environment

mod environment;
mod loader;
mod protect;

pub use environment::RunEnvironment;
pub use loader::{
    CONFIG_FILE, DEFAULT_DIFF_COMMAND, DEFAULT_MERGE_COMMAND, ReconciliationConfig,
};
pub use protect::{BUILTIN_MASKS, BUILTIN_PROTECT, PROFILE_ENV_FILE, ProtectPaths};
