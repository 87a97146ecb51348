//! Protected and masked paths from the profile environment
//!
//! When the caller names no paths, the run covers `CONFIG_PROTECT` and
//! honours `CONFIG_PROTECT_MASK` as exported by the generated
//! `/etc/profile.env`, plus a protected root and masks that always apply.

use std::path::Path;

use etcup_fs::{NormalizedPath, parse_env_file};

use crate::Result;
use crate::task::ReconciliationOptions;

/// Generated profile environment, relative to the scan root.
pub const PROFILE_ENV_FILE: &str = "/etc/profile.env";

/// Protected even when the profile does not say so.
pub const BUILTIN_PROTECT: &str = "/etc";

/// Release files are always taken as shipped.
pub const BUILTIN_MASKS: &[&str] = &["/etc/macaroni/release", "/etc/os-release"];

/// Protect and mask lists derived for one root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectPaths {
    pub protect: Vec<String>,
    pub mask: Vec<String>,
}

impl ProtectPaths {
    /// Read `profile.env` beneath `root` (if present) and add the built-in
    /// entries that are missing.
    ///
    /// # Errors
    ///
    /// A `profile.env` that exists but cannot be parsed is fatal.
    pub fn from_profile(root: &Path) -> Result<Self> {
        let profile = NormalizedPath::new(PROFILE_ENV_FILE).under_root(root);
        let mut paths = Self::default();

        match parse_env_file(&profile) {
            Ok(vars) => {
                if let Some(value) = vars.get("CONFIG_PROTECT") {
                    paths.protect.extend(split_list(value));
                }
                if let Some(value) = vars.get("CONFIG_PROTECT_MASK") {
                    paths.mask.extend(split_list(value));
                }
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(path = %profile.display(), "No profile environment");
            }
            Err(e) => return Err(e.into()),
        }

        if !paths.protect.iter().any(|p| p == BUILTIN_PROTECT) {
            paths.protect.insert(0, BUILTIN_PROTECT.to_string());
        }
        for mask in BUILTIN_MASKS {
            if !paths.mask.iter().any(|m| m == mask) {
                paths.mask.push(mask.to_string());
            }
        }

        Ok(paths)
    }

    /// Use these paths for a run whose caller supplied none. Masks are
    /// appended to any the caller already set.
    pub fn apply_to(self, options: &mut ReconciliationOptions) {
        options.paths = self.protect;
        options.mask_paths.extend(self.mask);
    }
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value.split_whitespace().map(str::to_string)
}
