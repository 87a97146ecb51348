//! File replacement primitives that preserve ownership and permissions
//!
//! None of these operations roll back: a failure part-way through leaves
//! the filesystem as it was at the failing step and the error names the
//! path that failed.

use std::fs::{self, Permissions};
use std::path::Path;

use tempfile::TempDir;

use crate::{Error, Result};

/// Prefix of every scratch directory created by [`scratch_dir`].
pub const SCRATCH_PREFIX: &str = "etc-update-";

/// Owner, group and permission bits captured from a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOwnership {
    pub uid: u32,
    pub gid: u32,
    pub permissions: Permissions,
}

impl FileOwnership {
    /// Capture ownership and mode of `path` (symlinks are followed).
    pub fn capture(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|e| Error::io(path, e))?;
        Ok(Self {
            uid: owner_of(&metadata),
            gid: group_of(&metadata),
            permissions: metadata.permissions(),
        })
    }

    /// Permission bits in octal form (`0o644`).
    #[cfg(unix)]
    pub fn mode(&self) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        self.permissions.mode() & 0o7777
    }

    /// Apply owner, group and mode to `path`.
    ///
    /// Ownership is applied before the mode so setuid/setgid bits are not
    /// cleared by the chown.
    pub fn apply(&self, path: &Path) -> Result<()> {
        chown(path, self.uid, self.gid)?;
        fs::set_permissions(path, self.permissions.clone()).map_err(|e| Error::io(path, e))
    }
}

#[cfg(unix)]
fn owner_of(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    metadata.uid()
}

#[cfg(unix)]
fn group_of(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    metadata.gid()
}

#[cfg(unix)]
fn chown(path: &Path, uid: u32, gid: u32) -> Result<()> {
    std::os::unix::fs::chown(path, Some(uid), Some(gid)).map_err(|e| Error::io(path, e))
}

#[cfg(not(unix))]
fn owner_of(_metadata: &fs::Metadata) -> u32 {
    0
}

#[cfg(not(unix))]
fn group_of(_metadata: &fs::Metadata) -> u32 {
    0
}

#[cfg(not(unix))]
fn chown(_path: &Path, _uid: u32, _gid: u32) -> Result<()> {
    Ok(())
}

/// Remove a single file.
pub fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::io(path, e))
}

/// Rename `from` onto `to`.
pub fn rename(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to).map_err(|e| Error::io(from, e))
}

/// Copy `from` to `to`, overwriting `to`.
pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to).map(|_| ()).map_err(|e| Error::io(from, e))
}

/// Delete `original` and move `candidate` into its place, without touching
/// ownership. Used for masked files, which are taken as shipped.
pub fn overwrite(original: &Path, candidate: &Path) -> Result<()> {
    remove_file(original)?;
    rename(candidate, original)
}

/// Replace `original` with `candidate`, keeping the original's owner,
/// group and permission bits.
///
/// Sequence: capture, delete original, rename candidate, chown, chmod.
pub fn replace_preserving(original: &Path, candidate: &Path) -> Result<FileOwnership> {
    let ownership = FileOwnership::capture(original)?;
    overwrite(original, candidate)?;
    ownership.apply(original)?;
    tracing::debug!(
        original = %original.display(),
        uid = ownership.uid,
        gid = ownership.gid,
        "Replaced file"
    );
    Ok(ownership)
}

/// Replace `original` with a copy of `source`, keeping the original's
/// owner, group and permission bits. `source` is left in place.
///
/// Copies instead of renaming so `source` may live on another filesystem.
pub fn copy_preserving(original: &Path, source: &Path) -> Result<FileOwnership> {
    let ownership = FileOwnership::capture(original)?;
    remove_file(original)?;
    copy_file(source, original)?;
    ownership.apply(original)?;
    Ok(ownership)
}

/// Create a fresh, uniquely named scratch directory.
///
/// The directory lives under `base` when given, the system temp directory
/// otherwise, and is removed when the returned guard is dropped.
pub fn scratch_dir(base: Option<&Path>) -> Result<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(SCRATCH_PREFIX);
    match base {
        Some(base) => builder.tempdir_in(base).map_err(|e| Error::io(base, e)),
        None => builder
            .tempdir()
            .map_err(|e| Error::io(std::env::temp_dir(), e)),
    }
}
