//! Tests for the ownership-preserving file primitives

use std::fs;

use etcup_fs::{FileOwnership, io};
use tempfile::tempdir;

#[test]
fn overwrite_moves_candidate_into_place() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("hosts");
    let candidate = dir.path().join("._cfg0000_hosts");
    fs::write(&original, "old").unwrap();
    fs::write(&candidate, "new").unwrap();

    io::overwrite(&original, &candidate).unwrap();

    assert_eq!(fs::read_to_string(&original).unwrap(), "new");
    assert!(!candidate.exists());
}

#[test]
fn replace_with_missing_original_fails_before_touching_candidate() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("hosts");
    let candidate = dir.path().join("._cfg0000_hosts");
    fs::write(&candidate, "new").unwrap();

    let result = io::replace_preserving(&original, &candidate);

    assert!(result.is_err());
    assert!(candidate.exists(), "candidate must survive a failed capture");
}

#[test]
fn scratch_dir_is_removed_on_drop() {
    let base = tempdir().unwrap();
    let scratch = io::scratch_dir(Some(base.path())).unwrap();
    let path = scratch.path().to_path_buf();

    assert!(path.starts_with(base.path()));
    assert!(
        path.file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(io::SCRATCH_PREFIX)
    );
    fs::write(path.join("merged"), "x").unwrap();

    drop(scratch);
    assert!(!path.exists());
}

#[test]
fn scratch_dirs_are_unique() {
    let base = tempdir().unwrap();
    let a = io::scratch_dir(Some(base.path())).unwrap();
    let b = io::scratch_dir(Some(base.path())).unwrap();
    assert_ne!(a.path(), b.path());
}

#[cfg(unix)]
mod unix_tests {
    use super::*;
    use std::fs::Permissions;
    use std::os::unix::fs::{MetadataExt, PermissionsExt};

    #[test]
    fn replace_preserves_mode_and_owner() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("shadow.conf");
        let candidate = dir.path().join("._cfg0001_shadow.conf");
        fs::write(&original, "old").unwrap();
        fs::write(&candidate, "new").unwrap();
        fs::set_permissions(&original, Permissions::from_mode(0o600)).unwrap();
        fs::set_permissions(&candidate, Permissions::from_mode(0o644)).unwrap();
        let before = fs::metadata(&original).unwrap();

        let captured = io::replace_preserving(&original, &candidate).unwrap();

        let after = fs::metadata(&original).unwrap();
        assert_eq!(fs::read_to_string(&original).unwrap(), "new");
        assert_eq!(after.permissions().mode() & 0o7777, 0o600);
        assert_eq!(after.uid(), before.uid());
        assert_eq!(after.gid(), before.gid());
        assert_eq!(captured.mode(), 0o600);
        assert!(!candidate.exists());
    }

    #[test]
    fn copy_preserving_keeps_source_and_mode() {
        let dir = tempdir().unwrap();
        let scratch = tempdir().unwrap();
        let original = dir.path().join("fstab");
        let merged = scratch.path().join(".fstab-merged");
        fs::write(&original, "old").unwrap();
        fs::write(&merged, "merged").unwrap();
        fs::set_permissions(&original, Permissions::from_mode(0o640)).unwrap();

        io::copy_preserving(&original, &merged).unwrap();

        assert_eq!(fs::read_to_string(&original).unwrap(), "merged");
        assert_eq!(
            fs::metadata(&original).unwrap().permissions().mode() & 0o7777,
            0o640
        );
        assert!(merged.exists());
    }

    #[test]
    fn capture_reads_current_owner() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file");
        fs::write(&path, "x").unwrap();
        let meta = fs::metadata(&path).unwrap();

        let ownership = FileOwnership::capture(&path).unwrap();

        assert_eq!(ownership.uid, meta.uid());
        assert_eq!(ownership.gid, meta.gid());
    }
}
