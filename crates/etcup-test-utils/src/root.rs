//! [`TestRoot`] builder for reconciliation scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Configuration that skips the diff probe and never launches a pager or
/// editor in tests that do not ask for one.
pub const EDITOR_CONFIG: &str = "mode=0\nusing_editor=1\ndiff_command=\"true %file1 %file2\"\n";

/// A temporary directory standing in for `/`.
///
/// All paths passed to the helpers are root-relative and may start with
/// `/` (`/etc/foo.conf` and `etc/foo.conf` are the same file).
///
/// # Example
///
/// ```rust,no_run
/// use etcup_test_utils::TestRoot;
///
/// let root = TestRoot::new();
/// root.write("/etc/foo.conf", "old");
/// root.stage("/etc/foo.conf", 1, "new");
/// root.assert_file_exists("/etc/._cfg0001_foo.conf");
/// ```
pub struct TestRoot {
    temp_dir: TempDir,
}

impl Default for TestRoot {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRoot {
    /// Create an empty root.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute location of a root-relative path.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel.trim_start_matches('/'))
    }

    /// Write a file, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Stage update number `n` for `original` and return its root-relative
    /// path (`/etc/._cfg0001_foo.conf`).
    pub fn stage(&self, original: &str, n: u32, content: &str) -> String {
        let original = Path::new(original);
        let name = original
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap()
            .to_string();
        let staged = original.with_file_name(format!("._cfg{n:04}_{name}"));
        let staged = staged.to_str().unwrap().to_string();
        self.write(&staged, content);
        staged
    }

    /// Write `etc/etc-update.conf`.
    pub fn write_config(&self, content: &str) {
        self.write("/etc/etc-update.conf", content);
    }

    /// Write a configuration that opens no external programs.
    pub fn write_editor_config(&self) {
        self.write_config(EDITOR_CONFIG);
    }

    /// Read a file as a string.
    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel))
            .unwrap_or_else(|e| panic!("Failed to read {rel}: {e}"))
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path(rel).exists()
    }

    /// Assert a file exists.
    pub fn assert_file_exists(&self, rel: &str) {
        assert!(self.exists(rel), "Expected file to exist: {rel}");
    }

    /// Assert a file does not exist.
    pub fn assert_file_not_exists(&self, rel: &str) {
        assert!(!self.exists(rel), "Expected file not to exist: {rel}");
    }

    /// Assert a file's content.
    pub fn assert_content(&self, rel: &str, expected: &str) {
        assert_eq!(self.read(rel), expected, "Unexpected content in {rel}");
    }

    /// Set permission bits.
    #[cfg(unix)]
    pub fn set_mode(&self, rel: &str, mode: u32) {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(self.path(rel), fs::Permissions::from_mode(mode)).unwrap();
    }

    /// Permission bits of a file.
    #[cfg(unix)]
    pub fn mode(&self, rel: &str) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(self.path(rel)).unwrap().permissions().mode() & 0o7777
    }
}
