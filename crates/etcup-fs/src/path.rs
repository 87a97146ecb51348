//! Root-relative path handling
//!
//! Every path the engine keys on is stored relative to the scan root but
//! written in absolute style (`/etc/foo.conf`), so the same string can be
//! compared against administrator-configured protect and mask lists no
//! matter which directory the run treats as `/`.

use std::path::{Path, PathBuf};

/// A path rooted at the scan root, always starting with `/`.
///
/// Repeated separators and `.` segments are collapsed; a trailing separator
/// is dropped. `..` segments are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy();
        let mut inner = String::with_capacity(raw.len() + 1);
        for segment in raw.split('/') {
            if segment.is_empty() || segment == "." {
                continue;
            }
            inner.push('/');
            inner.push_str(segment);
        }
        if inner.is_empty() {
            inner.push('/');
        }
        Self { inner }
    }

    /// Express `absolute` relative to `root`.
    ///
    /// Paths outside `root` are kept as they are.
    pub fn from_root(root: &Path, absolute: &Path) -> Self {
        Self::new(absolute.strip_prefix(root).unwrap_or(absolute))
    }

    /// Get the internal string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Resolve this path beneath `root` for I/O.
    ///
    /// `Path::join` would discard `root` for an absolute argument, so the
    /// leading separator is stripped first.
    pub fn under_root(&self, root: &Path) -> PathBuf {
        let relative = self.inner.trim_start_matches('/');
        if relative.is_empty() {
            root.to_path_buf()
        } else {
            root.join(relative)
        }
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        Self::new(format!("{}/{}", self.inner, segment))
    }

    /// Get the parent directory. The root has no parent.
    pub fn parent(&self) -> Option<Self> {
        match self.inner.rfind('/') {
            _ if self.inner == "/" => None,
            Some(0) => Some(Self::new("/")),
            Some(idx) => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            None => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        self.inner.rsplit('/').next().filter(|name| !name.is_empty())
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
