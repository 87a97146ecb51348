//! Staged replacement naming convention
//!
//! Package managers never overwrite a protected configuration file. They
//! install the new version next to it as `._cfg<N>_<basename>`, where `<N>`
//! is a decimal counter and `<basename>` is the original file name verbatim.

/// Literal prefix of every staged replacement file name.
pub const STAGED_PREFIX: &str = "._cfg";

/// Recover the original basename from a staged replacement file name.
///
/// Returns `None` for names that do not follow the convention, including
/// names without digits between the prefix and the separating underscore,
/// or with nothing after it.
///
/// ```
/// use etcup_core::matcher::recognize;
///
/// assert_eq!(recognize("._cfg0001_make.conf"), Some("make.conf"));
/// assert_eq!(recognize("._cfg0000_my_file"), Some("my_file"));
/// assert_eq!(recognize("._cfg_make.conf"), None);
/// assert_eq!(recognize("make.conf"), None);
/// ```
pub fn recognize(file_name: &str) -> Option<&str> {
    let rest = file_name.strip_prefix(STAGED_PREFIX)?;
    let (counter, basename) = rest.split_once('_')?;
    if counter.is_empty() || !counter.bytes().all(|b| b.is_ascii_digit()) || basename.is_empty() {
        return None;
    }
    Some(basename)
}

/// Whether `file_name` is a staged replacement for exactly `basename`.
pub fn is_candidate_for(file_name: &str, basename: &str) -> bool {
    recognize(file_name) == Some(basename)
}
