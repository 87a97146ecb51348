//! Shell-style `KEY=value` files
//!
//! Configuration files such as `etc-update.conf` and `profile.env` are
//! plain and `export`ed assignments with `#` comments and shell quoting.
//! Parsing is done by `dotenvy`. Nothing is executed and the process
//! environment is never modified, although `$NAME` expansion prefers a
//! process variable over an earlier key of the same name.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::{Error, Result};

/// Variables parsed from an env file, in key order.
pub type EnvMap = BTreeMap<String, String>;

/// Parse the env file at `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::EnvParse`]
/// on the first entry that is not an assignment.
pub fn parse_env_file(path: &Path) -> Result<EnvMap> {
    let file = std::fs::File::open(path).map_err(|e| Error::io(path, e))?;
    tracing::debug!(path = %path.display(), "Parsing env file");
    collect(dotenvy::from_read_iter(file), path)
}

/// Parse env file content; `origin` is only used in error messages.
pub fn parse_env_str(content: &str, origin: &Path) -> Result<EnvMap> {
    collect(dotenvy::from_read_iter(content.as_bytes()), origin)
}

fn collect<R: Read>(entries: dotenvy::Iter<R>, origin: &Path) -> Result<EnvMap> {
    entries
        .map(|entry| entry.map_err(|e| parse_error(e, origin)))
        .collect()
}

fn parse_error(error: dotenvy::Error, origin: &Path) -> Error {
    match error {
        dotenvy::Error::Io(source) => Error::io(origin, source),
        dotenvy::Error::LineParse(line, index) => Error::EnvParse {
            path: origin.to_path_buf(),
            message: format!("unexpected input at position {index} of {:?}", line.trim_end()),
        },
        other => Error::EnvParse {
            path: origin.to_path_buf(),
            message: other.to_string(),
        },
    }
}
