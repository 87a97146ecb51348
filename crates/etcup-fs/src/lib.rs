//! Filesystem primitives for etcup
//!
//! Provides root-relative path handling, ownership-preserving file
//! replacement, scratch directories, checksums and the shell-style
//! environment file parser used for configuration files.

pub mod checksum;
pub mod env_file;
pub mod error;
pub mod io;
pub mod path;

pub use env_file::{EnvMap, parse_env_file, parse_env_str};
pub use error::{Error, Result};
pub use io::FileOwnership;
pub use path::NormalizedPath;
