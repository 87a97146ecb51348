//! Error types for etcup-core

use std::path::PathBuf;

/// Result type for etcup-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reconciling configuration updates
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An external diff, merge or pager program failed to start or exited
    /// with a status its exit policy rejects
    #[error("{command}: {message}")]
    ExternalCommand { command: String, message: String },

    /// The configuration asks for the menu interface, which is not available
    #[error("Menu mode not supported yet")]
    UnsupportedMode,

    /// Malformed configuration file. The loader reports it and falls back
    /// to defaults, so it never aborts a run.
    #[error("Invalid configuration file {path}: {message}")]
    ConfigFormat { path: PathBuf, message: String },

    /// The operator typed something that is not a number
    #[error("Invalid input '{input}': expected a number")]
    InvalidInput { input: String },

    /// The operator input channel was closed before a choice was made
    #[error("No more operator input")]
    InputClosed,

    /// Internal bookkeeping no longer matches the filesystem scan
    #[error("Unexpected state: {message}")]
    InvalidState { message: String },

    // Transparent wrappers for underlying errors
    /// Filesystem error from etcup-fs
    #[error(transparent)]
    Fs(#[from] etcup_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn external(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalCommand {
            command: command.into(),
            message: message.into(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Whether the error only aborts the action being attempted.
    ///
    /// External program failures leave the candidate unresolved and return
    /// the operator to the menu; everything else ends the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ExternalCommand { .. })
    }
}
