//! Error types for etcup-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from etcup-core
    #[error(transparent)]
    Core(#[from] etcup_core::Error),

    /// Report serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_display_unchanged() {
        let core = etcup_core::Error::UnsupportedMode;
        let expected = core.to_string();
        let err: CliError = core.into();
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn prompt_failures_surface_as_core_io_errors() {
        let prompt = dialoguer::Error::from(std::io::Error::other("terminal gone"));
        let core = etcup_core::Error::Io(std::io::Error::other(prompt));
        let err: CliError = core.into();
        assert!(matches!(err, CliError::Core(etcup_core::Error::Io(_))));
        assert!(err.to_string().contains("terminal gone"));
    }
}
