//! Error type for configuration loading and validation.

use thiserror::Error;

/// Everything that can go wrong between reading `default.toml` and holding a
/// validated `Settings`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required configuration file is missing
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// The file was found but could not be deserialized into settings
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// A loaded value violates a settings invariant
    #[error("Validation error: {field} - {message}")]
    ValidationError {
        /// Dotted path of the offending field, e.g. `database.url`
        field: String,
        /// What the invariant expected
        message: String,
    },

    /// An environment variable held an unusable value
    #[error("Environment variable error: {0}")]
    EnvVarError(String),

    /// Two configuration sources were requested that cannot coexist
    #[error("Mutual exclusivity error: {0}")]
    MutualExclusivityError(String),

    /// Wrapped error from the config crate's builder
    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

impl ConfigError {
    /// Validation error for one settings field
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Missing-file error carrying the path that was tried
    pub fn file_not_found<S: Into<String>>(path: S) -> Self {
        ConfigError::FileNotFound(path.into())
    }

    /// Error for conflicting configuration sources
    pub fn mutual_exclusivity<S: Into<String>>(message: S) -> Self {
        ConfigError::MutualExclusivityError(message.into())
    }
}
