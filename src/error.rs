//! Error types for a3s-upload-guard

use thiserror::Error;

/// Errors that can occur while loading configuration, decoding events,
/// or dispatching alerts
///
/// Policy violations are not errors; they are classified outcomes
/// (see [`crate::policy::Violation`]).
#[derive(Debug, Error)]
pub enum GuardError {
    /// Alert transport failure
    #[error("Failed to publish alert to '{destination}': {reason}")]
    Publish {
        destination: String,
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<toml::de::Error> for GuardError {
    fn from(e: toml::de::Error) -> Self {
        GuardError::Config(e.to_string())
    }
}

/// Result type alias for guard operations
pub type Result<T> = std::result::Result<T, GuardError>;
