//! Error types for the essay coach
//!
//! Library code returns [`CoachError`] (thiserror); the binary wraps it with
//! anyhow context where convenient.

use crate::validation::ValidationErrors;
use thiserror::Error;

/// Main error type for essay coach operations
#[derive(Error, Debug)]
pub enum CoachError {
    /// Client payload failed validation
    #[error("Invalid request: {0}")]
    Validation(ValidationErrors),

    /// Deployment is missing something the pipeline needs (e.g. the API key)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The text-generation provider call failed
    #[error("Provider error: {0}")]
    Provider(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client error outside a provider call
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for essay coach operations
pub type Result<T> = std::result::Result<T, CoachError>;

impl From<ValidationErrors> for CoachError {
    fn from(errors: ValidationErrors) -> Self {
        CoachError::Validation(errors)
    }
}

/// Convert anyhow::Error to CoachError
impl From<anyhow::Error> for CoachError {
    fn from(err: anyhow::Error) -> Self {
        CoachError::Other(err.to_string())
    }
}
