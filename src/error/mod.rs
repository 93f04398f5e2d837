//! Error handling module for reelsmith

use thiserror::Error;

use crate::domain::errors::{DomainError, PipelineFailure};

/// Main error type at the library boundary
#[derive(Error, Debug)]
pub enum ReelError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// A pipeline run stopped at a stage
    #[error(transparent)]
    Pipeline(#[from] PipelineFailure),

    /// Any other domain failure
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Output could not be serialized
    #[error("Failed to serialize output: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ReelError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            ReelError::ConfigError { .. } => 2,
            ReelError::Domain(DomainError::BadArgs(_) | DomainError::Config(_)) => 2,
            ReelError::Pipeline(_) => 3,
            _ => 1,
        }
    }
}

/// Result type alias for reelsmith operations
pub type ReelResult<T> = std::result::Result<T, ReelError>;
