use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Invalid input")]
    Invalid,

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Session profile mismatch: expected {expected}, got {actual}")]
    ProfileMismatch { expected: String, actual: String },

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Internal server error")]
    InternalServerError,
}
