use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Failed to read image bytes: {0}")]
    ReadError(String),

    #[error("{0}")]
    TransportError(String),

    #[error("No response from AI")]
    EmptyResponse,

    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),

    #[error("Not found")]
    NotFound,

    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal server error")]
    InternalServerError,
}
