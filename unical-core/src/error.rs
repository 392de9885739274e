//! Error types for unical.

use thiserror::Error;

/// Errors that can occur in unical operations.
///
/// Malformed feed input is deliberately absent: the decoder drops bad
/// blocks instead of failing.
#[derive(Error, Debug)]
pub enum UnicalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid event: {0}")]
    Validation(String),

    #[error("Event not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Publish error: {0}")]
    Publish(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl UnicalError {
    /// Whether the error came from the durable record store.
    ///
    /// Store failures invalidate the in-memory view and force a refetch.
    pub fn is_store(&self) -> bool {
        matches!(self, UnicalError::Store(_))
    }
}

impl From<serde_json::Error> for UnicalError {
    fn from(e: serde_json::Error) -> Self {
        UnicalError::Serialization(e.to_string())
    }
}

/// Result type alias for unical operations.
pub type UnicalResult<T> = Result<T, UnicalError>;
