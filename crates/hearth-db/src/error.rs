//! Error types for database operations.

use thiserror::Error;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Native DB error.
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A stored record could not be decoded.
    #[error("Record error: {0}")]
    Record(#[from] hearth_core::Error),
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
