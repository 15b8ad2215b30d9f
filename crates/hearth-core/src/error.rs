//! Error types for hearth-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unexpected end of record: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("Malformed encoded integer")]
    MalformedEncodedInt,

    #[error("Invalid UTF-8 in string field")]
    InvalidUtf8,

    #[error("Unknown addon kind tag: {0}")]
    UnknownKind(u8),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Unknown item tag: {0}")]
    UnknownItemTag(String),

    #[error("Serial out of range: {0:#x}")]
    SerialOutOfRange(u32),

    #[error("Duplicate family: {0}")]
    DuplicateFamily(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
