//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or encoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A file value reached a form-urlencoded encoding, which cannot carry it.
    #[error("field `{field}` holds a file and cannot be form-urlencoded")]
    FileInUrlencodedBody {
        /// The flattened name of the offending field.
        field: String,
    },

    /// A flattened field name is invalid (e.g., empty).
    #[error("invalid field name: {0}")]
    InvalidFieldName(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
