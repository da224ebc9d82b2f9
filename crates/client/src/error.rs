//! Client error types

use thiserror::Error;
use trellis_domain::{DomainError, StatusCode};

/// Errors produced by the HTTP facade.
///
/// No local recovery is attempted anywhere: a failed request resolves to a
/// single error, left to the caller to retry if desired.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The composed URL is invalid.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// The timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other transport-level failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}{}", fmt_server_message(server_message.as_deref()))]
    Status {
        /// The response status.
        status: StatusCode,
        /// The `message` field of a JSON error body, if the server sent one.
        server_message: Option<String>,
    },

    /// The request body could not be encoded.
    #[error(transparent)]
    Body(#[from] DomainError),

    /// A downloaded file could not be saved.
    #[error("failed to save download: {0}")]
    Save(#[from] std::io::Error),
}

fn fmt_server_message(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

impl ClientError {
    /// The HTTP status, when the server answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server-provided error message, when one was extracted.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { server_message, .. } => server_message.as_deref(),
            _ => None,
        }
    }

    /// Returns true for a 401 response.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status().is_some_and(|s| s.as_u16() == 401)
    }
}

/// Result type alias for facade operations.
pub type ClientResult<T> = Result<T, ClientError>;
