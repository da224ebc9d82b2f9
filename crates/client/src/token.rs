//! Token provision and authorization resolution
//!
//! The token is a capability handed to the client at construction, not a
//! process-global. Two providers cover the common cases: an in-memory store
//! for tests and in-process login flows, and a file-backed store that reads
//! the credential persisted under a fixed path by an external login flow.

use std::path::PathBuf;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use trellis_domain::AccessToken;

/// Supplies the raw persisted token, if any.
///
/// Reading must be cheap and infallible; the facade calls this on every
/// authenticated request.
pub trait TokenProvider: Send + Sync {
    /// Returns the raw token string, or `None` when unauthenticated.
    fn raw(&self) -> Option<String>;
}

/// Thread-safe in-memory token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given token.
    #[must_use]
    pub fn with_token(raw: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(raw.into())),
        }
    }

    /// Replaces the stored token.
    pub fn set(&self, raw: impl Into<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(raw.into());
        }
    }

    /// Clears the stored token.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
    }
}

impl TokenProvider for MemoryTokenStore {
    fn raw(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }
}

/// Token store reading from a fixed file path.
///
/// The credential lives at `<config_dir>/trellis/token`, written by an
/// external login flow and never mutated here.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store at the default path, if a config directory exists.
    #[must_use]
    pub fn new() -> Option<Self> {
        dirs::config_dir().map(|dir| Self {
            path: dir.join("trellis").join("token"),
        })
    }

    /// Creates a store reading from an explicit path.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this store reads from.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl TokenProvider for FileTokenStore {
    fn raw(&self) -> Option<String> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        let trimmed = contents.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Resolves the `Authorization` header value for the current instant.
///
/// Absent, malformed, and expired tokens all resolve to `None`, never an
/// error. A valid token yields `Bearer <token>`.
#[must_use]
pub fn resolve_authorization(provider: &dyn TokenProvider, now: DateTime<Utc>) -> Option<String> {
    provider
        .raw()
        .and_then(|raw| AccessToken::parse(raw).authorization_value(now))
}
