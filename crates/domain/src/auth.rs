//! Bearer access token with embedded expiry
//!
//! The credential is a signed token whose payload carries a numeric `exp`
//! claim (seconds since epoch). Parsing never fails: anything that cannot
//! be decoded is treated as already expired, so a malformed token degrades
//! to "unauthenticated" instead of failing the request.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};

/// A bearer token together with its decoded expiration instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    raw: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Parses a raw token string.
    ///
    /// The payload segment is base64url-decoded and its `exp` claim read.
    /// If the token has no payload segment, the segment is not valid
    /// base64url JSON, or no numeric `exp` is present, the expiry defaults
    /// to the Unix epoch, which counts as already expired.
    #[must_use]
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let expires_at = decode_expiry(&raw).unwrap_or(DateTime::UNIX_EPOCH);
        Self { raw, expires_at }
    }

    /// The raw token string as persisted.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The decoded expiration instant.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true if the token is expired at the given instant.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Returns the `Authorization` header value, or `None` once expired.
    #[must_use]
    pub fn authorization_value(&self, now: DateTime<Utc>) -> Option<String> {
        if self.is_expired(now) {
            None
        } else {
            Some(format!("Bearer {}", self.raw))
        }
    }
}

fn decode_expiry(raw: &str) -> Option<DateTime<Utc>> {
    let payload = raw.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let exp = claims.get("exp")?.as_i64()?;
    DateTime::from_timestamp(exp, 0)
}
