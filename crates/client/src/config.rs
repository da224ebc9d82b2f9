//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::ClientError;

/// Environment variable holding the base URL, read at startup.
pub const BASE_URL_ENV: &str = "API_BASE_URL";

/// Fixed request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for an [`crate::ApiClient`].
///
/// The base URL and timeout are fixed for the lifetime of the client; they
/// are not reconfigurable per call.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every path is resolved against.
    pub base_url: Url,
    /// Request timeout.
    pub timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
    /// Directory downloaded files are saved into.
    pub download_dir: PathBuf,
}

impl ClientConfig {
    /// Creates a configuration with the default timeout and download dir.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("Trellis/{}", env!("CARGO_PKG_VERSION")),
            download_dir: PathBuf::from("."),
        }
    }

    /// Reads the base URL from the `API_BASE_URL` environment variable.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` if the variable is unset or does
    /// not parse as an absolute URL.
    pub fn from_env() -> Result<Self, ClientError> {
        let raw = std::env::var(BASE_URL_ENV)
            .map_err(|_| ClientError::InvalidUrl(format!("{BASE_URL_ENV} is not set")))?;
        let base_url =
            Url::parse(&raw).map_err(|e| ClientError::InvalidUrl(format!("{e}: {raw}")))?;
        Ok(Self::new(base_url))
    }

    /// Overrides the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the User-Agent value.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Overrides the download directory.
    #[must_use]
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }
}
