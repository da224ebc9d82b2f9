//! The HTTP client facade
//!
//! [`ApiClient`] wraps one configured `reqwest::Client` behind a uniform
//! request interface: query composition, bearer-token injection, body
//! encoding per content type, spreadsheet download-and-save, and an
//! on-unauthorized hook observing every 401 response.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use trellis_domain::{ApiResponse, FormMap, Query};

use crate::clock::{Clock, SystemClock};
use crate::config::ClientConfig;
use crate::encode::{multipart_form, multipart_form_with_progress, urlencoded_body, ProgressFn};
use crate::error::ClientError;
use crate::save::save_download;
use crate::token::{resolve_authorization, TokenProvider};
use crate::url::compose_url;

const JSON_MIME: &str = "application/json";
const FORM_MIME: &str = "application/x-www-form-urlencoded";
const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const XLS_MIME: &str = "application/vnd.ms-excel";

/// File name used when a spreadsheet download has no caller-supplied name.
pub const DEFAULT_EXCEL_NAME: &str = "excel_table";

/// Hook invoked synchronously when a response comes back 401.
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// Per-call request configuration overrides.
///
/// Caller-supplied headers replace any header the facade set for the same
/// name.
#[derive(Debug, Default, Clone)]
pub struct RequestOverrides {
    /// Headers merged over the facade's defaults.
    pub headers: HeaderMap,
    /// Timeout replacing the configured one for this call only.
    pub timeout: Option<Duration>,
}

impl RequestOverrides {
    /// Creates an empty override set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets a per-call timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Result of a spreadsheet download.
#[derive(Debug)]
pub struct Download {
    /// The settled response, returned whether or not the file was saved.
    pub response: ApiResponse,
    /// Where the file was written, when the save step ran.
    pub saved_to: Option<PathBuf>,
}

/// Promise-style HTTP facade over one configured client.
///
/// The token provider and the 401 hook are constructor capabilities; the
/// facade holds no global state.
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    tokens: Arc<dyn TokenProvider>,
    clock: Arc<dyn Clock>,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl ApiClient {
    /// Creates a facade from a configuration and a token provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            config,
            tokens,
            clock: Arc::new(SystemClock::new()),
            on_unauthorized: None,
        })
    }

    /// Replaces the clock used for token-expiry checks.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Installs the hook invoked before a 401 error propagates.
    #[must_use]
    pub fn with_on_unauthorized(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_unauthorized = Some(Arc::new(hook));
        self
    }

    /// Issues an authenticated GET at `path + param`.
    ///
    /// # Errors
    ///
    /// Any transport failure or non-2xx status.
    pub async fn get(
        &self,
        path: &str,
        param: &str,
        query: &Query,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.url(&join_param(path, param), query)?;
        let builder = self.json_headers(self.http.get(url));
        self.execute(self.with_authorization(builder)).await
    }

    /// Issues a GET without any authorization header.
    ///
    /// Only the JSON content-type header is sent; intended for public
    /// endpoints.
    ///
    /// # Errors
    ///
    /// Any transport failure or non-2xx status.
    pub async fn get_no_auth(
        &self,
        path: &str,
        param: &str,
        query: &Query,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.url(&join_param(path, param), query)?;
        let builder = self.http.get(url).header(CONTENT_TYPE, JSON_MIME);
        self.execute(builder).await
    }

    /// Issues an authenticated POST with a flattened form-urlencoded body.
    ///
    /// # Errors
    ///
    /// Encoding failures (file values), transport failures, non-2xx status.
    pub async fn post(
        &self,
        path: &str,
        query: &Query,
        fields: &FormMap,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.url(path, query)?;
        let body = urlencoded_body(fields)?;
        let builder = self
            .http
            .post(url)
            .header(CONTENT_TYPE, FORM_MIME)
            .body(body);
        self.execute(self.with_authorization(builder)).await
    }

    /// Issues an authenticated PUT with the body serialized as JSON as-is.
    ///
    /// # Errors
    ///
    /// Any transport failure or non-2xx status.
    pub async fn put<T: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Query,
        body: &T,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.url(path, query)?;
        let builder = self.http.put(url).json(body);
        self.execute(self.with_authorization(builder)).await
    }

    /// Issues a POST without authorization, body passed through as JSON.
    ///
    /// `overrides` merges over the request configuration with
    /// caller-supplied keys taking precedence.
    ///
    /// # Errors
    ///
    /// Any transport failure or non-2xx status.
    pub async fn post_no_auth<T: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Query,
        body: &T,
        overrides: Option<RequestOverrides>,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.url(path, query)?;
        let mut builder = self.http.post(url).json(body);
        if let Some(overrides) = overrides {
            if let Some(timeout) = overrides.timeout {
                builder = builder.timeout(timeout);
            }
            builder = builder.headers(overrides.headers);
        }
        self.execute(builder).await
    }

    /// Issues an authenticated DELETE, attaching `body` as JSON if present.
    ///
    /// # Errors
    ///
    /// Any transport failure or non-2xx status.
    pub async fn delete<T: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Query,
        body: Option<&T>,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.url(path, query)?;
        let mut builder = self.json_headers(self.http.delete(url));
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.execute(self.with_authorization(builder)).await
    }

    /// Issues an authenticated multipart POST with flattened fields.
    ///
    /// # Errors
    ///
    /// Encoding failures, transport failures, non-2xx status.
    pub async fn post_multipart(
        &self,
        path: &str,
        query: &Query,
        fields: &FormMap,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.url(path, query)?;
        let builder = self.http.post(url).multipart(multipart_form(fields)?);
        self.execute(self.with_authorization(builder)).await
    }

    /// Multipart POST reporting upload progress through `on_progress`.
    ///
    /// # Errors
    ///
    /// Encoding failures, transport failures, non-2xx status.
    pub async fn upload_multipart_with_progress(
        &self,
        path: &str,
        query: &Query,
        fields: &FormMap,
        on_progress: ProgressFn,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.url(path, query)?;
        let form = multipart_form_with_progress(fields, on_progress)?;
        let builder = self.http.post(url).multipart(form);
        self.execute(self.with_authorization(builder)).await
    }

    /// POST expecting a binary spreadsheet body, saved as `.xlsx`.
    ///
    /// When `finished` is false the save step is skipped but the response
    /// is still returned, so callers can poll a not-yet-ready export.
    ///
    /// # Errors
    ///
    /// Encoding, transport, status, or file-save failures.
    pub async fn download_excel_post(
        &self,
        path: &str,
        query: &Query,
        fields: &FormMap,
        file_name: Option<&str>,
        finished: bool,
    ) -> Result<Download, ClientError> {
        let response = self.post(path, query, fields).await?;
        let saved_to = if finished {
            let name = file_name.unwrap_or(DEFAULT_EXCEL_NAME);
            Some(save_download(&self.config.download_dir, name, ".xlsx", &response.body).await?)
        } else {
            None
        };
        Ok(Download { response, saved_to })
    }

    /// GET expecting a binary spreadsheet body, saved as `.xlsx`.
    ///
    /// # Errors
    ///
    /// Transport, status, or file-save failures.
    pub async fn download_excel_get(
        &self,
        path: &str,
        param: &str,
        query: &Query,
        file_name: &str,
    ) -> Result<Download, ClientError> {
        self.download_get(path, param, query, file_name, XLSX_MIME, ".xlsx")
            .await
    }

    /// GET expecting a legacy Excel body, saved as `.xls`.
    ///
    /// # Errors
    ///
    /// Transport, status, or file-save failures.
    pub async fn download_excel_get_xlsm(
        &self,
        path: &str,
        param: &str,
        query: &Query,
        file_name: &str,
    ) -> Result<Download, ClientError> {
        self.download_get(path, param, query, file_name, XLS_MIME, ".xls")
            .await
    }

    async fn download_get(
        &self,
        path: &str,
        param: &str,
        query: &Query,
        file_name: &str,
        mime: &str,
        extension: &str,
    ) -> Result<Download, ClientError> {
        let url = self.url(&join_param(path, param), query)?;
        let builder = self.http.get(url).header(CONTENT_TYPE, mime);
        let response = self.execute(self.with_authorization(builder)).await?;
        let saved_to =
            save_download(&self.config.download_dir, file_name, extension, &response.body).await?;
        Ok(Download {
            response,
            saved_to: Some(saved_to),
        })
    }

    fn url(&self, path: &str, query: &Query) -> Result<reqwest::Url, ClientError> {
        compose_url(&self.config.base_url, path, query)
    }

    fn json_headers(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header(ACCEPT, JSON_MIME)
            .header(CONTENT_TYPE, JSON_MIME)
    }

    /// Attaches the resolved bearer header, if a valid token exists.
    ///
    /// Absent, malformed, and expired tokens all leave the request
    /// unauthenticated rather than failing it.
    fn with_authorization(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match resolve_authorization(self.tokens.as_ref(), self.clock.now())
            .and_then(|value| HeaderValue::from_str(&value).ok())
        {
            Some(value) => builder.header(AUTHORIZATION, value),
            None => builder,
        }
    }

    /// Sends one request and settles it into a response or an error.
    ///
    /// On a 401 status the on-unauthorized hook runs before the error is
    /// returned; the error still propagates to the caller.
    async fn execute(&self, builder: reqwest::RequestBuilder) -> Result<ApiResponse, ClientError> {
        let timeout_ms = u64::try_from(self.config.timeout.as_millis()).unwrap_or(u64::MAX);
        let start = Instant::now();

        let response = builder
            .send()
            .await
            .map_err(|e| map_error(e, timeout_ms))?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(format!("failed to read body: {e}")))?
            .to_vec();

        let response = ApiResponse::new(status, headers, body, start.elapsed());
        if response.status.is_success() {
            return Ok(response);
        }

        if response.status.as_u16() == 401 {
            if let Some(hook) = &self.on_unauthorized {
                hook();
            }
        }

        Err(ClientError::Status {
            status: response.status,
            server_message: response.server_message(),
        })
    }
}

fn join_param(path: &str, param: &str) -> String {
    format!("{path}{param}")
}

/// Maps reqwest transport errors onto `ClientError`.
fn map_error(error: reqwest::Error, timeout_ms: u64) -> ClientError {
    if error.is_timeout() {
        return ClientError::Timeout { timeout_ms };
    }
    if error.is_connect() {
        return ClientError::Connect(error.to_string());
    }
    ClientError::Transport(error.to_string())
}
