//! Trellis Client - HTTP facade over reqwest
//!
//! This crate provides a uniform, promise-style request interface over one
//! configured `reqwest::Client`: URL and query composition, bearer-token
//! header injection, body encoding for JSON / form-urlencoded / multipart
//! transport, spreadsheet download-and-save helpers, and an
//! on-unauthorized hook invoked for 401 responses.

pub mod clock;
pub mod config;
pub mod encode;
pub mod error;
pub mod facade;
pub mod save;
pub mod token;
pub mod url;

pub use clock::{Clock, SystemClock};
pub use config::ClientConfig;
pub use encode::{ProgressFn, UploadProgress};
pub use error::{ClientError, ClientResult};
pub use facade::{ApiClient, Download, RequestOverrides};
pub use token::{resolve_authorization, FileTokenStore, MemoryTokenStore, TokenProvider};
