//! Trellis Domain - Core request/response types
//!
//! This crate defines the pure data model for the Trellis client toolkit:
//! query variants, recursive form values and their flattening, the bearer
//! access token, and response shapes. All types here are plain Rust with no
//! I/O dependencies.

pub mod auth;
pub mod error;
pub mod file;
pub mod form;
pub mod query;
pub mod response;

pub use auth::AccessToken;
pub use error::{DomainError, DomainResult};
pub use file::FilePart;
pub use form::{flatten, FieldValue, FlatField, FormMap, FormValue};
pub use query::Query;
pub use response::{ApiResponse, StatusCode};
