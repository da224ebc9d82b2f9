//! Query parameter variants
//!
//! The query argument accepted by every facade entry point is one of three
//! shapes: absent, a literal string appended verbatim, or a key/value
//! mapping serialized through the standard flattening. Modelling it as a
//! tagged variant keeps that distinction explicit: a literal string is never
//! reinterpreted as a mapping.

use serde::{Deserialize, Serialize};

use crate::form::FormMap;

/// The query component of a request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Query {
    /// No query; the path is left unmodified.
    #[default]
    None,
    /// A literal query string, appended after `?` exactly as given.
    Raw(String),
    /// A key/value mapping, flattened and urlencoded.
    Form(FormMap),
}

impl Query {
    /// Returns true when this query leaves the path unmodified.
    ///
    /// A blank literal string and an empty mapping both count as empty,
    /// matching the absent case.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Raw(s) => s.trim().is_empty(),
            Self::Form(map) => map.is_empty(),
        }
    }
}

impl From<&str> for Query {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_string())
    }
}

impl From<String> for Query {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

impl From<FormMap> for Query {
    fn from(value: FormMap) -> Self {
        Self::Form(value)
    }
}
