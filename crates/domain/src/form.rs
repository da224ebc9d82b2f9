//! Recursive form values and name-path flattening
//!
//! A request body destined for form-urlencoded or multipart transport is
//! modelled as a tree of [`FormValue`]s. [`flatten`] turns the tree into the
//! flat name/value sequence that form parsers reconstruct on the server
//! side, using the `a[0]` / `a.b` naming convention: numeric keys flatten
//! array-style, everything else dot-style.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::file::FilePart;

/// A nested key/value mapping used as a request body or query mapping.
pub type FormMap = BTreeMap<String, FormValue>;

/// A single value in a form tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FormValue {
    /// A text value, sent as-is.
    Text(String),
    /// An integer value.
    Int(i64),
    /// A floating point value.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// An instant, encoded as an ISO-8601 string with millisecond precision.
    Timestamp(DateTime<Utc>),
    /// A single file. Terminal: never recursed into.
    File(FilePart),
    /// A multi-file field: one entry per file under the same flattened name.
    Files(Vec<FilePart>),
    /// A nested sequence. Indices flatten array-style (`name[0]`).
    List(Vec<FormValue>),
    /// A nested mapping. Keys flatten dot-style (`name.key`).
    Map(FormMap),
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FormValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for FormValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FormValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<Utc>> for FormValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<FilePart> for FormValue {
    fn from(value: FilePart) -> Self {
        Self::File(value)
    }
}

impl From<Vec<FilePart>> for FormValue {
    fn from(value: Vec<FilePart>) -> Self {
        Self::Files(value)
    }
}

/// A flattened name/value pair ready for transport encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatField {
    /// The flattened field name (e.g. `a.b`, `a.c[0]`).
    pub name: String,
    /// The field payload.
    pub value: FieldValue,
}

/// The payload of a flattened field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A textual value.
    Text(String),
    /// A file payload. Only representable in multipart transport.
    File(FilePart),
}

impl FlatField {
    fn text(name: String, value: impl Into<String>) -> Self {
        Self {
            name,
            value: FieldValue::Text(value.into()),
        }
    }

    fn file(name: String, part: FilePart) -> Self {
        Self {
            name,
            value: FieldValue::File(part),
        }
    }

    /// Returns the textual value, if this field is not a file.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            FieldValue::Text(s) => Some(s),
            FieldValue::File(_) => None,
        }
    }
}

/// Flattens a nested mapping into an ordered sequence of name/value pairs.
///
/// The first call carries no namespace, so top-level keys appear bare.
/// Nested maps and lists recurse with their flattened name as the new
/// namespace. Mapping iteration is `BTreeMap` key order, which keeps the
/// output deterministic.
#[must_use]
pub fn flatten(map: &FormMap) -> Vec<FlatField> {
    let mut fields = Vec::new();
    for (key, value) in map {
        flatten_value(None, key, value, &mut fields);
    }
    fields
}

/// Computes a flattened field name from a namespace and a key.
///
/// Numeric keys use bracket notation so server-side parsers rebuild them as
/// sequence indices; all other keys use dot notation.
fn field_name(namespace: Option<&str>, key: &str) -> String {
    match namespace {
        Some(ns) if is_numeric_key(key) => format!("{ns}[{key}]"),
        Some(ns) => format!("{ns}.{key}"),
        None => key.to_string(),
    }
}

fn is_numeric_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

fn flatten_value(namespace: Option<&str>, key: &str, value: &FormValue, out: &mut Vec<FlatField>) {
    let name = field_name(namespace, key);
    match value {
        FormValue::Text(s) => out.push(FlatField::text(name, s.clone())),
        FormValue::Int(i) => out.push(FlatField::text(name, i.to_string())),
        FormValue::Float(f) => out.push(FlatField::text(name, f.to_string())),
        FormValue::Bool(b) => out.push(FlatField::text(name, b.to_string())),
        FormValue::Timestamp(ts) => out.push(FlatField::text(
            name,
            ts.to_rfc3339_opts(SecondsFormat::Millis, true),
        )),
        FormValue::File(part) => out.push(FlatField::file(name, part.clone())),
        FormValue::Files(parts) => {
            for part in parts {
                out.push(FlatField::file(name.clone(), part.clone()));
            }
        }
        FormValue::List(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_value(Some(&name), &index.to_string(), item, out);
            }
        }
        FormValue::Map(map) => {
            for (child_key, child) in map {
                flatten_value(Some(&name), child_key, child, out);
            }
        }
    }
}
