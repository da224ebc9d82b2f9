//! URL and query-string composition
//!
//! Every facade entry point builds its target URL here. The query rules:
//! an absent/blank/empty query leaves the path unmodified; a non-blank
//! literal string is appended verbatim after `?`; a non-empty mapping is
//! flattened and urlencoded. Literal strings are never parsed as mappings.

use trellis_domain::{flatten, DomainError, Query};
use url::Url;

use crate::error::ClientError;

/// Composes the absolute request URL from base, path and query.
///
/// The path is concatenated onto the base: trailing slashes of the base and
/// leading slashes of the path collapse to a single separator.
///
/// # Errors
///
/// Returns `ClientError::InvalidUrl` when the combined string does not
/// parse, and `ClientError::Body` when a query mapping contains a file
/// value.
pub fn compose_url(base: &Url, path: &str, query: &Query) -> Result<Url, ClientError> {
    let combined = combine(base, path);
    let mut target =
        Url::parse(&combined).map_err(|e| ClientError::InvalidUrl(format!("{e}: {combined}")))?;

    if query.is_empty() {
        return Ok(target);
    }

    match query {
        Query::None => {}
        Query::Raw(raw) => target.set_query(Some(raw.trim())),
        Query::Form(map) => {
            let fields = flatten(map);
            let mut pairs = Vec::with_capacity(fields.len());
            for field in &fields {
                let text = field.as_text().ok_or_else(|| {
                    DomainError::FileInUrlencodedBody {
                        field: field.name.clone(),
                    }
                })?;
                pairs.push((field.name.as_str(), text));
            }
            let encoded = serde_urlencoded::to_string(&pairs)
                .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
            target.set_query(Some(&encoded));
        }
    }

    Ok(target)
}

fn combine(base: &Url, path: &str) -> String {
    let base = base.as_str().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}
