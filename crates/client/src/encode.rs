//! Transport encoding of flattened form fields
//!
//! Builds form-urlencoded and multipart bodies from a [`FormMap`], after
//! flattening it to name/value pairs. The multipart builder has a progress
//! variant that streams file bytes through a counter so uploads can report
//! cumulative progress.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use trellis_domain::{flatten, DomainError, FieldValue, FilePart, FormMap};

use crate::error::ClientError;

/// Chunk size for streamed file parts.
const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;

/// Cumulative upload progress across all file parts of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    /// File bytes handed to the transport so far.
    pub sent: u64,
    /// Total file bytes in the request.
    pub total: u64,
}

/// Callback invoked as upload progress advances.
pub type ProgressFn = Arc<dyn Fn(UploadProgress) + Send + Sync>;

/// Encodes a mapping as a form-urlencoded body string.
///
/// # Errors
///
/// Returns an error when the mapping contains a file value; urlencoded
/// transport cannot carry file content.
pub fn urlencoded_body(map: &FormMap) -> Result<String, ClientError> {
    let fields = flatten(map);
    let mut pairs = Vec::with_capacity(fields.len());
    for field in &fields {
        let text = field
            .as_text()
            .ok_or_else(|| DomainError::FileInUrlencodedBody {
                field: field.name.clone(),
            })?;
        pairs.push((field.name.as_str(), text));
    }
    serde_urlencoded::to_string(&pairs).map_err(|e| ClientError::Transport(e.to_string()))
}

/// Builds a multipart form from a mapping.
///
/// Text fields become plain parts; file fields become byte parts carrying
/// the file name and MIME type. Repeated names (multi-file fields) become
/// repeated parts, in order.
///
/// # Errors
///
/// Returns an error when a part's MIME type string is invalid.
pub fn multipart_form(map: &FormMap) -> Result<Form, ClientError> {
    let mut form = Form::new();
    for field in flatten(map) {
        match field.value {
            FieldValue::Text(text) => form = form.text(field.name, text),
            FieldValue::File(part) => {
                let mime = resolve_mime(&part);
                let file_part = Part::bytes(part.content)
                    .file_name(part.file_name)
                    .mime_str(&mime)
                    .map_err(|e| ClientError::Transport(format!("invalid MIME type: {e}")))?;
                form = form.part(field.name, file_part);
            }
        }
    }
    Ok(form)
}

/// Builds a multipart form whose file parts report upload progress.
///
/// Each file's bytes are split into fixed-size chunks and streamed; as the
/// transport pulls a chunk, the shared counter advances and `on_progress`
/// fires with the cumulative count. Text fields do not contribute to the
/// total.
///
/// # Errors
///
/// Returns an error when a part's MIME type string is invalid.
pub fn multipart_form_with_progress(
    map: &FormMap,
    on_progress: ProgressFn,
) -> Result<Form, ClientError> {
    let fields = flatten(map);
    let total: u64 = fields
        .iter()
        .map(|f| match &f.value {
            FieldValue::File(p) => p.content.len() as u64,
            FieldValue::Text(_) => 0,
        })
        .sum();
    let sent = Arc::new(AtomicU64::new(0));

    let mut form = Form::new();
    for field in fields {
        match field.value {
            FieldValue::Text(text) => form = form.text(field.name, text),
            FieldValue::File(part) => {
                let mime = resolve_mime(&part);
                let length = part.content.len() as u64;
                let chunks: Vec<Result<Vec<u8>, std::io::Error>> = part
                    .content
                    .chunks(UPLOAD_CHUNK_BYTES)
                    .map(|chunk| Ok(chunk.to_vec()))
                    .collect();

                let counter = Arc::clone(&sent);
                let callback = Arc::clone(&on_progress);
                let stream = futures::stream::iter(chunks).inspect(move |chunk| {
                    if let Ok(bytes) = chunk {
                        let sent = counter.fetch_add(bytes.len() as u64, Ordering::Relaxed)
                            + bytes.len() as u64;
                        callback(UploadProgress { sent, total });
                    }
                });

                let file_part = Part::stream_with_length(reqwest::Body::wrap_stream(stream), length)
                    .file_name(part.file_name)
                    .mime_str(&mime)
                    .map_err(|e| ClientError::Transport(format!("invalid MIME type: {e}")))?;
                form = form.part(field.name, file_part);
            }
        }
    }
    Ok(form)
}

/// Picks the MIME type for a file part, guessing from the file name when
/// the part carries only the default binary type.
fn resolve_mime(part: &FilePart) -> String {
    if part.content_type == "application/octet-stream" {
        mime_guess::from_path(&part.file_name)
            .first_or_octet_stream()
            .to_string()
    } else {
        part.content_type.clone()
    }
}
