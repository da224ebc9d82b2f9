//! In-memory file payloads for uploads

use serde::{Deserialize, Serialize};

/// An opaque binary payload carried in a request body.
///
/// Holds the file content in memory together with the name and MIME type
/// presented to the server, mirroring what a form file field carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePart {
    /// File name reported in the multipart part.
    pub file_name: String,
    /// MIME type of the content.
    pub content_type: String,
    /// Raw file bytes.
    pub content: Vec<u8>,
}

impl FilePart {
    /// Creates a file part with the default binary content type.
    #[must_use]
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: "application/octet-stream".to_string(),
            content,
        }
    }

    /// Sets an explicit content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Size of the content in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns true if the content is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
