//! Extracted document types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Metadata describing an extracted document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Original filename of the upload.
    pub filename: String,

    /// Declared MIME type, if one was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Page count, where the format has a notion of pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,

    /// When the extraction ran.
    pub extracted_at: Timestamp,
}

impl DocumentMetadata {
    /// Creates metadata for a freshly extracted document.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: None,
            page_count: None,
            extracted_at: Timestamp::now(),
        }
    }

    /// Sets the declared MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Sets the page count.
    pub fn with_page_count(mut self, page_count: u32) -> Self {
        self.page_count = Some(page_count);
        self
    }
}

/// Result of text extraction from one uploaded file.
///
/// Created once per upload and immediately consumed by the chunker; only
/// the derived chunks are persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Full extracted plain text.
    pub text: String,

    /// Extraction metadata.
    pub metadata: DocumentMetadata,
}

impl ExtractedDocument {
    /// Creates a new extracted document.
    pub fn new(text: impl Into<String>, metadata: DocumentMetadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }

    /// Returns whether any text was extracted.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
