#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod doc;
mod office;
mod pdf;
mod text;

use bizcanvas_core::{DocumentFormat, DocumentMetadata, Error, ExtractedDocument, Result};
use bytes::Bytes;

/// Tracing target for extraction operations.
pub const TRACING_TARGET: &str = "bizcanvas_extract";

/// Text extractor dispatching on document format.
///
/// Stateless and cheap to construct; blocking format parsers run under
/// `spawn_blocking` so extraction can be awaited from request handlers.
#[derive(Debug, Clone, Default)]
pub struct Extractor;

impl Extractor {
    /// Creates a new extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extracts plain text and metadata from an uploaded file.
    ///
    /// Fails with [`Error::UnsupportedFormat`] when neither the MIME type
    /// nor the filename extension matches a supported format, and with
    /// [`Error::Extraction`] when a recognized format's content is
    /// malformed.
    pub async fn extract(
        &self,
        bytes: Bytes,
        filename: &str,
        mime_type: Option<&str>,
    ) -> Result<ExtractedDocument> {
        let format = DocumentFormat::classify(mime_type, filename)
            .ok_or_else(|| Error::unsupported_format(filename))?;

        tracing::debug!(
            target: TRACING_TARGET,
            filename = %filename,
            format = %format,
            size = %bytes.len(),
            "Extracting document"
        );

        let (text, page_count) = match format {
            DocumentFormat::Pdf => pdf::extract(bytes, filename).await?,
            DocumentFormat::Docx => office::extract_docx(bytes, filename).await?,
            DocumentFormat::Pptx => office::extract_pptx(bytes, filename).await?,
            DocumentFormat::Doc => doc::extract(bytes, filename)?,
            DocumentFormat::PlainText | DocumentFormat::Markdown => text::extract(&bytes),
        };

        let mut metadata = DocumentMetadata::new(filename);
        if let Some(mime) = mime_type {
            metadata = metadata.with_mime_type(mime);
        }
        if let Some(pages) = page_count {
            metadata = metadata.with_page_count(pages);
        }

        Ok(ExtractedDocument::new(text, metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unsupported_format_is_rejected() {
        let extractor = Extractor::new();
        let result = extractor
            .extract(Bytes::from_static(b"payload"), "data.xyz", None)
            .await;

        assert!(matches!(
            result,
            Err(Error::UnsupportedFormat { filename }) if filename == "data.xyz"
        ));
    }

    #[tokio::test]
    async fn plain_text_is_read_verbatim() {
        let extractor = Extractor::new();
        let doc = extractor
            .extract(
                Bytes::from_static(b"first paragraph\n\nsecond paragraph"),
                "notes.txt",
                Some("text/plain"),
            )
            .await
            .unwrap();

        assert_eq!(doc.text, "first paragraph\n\nsecond paragraph");
        assert_eq!(doc.metadata.filename, "notes.txt");
        assert_eq!(doc.metadata.mime_type.as_deref(), Some("text/plain"));
        assert!(doc.metadata.page_count.is_none());
    }

    #[tokio::test]
    async fn corrupt_pdf_reports_filename() {
        let extractor = Extractor::new();
        let result = extractor
            .extract(Bytes::from_static(b"not a pdf at all"), "broken.pdf", None)
            .await;

        match result {
            Err(Error::Extraction { filename, .. }) => assert_eq!(filename, "broken.pdf"),
            other => panic!("expected extraction error, got {other:?}"),
        }
    }
}
