//! PDF text extraction.
//!
//! Uses pdf-extract for the page text and lopdf for the page count.

use bizcanvas_core::{Error, Result};
use bytes::Bytes;

/// Extracts concatenated page text and the page count from a PDF.
pub(crate) async fn extract(bytes: Bytes, filename: &str) -> Result<(String, Option<u32>)> {
    let name = filename.to_owned();

    tokio::task::spawn_blocking(move || {
        let text = pdf_extract::extract_text_from_mem(&bytes)
            .map_err(|e| Error::extraction(&name, e))?;

        // pdf-extract does not report pagination; a second lightweight parse
        // recovers it. Failure here is not fatal since the text already
        // parsed.
        let page_count = lopdf::Document::load_mem(&bytes)
            .ok()
            .map(|doc| doc.get_pages().len() as u32);

        Ok((text, page_count))
    })
    .await
    .map_err(|e| Error::extraction(filename, format!("extraction task failed: {e}")))?
}
