//! Document format classification.
//!
//! Extraction dispatches on a closed [`DocumentFormat`] enum resolved once
//! by [`DocumentFormat::classify`]; adding a format is a single variant
//! plus one classifier rule.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Supported document formats for text extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, EnumIter)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// PDF documents.
    Pdf,
    /// OOXML word-processor documents (`.docx`).
    Docx,
    /// Legacy binary Word documents (`.doc`).
    Doc,
    /// OOXML presentations (`.pptx`).
    Pptx,
    /// Markdown, read verbatim.
    Markdown,
    /// Plain text, read verbatim.
    PlainText,
}

impl DocumentFormat {
    /// Classifies an upload from its declared MIME type and filename.
    ///
    /// The MIME type wins when it names a supported format; generic or
    /// absent MIME types fall back to the filename extension. Returns
    /// `None` when neither matches a supported format.
    pub fn classify(mime_type: Option<&str>, filename: &str) -> Option<Self> {
        if let Some(mime) = mime_type
            && let Some(format) = Self::from_mime(mime)
        {
            return Some(format);
        }
        Self::from_extension(filename)
    }

    fn from_mime(mime: &str) -> Option<Self> {
        // Parameters like `; charset=utf-8` are not part of the essence.
        let essence = mime.split(';').next().unwrap_or(mime).trim();
        match essence {
            "application/pdf" => Some(Self::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(Self::Docx)
            }
            "application/msword" => Some(Self::Doc),
            "application/vnd.openxmlformats-officedocument.presentationml.presentation" => {
                Some(Self::Pptx)
            }
            "text/markdown" => Some(Self::Markdown),
            "text/plain" => Some(Self::PlainText),
            _ => None,
        }
    }

    fn from_extension(filename: &str) -> Option<Self> {
        let extension = filename.rsplit_once('.').map(|(_, ext)| ext)?;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "doc" => Some(Self::Doc),
            "pptx" => Some(Self::Pptx),
            "md" | "markdown" => Some(Self::Markdown),
            "txt" => Some(Self::PlainText),
            _ => None,
        }
    }

    /// Returns whether this format is read verbatim as UTF-8.
    pub fn is_plain(&self) -> bool {
        matches!(self, Self::PlainText | Self::Markdown)
    }
}
