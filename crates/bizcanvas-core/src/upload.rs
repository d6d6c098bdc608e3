//! Upload-boundary validation.
//!
//! Validation failures are reported as a structured [`UploadCheck`] rather
//! than an error, so the calling layer can surface a user-facing message.

use serde::{Deserialize, Serialize};

use crate::format::DocumentFormat;

/// Default maximum upload size: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Size and type constraints applied before extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadPolicy {
    /// Maximum accepted file size in bytes.
    pub max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Outcome of validating one upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadCheck {
    /// Whether the upload passed validation.
    pub valid: bool,

    /// Human-readable reason for rejection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadCheck {
    fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    fn rejected(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(reason.into()),
        }
    }
}

impl UploadPolicy {
    /// Creates a policy with a custom size limit.
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// Validates an upload's size and type.
    pub fn check(&self, filename: &str, mime_type: Option<&str>, size_bytes: u64) -> UploadCheck {
        if size_bytes > self.max_bytes {
            return UploadCheck::rejected(format!(
                "{filename} is too large ({} MB); the limit is {} MB",
                size_bytes / (1024 * 1024),
                self.max_bytes / (1024 * 1024),
            ));
        }

        if DocumentFormat::classify(mime_type, filename).is_none() {
            return UploadCheck::rejected(format!(
                "{filename} is not a supported document type; upload a PDF, Word, \
                 PowerPoint, Markdown, or plain-text file",
            ));
        }

        UploadCheck::ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_file_is_rejected() {
        let policy = UploadPolicy::default();
        let check = policy.check("deck.pdf", Some("application/pdf"), 15 * 1024 * 1024);
        assert!(!check.valid);
        let reason = check.error.unwrap();
        assert!(reason.contains("deck.pdf"));
        assert!(reason.contains("limit"));
    }

    #[test]
    fn unsupported_type_is_rejected() {
        let policy = UploadPolicy::default();
        let check = policy.check("data.xyz", None, 1024);
        assert!(!check.valid);
        assert!(check.error.unwrap().contains("data.xyz"));
    }

    #[test]
    fn valid_upload_passes() {
        let policy = UploadPolicy::default();
        let check = policy.check("notes.txt", Some("text/plain"), 1024);
        assert!(check.valid);
        assert!(check.error.is_none());
    }

    #[test]
    fn boundary_size_is_accepted() {
        let policy = UploadPolicy::new(1024);
        assert!(policy.check("a.txt", None, 1024).valid);
        assert!(!policy.check("a.txt", None, 1025).valid);
    }
}
