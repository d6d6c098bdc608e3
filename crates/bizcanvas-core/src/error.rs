//! Error types for the document pipeline.

use std::fmt;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during document pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File type not recognized; user-correctable by re-uploading in a
    /// supported format.
    #[error("unsupported format: {filename}")]
    UnsupportedFormat { filename: String },

    /// Recognized format but content unparsable or corrupt.
    #[error("extraction failed for {filename}: {message}")]
    Extraction { filename: String, message: String },

    /// Tokenizer misconfiguration or encode/decode failure.
    #[error("tokenization error: {0}")]
    Tokenization(String),

    /// Embedding backend unreachable, rate limited, or misconfigured.
    #[error("provider error: {provider}: {message}")]
    Provider { provider: String, message: String },

    /// Vector store operation failed.
    #[error("vector store error: {0}")]
    Store(String),

    /// Retrieval error.
    #[error("retrieval error: {0}")]
    Retrieval(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Creates an unsupported format error.
    pub fn unsupported_format(filename: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            filename: filename.into(),
        }
    }

    /// Creates an extraction error.
    pub fn extraction(filename: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Extraction {
            filename: filename.into(),
            message: message.to_string(),
        }
    }

    /// Creates a tokenization error.
    pub fn tokenization(message: impl fmt::Display) -> Self {
        Self::Tokenization(message.to_string())
    }

    /// Creates a provider error.
    pub fn provider(provider: impl fmt::Display, message: impl fmt::Display) -> Self {
        Self::Provider {
            provider: provider.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates a vector store error.
    pub fn store(message: impl fmt::Display) -> Self {
        Self::Store(message.to_string())
    }

    /// Creates a retrieval error.
    pub fn retrieval(message: impl fmt::Display) -> Self {
        Self::Retrieval(message.to_string())
    }

    /// Returns true if this error is retryable.
    ///
    /// Extraction and tokenization failures are deterministic for a given
    /// input; backend failures are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Provider { .. } | Self::Store(_))
    }
}
