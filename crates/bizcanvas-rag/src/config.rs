//! RAG pipeline configuration.

use bizcanvas_core::DEFAULT_MAX_UPLOAD_BYTES;
use serde::{Deserialize, Serialize};

/// Configuration for the RAG pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    /// Maximum chunk size in tokens.
    pub max_tokens: u32,

    /// Tokens of trailing context carried into the next chunk.
    pub overlap_tokens: u32,

    /// Default maximum chunks returned per query.
    pub default_limit: u32,

    /// Default minimum similarity score (0.0 to 1.0).
    pub similarity_threshold: f32,

    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: u64,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            max_tokens: 800,
            overlap_tokens: 100,
            default_limit: 5,
            similarity_threshold: 0.7,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl RagConfig {
    /// Sets the maximum chunk size in tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the chunk overlap in tokens.
    pub fn with_overlap_tokens(mut self, overlap_tokens: u32) -> Self {
        self.overlap_tokens = overlap_tokens;
        self
    }

    /// Sets the default result limit.
    pub fn with_default_limit(mut self, default_limit: u32) -> Self {
        self.default_limit = default_limit;
        self
    }

    /// Sets the default similarity threshold.
    pub fn with_similarity_threshold(mut self, similarity_threshold: f32) -> Self {
        self.similarity_threshold = similarity_threshold;
        self
    }

    /// Sets the maximum upload size in bytes.
    pub fn with_max_upload_bytes(mut self, max_upload_bytes: u64) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}
