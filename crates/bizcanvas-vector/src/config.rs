//! Vector store configuration types.

use serde::{Deserialize, Serialize};

/// Vector store backend configuration.
///
/// Wrapped in an `Option` at the composition root: `None` yields the
/// degraded [`crate::VectorStore::Unavailable`] mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum VectorStoreConfig {
    /// Qdrant vector database.
    Qdrant(QdrantConfig),
    /// In-memory brute-force store, for tests and local development.
    Memory,
}

impl VectorStoreConfig {
    /// Returns the backend name as a static string.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Qdrant(_) => "qdrant",
            Self::Memory => "memory",
        }
    }
}

/// Qdrant configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QdrantConfig {
    /// Qdrant endpoint URL.
    pub url: String,
    /// API key (optional for unauthenticated deployments).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Collection holding the chunk vectors.
    pub collection: String,
    /// Embedding dimensions, used when the collection is first created.
    pub dimensions: usize,
}

impl QdrantConfig {
    /// Creates a new Qdrant configuration.
    pub fn new(url: impl Into<String>, collection: impl Into<String>, dimensions: usize) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            collection: collection.into(),
            dimensions,
        }
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}
