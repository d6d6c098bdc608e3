//! Chunk records, visibility filters, the backend trait, and the
//! capability-checked store front.

use async_trait::async_trait;
use bizcanvas_core::EmbeddedChunk;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::TRACING_TARGET;
use crate::config::VectorStoreConfig;
use crate::error::VectorResult;
use crate::memory::MemoryBackend;
use crate::qdrant::QdrantBackend;

/// Persisted chunk attributes, stored alongside the vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkPayload {
    /// Owning document.
    pub document_id: Uuid,
    /// Owning canvas; `None` marks the chunk globally visible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas_id: Option<Uuid>,
    /// Field scope tag; `None` means unscoped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_key: Option<String>,
    /// Chunk text.
    pub content: String,
    /// Token count of the content.
    pub token_count: u32,
    /// Source filename.
    pub filename: String,
    /// Position within the document.
    pub chunk_index: u32,
    /// Total chunks produced from the document.
    pub total_chunks: u32,
}

/// A chunk as written to the store: id, payload, and embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Record id; upserts with the same id overwrite in place.
    pub id: Uuid,
    /// Chunk attributes.
    pub payload: ChunkPayload,
    /// Embedding vector.
    pub embedding: Vec<f32>,
}

impl From<EmbeddedChunk> for ChunkRecord {
    fn from(embedded: EmbeddedChunk) -> Self {
        let chunk = embedded.chunk;
        Self {
            id: chunk.id,
            payload: ChunkPayload {
                document_id: chunk.document_id,
                canvas_id: chunk.canvas_id,
                field_key: chunk.field_key,
                content: chunk.content,
                token_count: chunk.token_count,
                filename: chunk.metadata.filename,
                chunk_index: chunk.chunk_index,
                total_chunks: chunk.metadata.total_chunks,
            },
            embedding: embedded.embedding,
        }
    }
}

/// A search hit: payload plus similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// Record id.
    pub id: Uuid,
    /// Cosine similarity to the query vector.
    pub similarity: f32,
    /// Chunk attributes.
    pub payload: ChunkPayload,
}

/// Visibility filter for chunk searches.
///
/// Clauses compose with AND semantics; each clause also admits unscoped
/// chunks, so globally visible material is never filtered out:
///
/// - `field_key` matches chunks tagged with the key or untagged;
/// - `document_ids` matches chunks of the listed documents or chunks with
///   no owning canvas;
/// - `canvas_id` (consulted only when `document_ids` is absent) matches
///   chunks of that canvas or chunks with no owning canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkFilter {
    /// Field scope to match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_key: Option<String>,
    /// Explicit document selection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_ids: Option<Vec<Uuid>>,
    /// Owning-canvas scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas_id: Option<Uuid>,
}

impl ChunkFilter {
    /// Creates an empty filter matching every chunk.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts matches to a field scope (plus unscoped chunks).
    pub fn with_field_key(mut self, field_key: impl Into<String>) -> Self {
        self.field_key = Some(field_key.into());
        self
    }

    /// Restricts matches to explicit documents (plus globally visible
    /// chunks).
    pub fn with_document_ids(mut self, document_ids: Vec<Uuid>) -> Self {
        self.document_ids = Some(document_ids);
        self
    }

    /// Restricts matches to a canvas (plus globally visible chunks).
    pub fn with_canvas_id(mut self, canvas_id: Uuid) -> Self {
        self.canvas_id = Some(canvas_id);
        self
    }

    /// Evaluates the filter against one payload.
    pub fn matches(&self, payload: &ChunkPayload) -> bool {
        if let Some(field_key) = &self.field_key {
            let scoped = payload.field_key.as_ref().is_none_or(|k| k == field_key);
            if !scoped {
                return false;
            }
        }

        if let Some(document_ids) = &self.document_ids {
            document_ids.contains(&payload.document_id) || payload.canvas_id.is_none()
        } else if let Some(canvas_id) = &self.canvas_id {
            payload.canvas_id.is_none_or(|id| id == *canvas_id)
        } else {
            true
        }
    }
}

/// Trait for vector store backends.
#[async_trait]
pub trait VectorStoreBackend: Send + Sync {
    /// Upserts chunk records, keyed by id; re-upserting an id overwrites
    /// content, embedding, and payload in place.
    async fn upsert(&self, records: Vec<ChunkRecord>) -> VectorResult<()>;

    /// Searches for chunks similar to the query vector, filtered and
    /// ordered by descending cosine similarity.
    async fn search(
        &self,
        query: Vec<f32>,
        filter: &ChunkFilter,
        limit: usize,
    ) -> VectorResult<Vec<ScoredChunk>>;

    /// Deletes every chunk of a document. Zero matches is not an error.
    async fn delete_by_document(&self, document_id: Uuid) -> VectorResult<()>;

    /// Deletes every chunk of a canvas. Zero matches is not an error.
    async fn delete_by_canvas(&self, canvas_id: Uuid) -> VectorResult<()>;
}

/// Capability-checked vector store front.
///
/// Retrieval grounding is an enhancement, not a hard dependency: when no
/// backend is configured, writes no-op, searches return empty, and deletes
/// no-op, logged at diagnostic level only.
pub enum VectorStore {
    /// A configured backend.
    Configured(Box<dyn VectorStoreBackend>),
    /// No vector backend configured; all operations degrade.
    Unavailable,
}

impl VectorStore {
    /// Creates a store from optional configuration.
    pub async fn connect(config: Option<VectorStoreConfig>) -> VectorResult<Self> {
        let Some(config) = config else {
            tracing::debug!(
                target: TRACING_TARGET,
                "No vector backend configured; store operations will no-op"
            );
            return Ok(Self::Unavailable);
        };

        let backend: Box<dyn VectorStoreBackend> = match &config {
            VectorStoreConfig::Qdrant(cfg) => Box::new(QdrantBackend::new(cfg).await?),
            VectorStoreConfig::Memory => Box::new(MemoryBackend::new()),
        };

        tracing::info!(
            target: TRACING_TARGET,
            backend = %config.backend_name(),
            "Vector store initialized"
        );

        Ok(Self::Configured(backend))
    }

    /// Wraps an already-constructed backend.
    pub fn from_backend(backend: Box<dyn VectorStoreBackend>) -> Self {
        Self::Configured(backend)
    }

    /// Returns whether a backend is configured.
    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Configured(_))
    }

    /// Upserts chunk records; a no-op without a backend.
    pub async fn upsert(&self, records: Vec<ChunkRecord>) -> VectorResult<()> {
        match self {
            Self::Configured(backend) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    count = %records.len(),
                    "Upserting chunks"
                );
                backend.upsert(records).await
            }
            Self::Unavailable => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    count = %records.len(),
                    "Vector store unavailable; dropping upsert"
                );
                Ok(())
            }
        }
    }

    /// Searches for similar chunks; empty without a backend.
    pub async fn search(
        &self,
        query: Vec<f32>,
        filter: &ChunkFilter,
        limit: usize,
    ) -> VectorResult<Vec<ScoredChunk>> {
        match self {
            Self::Configured(backend) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    limit = %limit,
                    "Searching chunks"
                );
                backend.search(query, filter, limit).await
            }
            Self::Unavailable => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    "Vector store unavailable; returning empty search result"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Deletes a document's chunks; a no-op without a backend.
    pub async fn delete_by_document(&self, document_id: Uuid) -> VectorResult<()> {
        match self {
            Self::Configured(backend) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    document_id = %document_id,
                    "Deleting chunks by document"
                );
                backend.delete_by_document(document_id).await
            }
            Self::Unavailable => Ok(()),
        }
    }

    /// Deletes a canvas's chunks; a no-op without a backend.
    pub async fn delete_by_canvas(&self, canvas_id: Uuid) -> VectorResult<()> {
        match self {
            Self::Configured(backend) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    canvas_id = %canvas_id,
                    "Deleting chunks by canvas"
                );
                backend.delete_by_canvas(canvas_id).await
            }
            Self::Unavailable => Ok(()),
        }
    }
}

impl std::fmt::Debug for VectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configured(_) => f.debug_struct("VectorStore::Configured").finish(),
            Self::Unavailable => f.debug_struct("VectorStore::Unavailable").finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(canvas_id: Option<Uuid>, field_key: Option<&str>) -> ChunkPayload {
        ChunkPayload {
            document_id: Uuid::new_v4(),
            canvas_id,
            field_key: field_key.map(str::to_owned),
            content: "content".to_owned(),
            token_count: 2,
            filename: "file.txt".to_owned(),
            chunk_index: 0,
            total_chunks: 1,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = ChunkFilter::new();
        assert!(filter.matches(&payload(None, None)));
        assert!(filter.matches(&payload(Some(Uuid::new_v4()), Some("problem"))));
    }

    #[test]
    fn field_key_filter_admits_unscoped_chunks() {
        let filter = ChunkFilter::new().with_field_key("problem");
        assert!(filter.matches(&payload(None, Some("problem"))));
        assert!(filter.matches(&payload(None, None)));
        assert!(!filter.matches(&payload(None, Some("solution"))));
    }

    #[test]
    fn canvas_filter_admits_global_chunks() {
        let canvas = Uuid::new_v4();
        let filter = ChunkFilter::new().with_canvas_id(canvas);
        assert!(filter.matches(&payload(Some(canvas), None)));
        assert!(filter.matches(&payload(None, None)));
        assert!(!filter.matches(&payload(Some(Uuid::new_v4()), None)));
    }

    #[test]
    fn document_filter_overrides_canvas_filter() {
        let canvas = Uuid::new_v4();
        let mut selected = payload(Some(Uuid::new_v4()), None);
        selected.document_id = Uuid::new_v4();

        let filter = ChunkFilter::new()
            .with_document_ids(vec![selected.document_id])
            .with_canvas_id(canvas);

        // The selected document matches even though its canvas differs.
        assert!(filter.matches(&selected));
        // Global chunks still pass; other scoped chunks do not.
        assert!(filter.matches(&payload(None, None)));
        assert!(!filter.matches(&payload(Some(canvas), None)));
    }

    #[tokio::test]
    async fn unavailable_store_degrades_silently() {
        let store = VectorStore::connect(None).await.unwrap();
        assert!(!store.is_configured());

        store.upsert(Vec::new()).await.unwrap();
        let hits = store
            .search(vec![0.0; 4], &ChunkFilter::new(), 5)
            .await
            .unwrap();
        assert!(hits.is_empty());
        store.delete_by_document(Uuid::new_v4()).await.unwrap();
        store.delete_by_canvas(Uuid::new_v4()).await.unwrap();
    }
}
