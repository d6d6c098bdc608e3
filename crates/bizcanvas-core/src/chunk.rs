//! Document chunk and retrieval result types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Derives the identifier for a chunk from its document and position.
///
/// Ids are UUIDv5 over `(document_id, chunk_index)` so that re-chunking a
/// document after a cancelled or failed ingest overwrites the same records
/// instead of accumulating duplicates.
pub fn chunk_id(document_id: &Uuid, chunk_index: u32) -> Uuid {
    Uuid::new_v5(document_id, &chunk_index.to_be_bytes())
}

/// Positional metadata carried by every chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Source filename.
    pub filename: String,

    /// Zero-based position within the document's chunk sequence.
    pub chunk_index: u32,

    /// Total chunks produced from the document. Back-filled once the full
    /// sequence is known.
    pub total_chunks: u32,
}

/// The atomic retrievable unit: a token-bounded slice of one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Unique identifier, derived via [`chunk_id`].
    pub id: Uuid,

    /// Owning document. Stable across re-chunking.
    pub document_id: Uuid,

    /// Owning canvas; `None` marks the chunk globally visible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas_id: Option<Uuid>,

    /// Field scope tag; `None` means visible to all field queries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_key: Option<String>,

    /// Zero-based position within the document.
    pub chunk_index: u32,

    /// Chunk text.
    pub content: String,

    /// Token count of `content` under the configured tokenizer.
    pub token_count: u32,

    /// Positional metadata.
    pub metadata: ChunkMetadata,
}

/// A [`DocumentChunk`] paired with its embedding vector.
///
/// The embedding length is fixed by the model configuration; mixing models
/// without re-embedding breaks similarity comparability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedChunk {
    /// The chunk.
    pub chunk: DocumentChunk,

    /// Embedding vector.
    pub embedding: Vec<f32>,
}

impl EmbeddedChunk {
    /// Pairs a chunk with its embedding.
    pub fn new(chunk: DocumentChunk, embedding: Vec<f32>) -> Self {
        Self { chunk, embedding }
    }
}

/// A chunk returned from retrieval, with its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Chunk text.
    pub content: String,

    /// Cosine similarity to the query (higher is more similar).
    pub similarity: f32,

    /// Positional metadata.
    pub metadata: ChunkMetadata,
}

/// A retrieval response. Produced fresh per query, never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagResult {
    /// Retrieved chunks, similarity-descending before any per-document
    /// diversity grouping is applied.
    pub chunks: Vec<RetrievedChunk>,

    /// Candidates considered before threshold filtering.
    pub total_chunks: usize,
}

impl RagResult {
    /// An empty result, as returned in degraded mode.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns whether any chunks were retrieved.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
