//! In-memory backend for tests and local development.
//!
//! Stores chunks in a map and searches by brute-force cosine similarity.
//! Not suitable for production collections, but it makes the pipeline
//! testable without a running vector database.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::TRACING_TARGET;
use crate::error::VectorResult;
use crate::store::{ChunkFilter, ChunkRecord, ScoredChunk, VectorStoreBackend};

/// In-memory vector store backend.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    chunks: Arc<RwLock<HashMap<Uuid, ChunkRecord>>>,
}

impl MemoryBackend {
    /// Creates an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored chunks.
    pub async fn len(&self) -> usize {
        self.chunks.read().await.len()
    }

    /// Returns whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.chunks.read().await.is_empty()
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot / (norm_a * norm_b)
    }
}

#[async_trait]
impl VectorStoreBackend for MemoryBackend {
    async fn upsert(&self, records: Vec<ChunkRecord>) -> VectorResult<()> {
        let mut chunks = self.chunks.write().await;
        for record in records {
            chunks.insert(record.id, record);
        }
        Ok(())
    }

    async fn search(
        &self,
        query: Vec<f32>,
        filter: &ChunkFilter,
        limit: usize,
    ) -> VectorResult<Vec<ScoredChunk>> {
        let chunks = self.chunks.read().await;

        let mut scored: Vec<ScoredChunk> = chunks
            .values()
            .filter(|record| filter.matches(&record.payload))
            .map(|record| ScoredChunk {
                id: record.id,
                similarity: Self::cosine_similarity(&query, &record.embedding),
                payload: record.payload.clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(limit);

        Ok(scored)
    }

    async fn delete_by_document(&self, document_id: Uuid) -> VectorResult<()> {
        let mut chunks = self.chunks.write().await;
        let before = chunks.len();
        chunks.retain(|_, record| record.payload.document_id != document_id);

        tracing::debug!(
            target: TRACING_TARGET,
            document_id = %document_id,
            deleted = %(before - chunks.len()),
            "Deleted chunks by document"
        );
        Ok(())
    }

    async fn delete_by_canvas(&self, canvas_id: Uuid) -> VectorResult<()> {
        let mut chunks = self.chunks.write().await;
        let before = chunks.len();
        chunks.retain(|_, record| record.payload.canvas_id != Some(canvas_id));

        tracing::debug!(
            target: TRACING_TARGET,
            canvas_id = %canvas_id,
            deleted = %(before - chunks.len()),
            "Deleted chunks by canvas"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::store::ChunkPayload;

    use super::*;

    fn record(id: Uuid, document_id: Uuid, embedding: Vec<f32>, content: &str) -> ChunkRecord {
        ChunkRecord {
            id,
            payload: ChunkPayload {
                document_id,
                canvas_id: None,
                field_key: None,
                content: content.to_owned(),
                token_count: content.split_whitespace().count() as u32,
                filename: "doc.txt".to_owned(),
                chunk_index: 0,
                total_chunks: 1,
            },
            embedding,
        }
    }

    #[tokio::test]
    async fn upsert_is_idempotent_by_id() {
        let backend = MemoryBackend::new();
        let id = Uuid::new_v4();
        let document_id = Uuid::new_v4();

        backend
            .upsert(vec![record(id, document_id, vec![1.0, 0.0], "old text")])
            .await
            .unwrap();
        backend
            .upsert(vec![record(id, document_id, vec![0.0, 1.0], "new text")])
            .await
            .unwrap();

        assert_eq!(backend.len().await, 1);
        let hits = backend
            .search(vec![0.0, 1.0], &ChunkFilter::new(), 10)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].payload.content, "new text");
    }

    #[tokio::test]
    async fn search_orders_by_descending_similarity() {
        let backend = MemoryBackend::new();
        let document_id = Uuid::new_v4();

        backend
            .upsert(vec![
                record(Uuid::new_v4(), document_id, vec![1.0, 0.0], "aligned"),
                record(Uuid::new_v4(), document_id, vec![0.0, 1.0], "orthogonal"),
                record(Uuid::new_v4(), document_id, vec![0.7, 0.7], "diagonal"),
            ])
            .await
            .unwrap();

        let hits = backend
            .search(vec![1.0, 0.0], &ChunkFilter::new(), 10)
            .await
            .unwrap();

        let contents: Vec<&str> = hits.iter().map(|h| h.payload.content.as_str()).collect();
        assert_eq!(contents, ["aligned", "diagonal", "orthogonal"]);
        assert!(hits[0].similarity > hits[1].similarity);
        assert!(hits[1].similarity > hits[2].similarity);
    }

    #[tokio::test]
    async fn search_respects_limit_and_filter() {
        let backend = MemoryBackend::new();
        let wanted = Uuid::new_v4();
        let mut scoped = record(Uuid::new_v4(), wanted, vec![1.0, 0.0], "wanted");
        scoped.payload.canvas_id = Some(Uuid::new_v4());

        let mut other = record(Uuid::new_v4(), Uuid::new_v4(), vec![1.0, 0.0], "other");
        other.payload.canvas_id = Some(Uuid::new_v4());

        backend.upsert(vec![scoped, other]).await.unwrap();

        let filter = ChunkFilter::new().with_document_ids(vec![wanted]);
        let hits = backend.search(vec![1.0, 0.0], &filter, 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].payload.content, "wanted");
    }

    #[tokio::test]
    async fn delete_by_document_removes_only_that_document() {
        let backend = MemoryBackend::new();
        let keep = Uuid::new_v4();
        let drop = Uuid::new_v4();

        backend
            .upsert(vec![
                record(Uuid::new_v4(), keep, vec![1.0, 0.0], "keep"),
                record(Uuid::new_v4(), drop, vec![1.0, 0.0], "drop a"),
                record(Uuid::new_v4(), drop, vec![0.0, 1.0], "drop b"),
            ])
            .await
            .unwrap();

        backend.delete_by_document(drop).await.unwrap();
        assert_eq!(backend.len().await, 1);

        // Deleting again matches nothing and must not error.
        backend.delete_by_document(drop).await.unwrap();
    }

    #[tokio::test]
    async fn delete_by_canvas_spares_global_chunks() {
        let backend = MemoryBackend::new();
        let canvas = Uuid::new_v4();

        let mut scoped = record(Uuid::new_v4(), Uuid::new_v4(), vec![1.0], "scoped");
        scoped.payload.canvas_id = Some(canvas);
        let global = record(Uuid::new_v4(), Uuid::new_v4(), vec![1.0], "global");

        backend.upsert(vec![scoped, global]).await.unwrap();
        backend.delete_by_canvas(canvas).await.unwrap();

        assert_eq!(backend.len().await, 1);
        let hits = backend
            .search(vec![1.0], &ChunkFilter::new(), 10)
            .await
            .unwrap();
        assert_eq!(hits[0].payload.content, "global");
    }
}
