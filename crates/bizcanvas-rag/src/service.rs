//! High-level RAG service: ingest, retrieve, and cascade deletes.

use std::sync::Arc;

use bizcanvas_core::{
    ChunkMetadata, EmbeddedChunk, Error, RagResult, Result, RetrievedChunk, UploadCheck,
    UploadPolicy,
};
use bizcanvas_extract::Extractor;
use bizcanvas_vector::{ChunkFilter, ChunkRecord, ScoredChunk, VectorStore};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::TRACING_TARGET;
use crate::chunker::{ChunkOptions, Chunker};
use crate::config::RagConfig;
use crate::embedding::Embedder;
use crate::tokenizer::Tokenizer;

/// Summary of one document ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Chunks written to the vector store.
    pub chunk_count: u32,
    /// Total tokens across the written chunks.
    pub token_total: u32,
}

/// One file of a multi-file ingestion.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    /// Raw file bytes.
    pub bytes: Bytes,
    /// Original filename.
    pub filename: String,
    /// Declared MIME type.
    pub mime_type: Option<String>,
    /// Document identifier minted by the caller.
    pub document_id: Uuid,
    /// Owning canvas; `None` makes the chunks globally visible.
    pub canvas_id: Option<Uuid>,
    /// Field scope tag.
    pub field_key: Option<String>,
}

/// Per-file result of a multi-file ingestion.
#[derive(Debug)]
pub struct IngestOutcome {
    /// Original filename.
    pub filename: String,
    /// Document identifier.
    pub document_id: Uuid,
    /// The ingestion result; failures do not abort other files.
    pub result: Result<IngestReport>,
}

/// Options for one retrieval query.
///
/// Unset limit and threshold fall back to the service [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetrieveOptions {
    /// Owning-canvas scope.
    pub canvas_id: Option<Uuid>,
    /// Explicit document selection; overrides the canvas scope.
    pub document_ids: Option<Vec<Uuid>>,
    /// Field scope tag.
    pub field_key: Option<String>,
    /// Maximum chunks to return.
    pub limit: Option<u32>,
    /// Minimum similarity score.
    pub similarity_threshold: Option<f32>,
    /// Per-source diversity cap: at most this many chunks per filename.
    pub chunks_per_document: Option<u32>,
}

impl RetrieveOptions {
    /// Creates options with the service defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scopes retrieval to a canvas (plus globally visible chunks).
    pub fn with_canvas_id(mut self, canvas_id: Uuid) -> Self {
        self.canvas_id = Some(canvas_id);
        self
    }

    /// Scopes retrieval to explicit documents (plus globally visible
    /// chunks).
    pub fn with_document_ids(mut self, document_ids: Vec<Uuid>) -> Self {
        self.document_ids = Some(document_ids);
        self
    }

    /// Scopes retrieval to a field key (plus unscoped chunks).
    pub fn with_field_key(mut self, field_key: impl Into<String>) -> Self {
        self.field_key = Some(field_key.into());
        self
    }

    /// Sets the result limit.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the similarity threshold.
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = Some(threshold);
        self
    }

    /// Caps how many chunks any single source file may contribute.
    pub fn with_chunks_per_document(mut self, chunks_per_document: u32) -> Self {
        self.chunks_per_document = Some(chunks_per_document);
        self
    }
}

/// High-level RAG service composing extraction, chunking, embedding, and
/// vector storage.
///
/// Cheap to clone and shareable across request handlers; all dependencies
/// are injected at construction.
#[derive(Clone)]
pub struct RagService {
    inner: Arc<RagServiceInner>,
}

struct RagServiceInner {
    extractor: Extractor,
    chunker: Chunker,
    embedder: Arc<dyn Embedder>,
    store: VectorStore,
    upload_policy: UploadPolicy,
    config: RagConfig,
}

impl RagService {
    /// Creates a service with the default configuration.
    pub fn new(embedder: Arc<dyn Embedder>, store: VectorStore) -> Result<Self> {
        Self::with_config(embedder, store, RagConfig::default())
    }

    /// Creates a service with custom configuration.
    pub fn with_config(
        embedder: Arc<dyn Embedder>,
        store: VectorStore,
        config: RagConfig,
    ) -> Result<Self> {
        let tokenizer = Tokenizer::cl100k()?;

        Ok(Self {
            inner: Arc::new(RagServiceInner {
                extractor: Extractor::new(),
                chunker: Chunker::new(tokenizer),
                embedder,
                store,
                upload_policy: UploadPolicy::new(config.max_upload_bytes),
                config,
            }),
        })
    }

    /// Validates an upload's size and type before ingestion.
    ///
    /// Rejections are reported as a structured result, never an error, so
    /// the caller can surface a user-facing message.
    pub fn validate_upload(
        &self,
        filename: &str,
        mime_type: Option<&str>,
        size_bytes: u64,
    ) -> UploadCheck {
        self.inner.upload_policy.check(filename, mime_type, size_bytes)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Returns the chunker.
    pub fn chunker(&self) -> &Chunker {
        &self.inner.chunker
    }

    /// Returns whether a vector backend is configured.
    pub fn is_grounded(&self) -> bool {
        self.inner.store.is_configured()
    }

    /// Ingests one uploaded file: extract, chunk, embed, store.
    ///
    /// Without a configured vector backend this is a no-op returning a
    /// zero report; the application degrades to ungrounded generation.
    pub async fn ingest(
        &self,
        bytes: Bytes,
        filename: &str,
        mime_type: Option<&str>,
        document_id: Uuid,
        canvas_id: Option<Uuid>,
        field_key: Option<&str>,
    ) -> Result<IngestReport> {
        if !self.inner.store.is_configured() {
            tracing::debug!(
                target: TRACING_TARGET,
                filename = %filename,
                "Vector store unavailable; skipping ingestion"
            );
            return Ok(IngestReport::default());
        }

        let document = self
            .inner
            .extractor
            .extract(bytes, filename, mime_type)
            .await?;

        self.ingest_chunks(&document.text, filename, document_id, canvas_id, field_key)
            .await
    }

    /// Ingests already-extracted text.
    pub async fn ingest_text(
        &self,
        text: &str,
        filename: &str,
        document_id: Uuid,
        canvas_id: Option<Uuid>,
        field_key: Option<&str>,
    ) -> Result<IngestReport> {
        if !self.inner.store.is_configured() {
            tracing::debug!(
                target: TRACING_TARGET,
                filename = %filename,
                "Vector store unavailable; skipping ingestion"
            );
            return Ok(IngestReport::default());
        }

        self.ingest_chunks(text, filename, document_id, canvas_id, field_key)
            .await
    }

    /// Ingests several files, isolating failures per file.
    ///
    /// A file that fails extraction or tokenization is reported in its
    /// outcome and logged; the remaining files still ingest.
    pub async fn ingest_all(&self, requests: Vec<IngestRequest>) -> Vec<IngestOutcome> {
        let mut outcomes = Vec::with_capacity(requests.len());

        for request in requests {
            let result = self
                .ingest(
                    request.bytes,
                    &request.filename,
                    request.mime_type.as_deref(),
                    request.document_id,
                    request.canvas_id,
                    request.field_key.as_deref(),
                )
                .await;

            if let Err(error) = &result {
                tracing::warn!(
                    target: TRACING_TARGET,
                    filename = %request.filename,
                    error = %error,
                    "File ingestion failed; continuing with remaining files"
                );
            }

            outcomes.push(IngestOutcome {
                filename: request.filename,
                document_id: request.document_id,
                result,
            });
        }

        outcomes
    }

    async fn ingest_chunks(
        &self,
        text: &str,
        filename: &str,
        document_id: Uuid,
        canvas_id: Option<Uuid>,
        field_key: Option<&str>,
    ) -> Result<IngestReport> {
        let mut options = ChunkOptions::new(filename)
            .with_max_tokens(self.inner.config.max_tokens)
            .with_overlap_tokens(self.inner.config.overlap_tokens);
        if let Some(field_key) = field_key {
            options = options.with_field_key(field_key);
        }

        let chunks = self
            .inner
            .chunker
            .chunk(text, document_id, canvas_id, &options)?;
        if chunks.is_empty() {
            return Ok(IngestReport::default());
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.inner.embedder.embed_many(texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(Error::provider(
                self.inner.embedder.model_name(),
                format!(
                    "embedding count mismatch: expected {}, got {}",
                    chunks.len(),
                    embeddings.len()
                ),
            ));
        }

        let report = IngestReport {
            chunk_count: chunks.len() as u32,
            token_total: chunks.iter().map(|c| c.token_count).sum(),
        };

        let records: Vec<ChunkRecord> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| ChunkRecord::from(EmbeddedChunk::new(chunk, embedding)))
            .collect();

        self.inner
            .store
            .upsert(records)
            .await
            .map_err(|e| Error::store(e))?;

        tracing::info!(
            target: TRACING_TARGET,
            filename = %filename,
            document_id = %document_id,
            chunks = %report.chunk_count,
            tokens = %report.token_total,
            "Ingested document"
        );

        Ok(report)
    }

    /// Retrieves grounding chunks for a query.
    ///
    /// Embeds the query, searches the vector store with the composed
    /// visibility filter, drops candidates under the similarity threshold,
    /// and optionally caps how many chunks any single source contributes.
    /// Without a configured vector backend the result is empty.
    pub async fn retrieve(&self, query: &str, options: RetrieveOptions) -> Result<RagResult> {
        if !self.inner.store.is_configured() {
            tracing::debug!(
                target: TRACING_TARGET,
                "Vector store unavailable; returning empty retrieval"
            );
            return Ok(RagResult::empty());
        }

        let limit = options.limit.unwrap_or(self.inner.config.default_limit) as usize;
        let threshold = options
            .similarity_threshold
            .unwrap_or(self.inner.config.similarity_threshold);

        let query_vector = self.inner.embedder.embed_one(query).await?;

        let mut filter = ChunkFilter::new();
        if let Some(field_key) = options.field_key {
            filter = filter.with_field_key(field_key);
        }
        if let Some(document_ids) = options.document_ids {
            filter = filter.with_document_ids(document_ids);
        } else if let Some(canvas_id) = options.canvas_id {
            filter = filter.with_canvas_id(canvas_id);
        }

        // Over-fetch when diversity capping is requested so enough
        // candidates survive the per-source truncation.
        let fetch_limit = match options.chunks_per_document {
            Some(cap) => (limit * cap as usize).max(limit),
            None => limit,
        };

        let candidates = self
            .inner
            .store
            .search(query_vector, &filter, fetch_limit)
            .await
            .map_err(|e| Error::store(e))?;
        let total_chunks = candidates.len();

        let mut kept: Vec<ScoredChunk> = candidates
            .into_iter()
            .filter(|c| c.similarity >= threshold)
            .collect();

        if let Some(cap) = options.chunks_per_document {
            kept = cap_per_source(kept, cap as usize);
        }

        let chunks = kept
            .into_iter()
            .map(|c| RetrievedChunk {
                content: c.payload.content,
                similarity: c.similarity,
                metadata: ChunkMetadata {
                    filename: c.payload.filename,
                    chunk_index: c.payload.chunk_index,
                    total_chunks: c.payload.total_chunks,
                },
            })
            .collect();

        tracing::debug!(
            target: TRACING_TARGET,
            candidates = %total_chunks,
            "Retrieval complete"
        );

        Ok(RagResult {
            chunks,
            total_chunks,
        })
    }

    /// Deletes every stored chunk of a document.
    pub async fn delete_document(&self, document_id: Uuid) -> Result<()> {
        self.inner
            .store
            .delete_by_document(document_id)
            .await
            .map_err(|e| Error::store(e))
    }

    /// Deletes every stored chunk of a canvas.
    pub async fn delete_canvas(&self, canvas_id: Uuid) -> Result<()> {
        self.inner
            .store
            .delete_by_canvas(canvas_id)
            .await
            .map_err(|e| Error::store(e))
    }
}

impl std::fmt::Debug for RagService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagService")
            .field("embedder", &self.inner.embedder.model_name())
            .field("store", &self.inner.store)
            .finish()
    }
}

/// Groups chunks by source filename, preserving each group's similarity
/// order, and truncates each group to the cap.
///
/// Groups concatenate in order of first appearance; diversity across
/// sources takes priority over a strict global ranking once the threshold
/// and caps are applied.
fn cap_per_source(chunks: Vec<ScoredChunk>, cap: usize) -> Vec<ScoredChunk> {
    let mut groups: Vec<(String, Vec<ScoredChunk>)> = Vec::new();

    for chunk in chunks {
        match groups
            .iter_mut()
            .find(|(filename, _)| *filename == chunk.payload.filename)
        {
            Some((_, group)) => group.push(chunk),
            None => groups.push((chunk.payload.filename.clone(), vec![chunk])),
        }
    }

    groups
        .into_iter()
        .flat_map(|(_, mut group)| {
            group.truncate(cap);
            group
        })
        .collect()
}
