#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod chunker;
pub mod embedding;

mod config;
mod service;
mod tokenizer;

pub use bizcanvas_core::{Error, Result};
pub use chunker::{ChunkOptions, Chunker};
pub use config::RagConfig;
pub use embedding::{Credentials, Embedder, EmbeddingModel, EmbeddingProvider};
pub use service::{IngestOutcome, IngestReport, IngestRequest, RagService, RetrieveOptions};
pub use tokenizer::Tokenizer;

/// Tracing target for RAG pipeline operations.
pub const TRACING_TARGET: &str = "bizcanvas_rag";
