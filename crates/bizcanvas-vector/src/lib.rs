#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod memory;
pub mod qdrant;

mod config;
mod error;
mod store;

pub use config::{QdrantConfig, VectorStoreConfig};
pub use error::{VectorError, VectorResult};
pub use store::{
    ChunkFilter, ChunkPayload, ChunkRecord, ScoredChunk, VectorStore, VectorStoreBackend,
};

/// Tracing target for vector store operations.
pub const TRACING_TARGET: &str = "bizcanvas_vector";
