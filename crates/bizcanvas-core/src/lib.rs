#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod chunk;
mod document;
mod error;
mod format;
mod upload;

pub use chunk::{ChunkMetadata, DocumentChunk, EmbeddedChunk, RagResult, RetrievedChunk, chunk_id};
pub use document::{DocumentMetadata, ExtractedDocument};
pub use error::{Error, Result};
pub use format::DocumentFormat;
pub use upload::{DEFAULT_MAX_UPLOAD_BYTES, UploadCheck, UploadPolicy};

/// Tracing target for pipeline core operations.
pub const TRACING_TARGET: &str = "bizcanvas_core";
