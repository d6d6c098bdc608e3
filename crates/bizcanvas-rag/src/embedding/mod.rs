//! Embedding models and providers.

mod credentials;
mod model;
mod provider;

use async_trait::async_trait;
use bizcanvas_core::Result;

pub use credentials::Credentials;
pub use model::{
    CohereEmbeddingModel, EmbeddingModel, GeminiEmbeddingModel, OpenAiEmbeddingModel,
};
pub use provider::EmbeddingProvider;

/// Converts text into fixed-length embedding vectors.
///
/// The seam between the pipeline and the embedding backend; tests
/// substitute a deterministic implementation here.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds a single text.
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>>;

    /// Embeds a batch of texts in one request where the backend supports
    /// it; output order matches input order 1:1.
    async fn embed_many(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>>;

    /// Returns the model name.
    fn model_name(&self) -> &str;

    /// Returns the embedding dimensionality.
    fn dimensions(&self) -> usize;
}
