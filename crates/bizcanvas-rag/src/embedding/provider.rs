//! Embedding provider abstraction over rig.

use std::sync::Arc;

use async_trait::async_trait;
use bizcanvas_core::{Error, Result};
use rig::embeddings::EmbeddingModel as RigEmbeddingModel;
use rig::prelude::EmbeddingsClient;
use rig::providers::{cohere, gemini, openai};

use super::Embedder;
use super::credentials::Credentials;
use super::model::EmbeddingModel;

/// Embedding provider wrapping the rig embedding model implementations.
///
/// Cheaply cloneable; constructed once at process start and injected into
/// the pipeline.
#[derive(Clone)]
pub struct EmbeddingProvider(Arc<EmbeddingService>);

enum EmbeddingService {
    OpenAi {
        model: openai::EmbeddingModel,
        model_name: String,
        dimensions: usize,
    },
    Cohere {
        model: cohere::EmbeddingModel,
        model_name: String,
        dimensions: usize,
    },
    Gemini {
        model: gemini::embedding::EmbeddingModel,
        model_name: String,
        dimensions: usize,
    },
}

impl EmbeddingProvider {
    /// Connects to the embedding backend named by the model reference.
    ///
    /// Fails with a provider error when the credentials and model families
    /// do not match or the client rejects the configuration.
    pub fn connect(model: EmbeddingModel, credentials: Credentials) -> Result<Self> {
        let inner = match (credentials, model) {
            (Credentials::OpenAi { api_key }, EmbeddingModel::OpenAi(m)) => {
                let client = openai::Client::new(&api_key)
                    .map_err(|e| Error::provider("openai", e))?;
                EmbeddingService::OpenAi {
                    model: client.embedding_model_with_ndims(m.as_str(), m.dimensions()),
                    model_name: m.as_str().to_owned(),
                    dimensions: m.dimensions(),
                }
            }
            (Credentials::Cohere { api_key }, EmbeddingModel::Cohere(m)) => {
                let client = cohere::Client::new(&api_key)
                    .map_err(|e| Error::provider("cohere", e))?;
                EmbeddingService::Cohere {
                    model: client.embedding_model_with_ndims(
                        m.as_str(),
                        "search_document",
                        m.dimensions(),
                    ),
                    model_name: m.as_str().to_owned(),
                    dimensions: m.dimensions(),
                }
            }
            (Credentials::Gemini { api_key }, EmbeddingModel::Gemini(m)) => {
                let client = gemini::Client::new(&api_key)
                    .map_err(|e| Error::provider("gemini", e))?;
                EmbeddingService::Gemini {
                    model: client.embedding_model_with_ndims(m.as_str(), m.dimensions()),
                    model_name: m.as_str().to_owned(),
                    dimensions: m.dimensions(),
                }
            }
            (credentials, model) => {
                return Err(Error::provider(
                    credentials.provider_name(),
                    format!(
                        "credentials do not match the configured model {}",
                        model.as_str()
                    ),
                ));
            }
        };

        Ok(Self(Arc::new(inner)))
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &'static str {
        match self.0.as_ref() {
            EmbeddingService::OpenAi { .. } => "openai",
            EmbeddingService::Cohere { .. } => "cohere",
            EmbeddingService::Gemini { .. } => "gemini",
        }
    }

    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let embeddings = match self.0.as_ref() {
            EmbeddingService::OpenAi { model, .. } => model.embed_texts(texts).await,
            EmbeddingService::Cohere { model, .. } => model.embed_texts(texts).await,
            EmbeddingService::Gemini { model, .. } => model.embed_texts(texts).await,
        }
        .map_err(|e| Error::provider(self.provider_name(), e))?;

        Ok(embeddings
            .into_iter()
            .map(|embedding| embedding.vec.into_iter().map(|x| x as f32).collect())
            .collect())
    }
}

#[async_trait]
impl Embedder for EmbeddingProvider {
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = match self.0.as_ref() {
            EmbeddingService::OpenAi { model, .. } => model.embed_text(text).await,
            EmbeddingService::Cohere { model, .. } => model.embed_text(text).await,
            EmbeddingService::Gemini { model, .. } => model.embed_text(text).await,
        }
        .map_err(|e| Error::provider(self.provider_name(), e))?;

        Ok(embedding.vec.into_iter().map(|x| x as f32).collect())
    }

    async fn embed_many(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let expected = texts.len();
        let embeddings = self.embed_batch(texts).await?;

        if embeddings.len() != expected {
            return Err(Error::provider(
                self.provider_name(),
                format!(
                    "embedding count mismatch: expected {expected}, got {}",
                    embeddings.len()
                ),
            ));
        }

        Ok(embeddings)
    }

    fn model_name(&self) -> &str {
        match self.0.as_ref() {
            EmbeddingService::OpenAi { model_name, .. } => model_name,
            EmbeddingService::Cohere { model_name, .. } => model_name,
            EmbeddingService::Gemini { model_name, .. } => model_name,
        }
    }

    fn dimensions(&self) -> usize {
        match self.0.as_ref() {
            EmbeddingService::OpenAi { dimensions, .. } => *dimensions,
            EmbeddingService::Cohere { dimensions, .. } => *dimensions,
            EmbeddingService::Gemini { dimensions, .. } => *dimensions,
        }
    }
}

impl std::fmt::Debug for EmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingProvider")
            .field("provider", &self.provider_name())
            .field("model", &self.model_name())
            .field("dimensions", &self.dimensions())
            .finish()
    }
}
