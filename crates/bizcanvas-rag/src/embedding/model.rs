//! Type-safe embedding model references.

use serde::{Deserialize, Serialize};

/// Reference to an embedding model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", content = "model", rename_all = "snake_case")]
pub enum EmbeddingModel {
    /// OpenAI embedding models.
    OpenAi(OpenAiEmbeddingModel),
    /// Cohere embedding models.
    Cohere(CohereEmbeddingModel),
    /// Google Gemini embedding models.
    Gemini(GeminiEmbeddingModel),
}

impl Default for EmbeddingModel {
    /// The reference model: `text-embedding-3-small`, 1536 dimensions.
    fn default() -> Self {
        Self::OpenAi(OpenAiEmbeddingModel::TextEmbedding3Small)
    }
}

/// OpenAI embedding models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpenAiEmbeddingModel {
    /// text-embedding-3-small (1536 dimensions)
    TextEmbedding3Small,
    /// text-embedding-3-large (3072 dimensions)
    TextEmbedding3Large,
    /// text-embedding-ada-002 (legacy, 1536 dimensions)
    TextEmbeddingAda002,
}

impl OpenAiEmbeddingModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextEmbedding3Small => "text-embedding-3-small",
            Self::TextEmbedding3Large => "text-embedding-3-large",
            Self::TextEmbeddingAda002 => "text-embedding-ada-002",
        }
    }

    pub fn dimensions(&self) -> usize {
        match self {
            Self::TextEmbedding3Small => 1536,
            Self::TextEmbedding3Large => 3072,
            Self::TextEmbeddingAda002 => 1536,
        }
    }
}

/// Cohere embedding models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CohereEmbeddingModel {
    /// embed-english-v3.0 (1024 dimensions)
    EmbedEnglishV3,
    /// embed-multilingual-v3.0 (1024 dimensions)
    EmbedMultilingualV3,
    /// embed-english-light-v3.0 (384 dimensions)
    EmbedEnglishLightV3,
    /// embed-multilingual-light-v3.0 (384 dimensions)
    EmbedMultilingualLightV3,
}

impl CohereEmbeddingModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmbedEnglishV3 => "embed-english-v3.0",
            Self::EmbedMultilingualV3 => "embed-multilingual-v3.0",
            Self::EmbedEnglishLightV3 => "embed-english-light-v3.0",
            Self::EmbedMultilingualLightV3 => "embed-multilingual-light-v3.0",
        }
    }

    pub fn dimensions(&self) -> usize {
        match self {
            Self::EmbedEnglishV3 | Self::EmbedMultilingualV3 => 1024,
            Self::EmbedEnglishLightV3 | Self::EmbedMultilingualLightV3 => 384,
        }
    }
}

/// Google Gemini embedding models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeminiEmbeddingModel {
    /// text-embedding-004 (768 dimensions)
    TextEmbedding004,
}

impl GeminiEmbeddingModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextEmbedding004 => "text-embedding-004",
        }
    }

    pub fn dimensions(&self) -> usize {
        768
    }
}

impl EmbeddingModel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::OpenAi(m) => m.as_str(),
            Self::Cohere(m) => m.as_str(),
            Self::Gemini(m) => m.as_str(),
        }
    }

    pub fn dimensions(&self) -> usize {
        match self {
            Self::OpenAi(m) => m.dimensions(),
            Self::Cohere(m) => m.dimensions(),
            Self::Gemini(m) => m.dimensions(),
        }
    }
}
