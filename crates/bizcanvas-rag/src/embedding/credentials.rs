//! Embedding provider credentials.

use serde::{Deserialize, Serialize};

/// API credentials for an embedding provider.
///
/// Constructed once at process start and injected into
/// [`super::EmbeddingProvider::connect`]; the provider family must match
/// the configured model family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum Credentials {
    /// OpenAI API key.
    OpenAi { api_key: String },
    /// Cohere API key.
    Cohere { api_key: String },
    /// Google Gemini API key.
    Gemini { api_key: String },
}

impl Credentials {
    /// Creates OpenAI credentials.
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::OpenAi {
            api_key: api_key.into(),
        }
    }

    /// Creates Cohere credentials.
    pub fn cohere(api_key: impl Into<String>) -> Self {
        Self::Cohere {
            api_key: api_key.into(),
        }
    }

    /// Creates Gemini credentials.
    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self::Gemini {
            api_key: api_key.into(),
        }
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &'static str {
        match self {
            Self::OpenAi { .. } => "openai",
            Self::Cohere { .. } => "cohere",
            Self::Gemini { .. } => "gemini",
        }
    }
}
