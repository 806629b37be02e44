//! Configuration for the retriever.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use ragkit_embeddings::{
    AzureOpenAiEmbeddingClient, CachedEmbeddingClient, EmbeddingClient, OpenAiEmbeddingClient,
};

/// Default number of documents a retriever returns.
pub const DEFAULT_TOP_K: usize = 4;

/// Configuration for the retriever.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of documents to return per query.
    pub top_k: usize,

    /// Embedding provider configuration.
    pub embedding: EmbeddingConfig,
}

impl RetrievalConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            embedding: EmbeddingConfig::default(),
        }
    }

    /// Set the number of documents to return.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the embedding configuration.
    pub fn with_embedding(mut self, embedding: EmbeddingConfig) -> Self {
        self.embedding = embedding;
        self
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for the embedding provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Which provider to use.
    pub provider: EmbeddingProviderType,

    /// Model (or Azure deployment) overriding the provider default.
    pub model: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Whether to cache embeddings.
    pub cache_enabled: bool,

    /// Maximum cache size.
    pub cache_max_entries: usize,
}

impl EmbeddingConfig {
    /// Build an embedding client for this configuration.
    ///
    /// Credentials come from the provider's environment variables; a
    /// missing key surfaces as a provider error at call time, not here.
    pub fn build_client(&self) -> Arc<dyn EmbeddingClient> {
        let timeout = Duration::from_secs(self.timeout_secs);

        let client: Arc<dyn EmbeddingClient> = match self.provider {
            EmbeddingProviderType::OpenAi => {
                let mut client = OpenAiEmbeddingClient::new().with_timeout(timeout);
                if let Some(model) = &self.model {
                    client = client.with_model(model.clone());
                }
                Arc::new(client)
            }
            EmbeddingProviderType::AzureOpenAi => {
                let mut client = AzureOpenAiEmbeddingClient::new().with_timeout(timeout);
                if let Some(deployment) = &self.model {
                    client = client.with_deployment(deployment.clone());
                }
                Arc::new(client)
            }
        };

        if self.cache_enabled {
            Arc::new(CachedEmbeddingClient::new(client, self.cache_max_entries))
        } else {
            client
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderType::OpenAi,
            model: None,
            timeout_secs: 30,
            cache_enabled: true,
            cache_max_entries: 10000,
        }
    }
}

/// Type of embedding provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderType {
    /// OpenAI embeddings API.
    OpenAi,
    /// Azure OpenAI deployments.
    AzureOpenAi,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = RetrievalConfig::default();
        assert_eq!(config.top_k, DEFAULT_TOP_K);
        assert_eq!(config.embedding.provider, EmbeddingProviderType::OpenAi);
        assert!(config.embedding.cache_enabled);
    }

    #[test]
    fn test_provider_type_serializes_snake_case() {
        let json = serde_json::to_string(&EmbeddingProviderType::AzureOpenAi).unwrap();
        assert_eq!(json, r#""azure_open_ai""#);
    }

    #[test]
    fn test_build_client_reports_configured_model() {
        let config = EmbeddingConfig {
            model: Some("text-embedding-3-large".to_string()),
            cache_enabled: false,
            ..EmbeddingConfig::default()
        };

        let client = config.build_client();
        assert_eq!(client.model(), "text-embedding-3-large");
    }

    #[test]
    fn test_cached_client_keeps_model_name() {
        let config = EmbeddingConfig {
            model: Some("text-embedding-3-small".to_string()),
            ..EmbeddingConfig::default()
        };

        let client = config.build_client();
        assert_eq!(client.model(), "text-embedding-3-small");
    }
}
