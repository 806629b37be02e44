//! Provider adapters for the embedding port.
//!
//! Each adapter translates between a provider's native request/response
//! shapes and the canonical [`EmbeddingResponse`] envelope. This is the
//! layer where field drift, missing usage fields, and batch-order
//! differences between backends get normalized away.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::client::{EmbeddingClient, validate_batch};
use crate::error::{EmbeddingError, Result};
use crate::response::{
    Embedding, EmbeddingResponse, EmbeddingUsage, ResponseMetadata, align_embeddings,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// OpenAI embeddings API adapter.
pub struct OpenAiEmbeddingClient {
    /// API key.
    api_key: Option<String>,

    /// API base URL.
    base_url: String,

    /// Model to embed with.
    model: String,

    /// Per-request timeout.
    timeout: Duration,

    /// HTTP client.
    client: reqwest::Client,
}

impl OpenAiEmbeddingClient {
    /// Create a new client, reading the API key from `OPENAI_API_KEY`.
    pub fn new() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            timeout: DEFAULT_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether the client has an API key configured.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for OpenAiEmbeddingClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingClient for OpenAiEmbeddingClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn embed_for_response(&self, texts: &[String]) -> Result<EmbeddingResponse> {
        validate_batch(texts)?;

        let api_key = self
            .api_key
            .as_ref()
            .ok_or(EmbeddingError::ProviderNotConfigured)?;

        debug!(
            "embedding batch of {} texts with model {}",
            texts.len(),
            self.model
        );

        let body = serde_json::json!({
            "input": texts,
            "model": self.model,
        });

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Provider(format!(
                "API error {status}: {error_text}"
            )));
        }

        let result: OpenAiEmbeddingResponse = response.json().await?;

        let embeddings: Vec<Embedding> = result
            .data
            .into_iter()
            .map(|item| Embedding::new(item.embedding, item.index))
            .collect();
        let embeddings = align_embeddings(embeddings, texts.len())?;

        let usage = result
            .usage
            .map_or_else(EmbeddingUsage::default, |u| EmbeddingUsage {
                prompt_tokens: u.prompt_tokens,
                total_tokens: u.total_tokens,
                completion_tokens: None,
            });

        info!(
            "embedded {} texts with model {}",
            embeddings.len(),
            result.model
        );

        Ok(EmbeddingResponse {
            embeddings,
            metadata: ResponseMetadata {
                model: result.model,
                usage,
            },
        })
    }
}

/// OpenAI API response format.
#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingData>,
    model: String,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingData {
    embedding: Vec<f64>,
    index: usize,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(default)]
    prompt_tokens: Option<u64>,
    #[serde(default)]
    total_tokens: Option<u64>,
}

/// Azure OpenAI embeddings adapter.
///
/// Azure addresses models through named deployments and authenticates with
/// an `api-key` header. Its usage object has no completion-token field at
/// all, so that metadata entry is absent from responses rather than zero.
pub struct AzureOpenAiEmbeddingClient {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    endpoint: Option<String>,

    /// API key.
    api_key: Option<String>,

    /// Deployment name hosting the embedding model.
    deployment: String,

    /// API version query parameter.
    api_version: String,

    /// Per-request timeout.
    timeout: Duration,

    /// HTTP client.
    client: reqwest::Client,
}

impl AzureOpenAiEmbeddingClient {
    /// Create a new client, reading `AZURE_OPENAI_ENDPOINT` and
    /// `AZURE_OPENAI_API_KEY` from the environment.
    pub fn new() -> Self {
        Self {
            endpoint: std::env::var("AZURE_OPENAI_ENDPOINT").ok(),
            api_key: std::env::var("AZURE_OPENAI_API_KEY").ok(),
            deployment: "text-embedding-ada-002".to_string(),
            api_version: "2023-05-15".to_string(),
            timeout: DEFAULT_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    /// Set the resource endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the deployment name.
    pub fn with_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = deployment.into();
        self
    }

    /// Set the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether the client has an endpoint and API key configured.
    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some() && self.api_key.is_some()
    }
}

impl Default for AzureOpenAiEmbeddingClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingClient for AzureOpenAiEmbeddingClient {
    fn model(&self) -> &str {
        &self.deployment
    }

    async fn embed_for_response(&self, texts: &[String]) -> Result<EmbeddingResponse> {
        validate_batch(texts)?;

        let endpoint = self
            .endpoint
            .as_ref()
            .ok_or(EmbeddingError::ProviderNotConfigured)?;
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(EmbeddingError::ProviderNotConfigured)?;

        debug!(
            "embedding batch of {} texts with deployment {}",
            texts.len(),
            self.deployment
        );

        let body = serde_json::json!({
            "input": texts,
        });

        let url = format!(
            "{}/openai/deployments/{}/embeddings",
            endpoint.trim_end_matches('/'),
            self.deployment
        );

        let response = self
            .client
            .post(url)
            .query(&[("api-version", self.api_version.as_str())])
            .header("api-key", api_key)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Provider(format!(
                "API error {status}: {error_text}"
            )));
        }

        let result: AzureEmbeddingResponse = response.json().await?;

        let embeddings: Vec<Embedding> = result
            .data
            .into_iter()
            .map(|item| Embedding::new(item.embedding, item.index))
            .collect();
        let embeddings = align_embeddings(embeddings, texts.len())?;

        let usage = result
            .usage
            .map_or_else(EmbeddingUsage::default, |u| EmbeddingUsage {
                prompt_tokens: u.prompt_tokens,
                total_tokens: u.total_tokens,
                completion_tokens: None,
            });

        let model = result.model.unwrap_or_else(|| self.deployment.clone());
        info!(
            "embedded {} texts with deployment {}",
            embeddings.len(),
            self.deployment
        );

        Ok(EmbeddingResponse {
            embeddings,
            metadata: ResponseMetadata { model, usage },
        })
    }
}

/// Azure OpenAI API response format.
#[derive(Debug, Deserialize)]
struct AzureEmbeddingResponse {
    data: Vec<AzureEmbeddingData>,
    #[serde(default)]
    model: Option<String>,
    usage: Option<AzureUsage>,
}

#[derive(Debug, Deserialize)]
struct AzureEmbeddingData {
    embedding: Vec<f64>,
    index: usize,
}

/// Azure's usage object carries no completion-token field.
#[derive(Debug, Deserialize)]
struct AzureUsage {
    #[serde(default)]
    prompt_tokens: Option<u64>,
    #[serde(default)]
    total_tokens: Option<u64>,
}
