//! The embedding port: one contract over heterogeneous providers.

use async_trait::async_trait;

use crate::Vector;
use crate::document::Document;
use crate::error::{EmbeddingError, Result};
use crate::response::EmbeddingResponse;

/// Capability interface any embedding provider must satisfy.
///
/// Implementors supply [`EmbeddingClient::embed_for_response`], which must
/// issue exactly one provider request per call and return embeddings in
/// request order (see [`crate::response::align_embeddings`]). The
/// single-text, document, and vector-only batch operations are derived from
/// it, so simple callers avoid metadata plumbing while pipelines that need
/// cost accounting get it without a second request.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Model identifier this client embeds with.
    fn model(&self) -> &str;

    /// Embed a batch of texts, surfacing usage metadata.
    ///
    /// Must reject empty input before any network call, issue one request
    /// for the whole batch, and return embeddings index-aligned with
    /// `texts` by position.
    async fn embed_for_response(&self, texts: &[String]) -> Result<EmbeddingResponse>;

    /// Embed a single text, returning the raw vector.
    async fn embed(&self, text: &str) -> Result<Vector> {
        if text.is_empty() {
            return Err(EmbeddingError::EmptyInput("text"));
        }

        let response = self.embed_for_response(&[text.to_string()]).await?;
        let mut vectors = response.into_vectors();
        if vectors.len() != 1 {
            return Err(EmbeddingError::Provider(format!(
                "expected exactly one embedding, provider returned {}",
                vectors.len()
            )));
        }

        Ok(vectors.remove(0))
    }

    /// Embed a document's content.
    async fn embed_document(&self, document: &Document) -> Result<Vector> {
        self.embed(&document.content).await
    }

    /// Embed a batch of texts, returning raw vectors in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>> {
        validate_batch(texts)?;

        let response = self.embed_for_response(texts).await?;
        let vectors = response.into_vectors();
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::Provider(format!(
                "expected {} embeddings, provider returned {}",
                texts.len(),
                vectors.len()
            )));
        }

        Ok(vectors)
    }
}

/// Reject empty batches and zero-length member texts before any network
/// call. Adapters call this at the top of `embed_for_response`.
pub fn validate_batch(texts: &[String]) -> Result<()> {
    if texts.is_empty() {
        return Err(EmbeddingError::EmptyInput("batch"));
    }
    if texts.iter().any(|text| text.is_empty()) {
        return Err(EmbeddingError::EmptyInput("text"));
    }
    Ok(())
}
