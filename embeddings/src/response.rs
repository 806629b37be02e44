//! Canonical embedding response envelope.
//!
//! Provider adapters normalize their native wire formats into these types,
//! so everything downstream of the port sees one shape regardless of
//! which backend produced the vectors.

use serde::{Deserialize, Serialize};

use crate::Vector;
use crate::error::{EmbeddingError, Result};

/// A single embedding within a batch response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    /// The embedding vector.
    pub vector: Vector,

    /// The provider's prompt index: the position of the input this vector
    /// belongs to in the batch request.
    pub index: usize,
}

impl Embedding {
    /// Create a new embedding.
    pub fn new(vector: Vector, index: usize) -> Self {
        Self { vector, index }
    }
}

/// Token usage reported by the provider.
///
/// Every field is optional: `None` means the provider did not report the
/// figure, which is distinct from a reported zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingUsage {
    /// Tokens consumed by the input texts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u64>,

    /// Total tokens billed for the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,

    /// Completion tokens, structurally unavailable on some providers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u64>,
}

/// Metadata attached to an [`EmbeddingResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Model that produced the embeddings.
    pub model: String,

    /// Usage accounting, with unreported fields absent.
    #[serde(default)]
    pub usage: EmbeddingUsage,
}

/// Response envelope for a batch embedding call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// Embeddings in request order (position i embeds input i).
    pub embeddings: Vec<Embedding>,

    /// Model and usage metadata.
    pub metadata: ResponseMetadata,
}

impl EmbeddingResponse {
    /// Consume the response, keeping only the vectors in request order.
    pub fn into_vectors(self) -> Vec<Vector> {
        self.embeddings.into_iter().map(|e| e.vector).collect()
    }
}

/// Validate a provider batch result and restore request order.
///
/// The returned count must equal the requested count and the reported
/// prompt indices must form a permutation of `0..requested`. Anything else
/// (duplicates, gaps, out-of-range indices) is a provider error; partial
/// results are never reconstructed by guesswork.
pub fn align_embeddings(mut embeddings: Vec<Embedding>, requested: usize) -> Result<Vec<Embedding>> {
    if embeddings.len() != requested {
        return Err(EmbeddingError::Provider(format!(
            "expected {requested} embeddings, provider returned {}",
            embeddings.len()
        )));
    }

    let mut seen = vec![false; requested];
    for embedding in &embeddings {
        if embedding.index >= requested {
            return Err(EmbeddingError::Provider(format!(
                "prompt index {} out of range for batch of {requested}",
                embedding.index
            )));
        }
        if seen[embedding.index] {
            return Err(EmbeddingError::Provider(format!(
                "duplicate prompt index {} in provider response",
                embedding.index
            )));
        }
        seen[embedding.index] = true;
    }

    embeddings.sort_by_key(|e| e.index);
    Ok(embeddings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_align_restores_request_order() {
        let out_of_order = vec![
            Embedding::new(vec![3.0], 2),
            Embedding::new(vec![1.0], 0),
            Embedding::new(vec![2.0], 1),
        ];

        let aligned = align_embeddings(out_of_order, 3).unwrap();
        let vectors: Vec<Vector> = aligned.into_iter().map(|e| e.vector).collect();
        assert_eq!(vectors, vec![vec![1.0], vec![2.0], vec![3.0]]);
    }

    #[test]
    fn test_align_rejects_count_mismatch() {
        let short = vec![Embedding::new(vec![1.0], 0)];
        let err = align_embeddings(short, 2).unwrap_err();
        assert!(matches!(err, EmbeddingError::Provider(_)));
    }

    #[test]
    fn test_align_rejects_duplicate_index() {
        let dupes = vec![
            Embedding::new(vec![1.0], 0),
            Embedding::new(vec![2.0], 0),
        ];
        let err = align_embeddings(dupes, 2).unwrap_err();
        assert!(matches!(err, EmbeddingError::Provider(_)));
    }

    #[test]
    fn test_align_rejects_out_of_range_index() {
        let bad = vec![
            Embedding::new(vec![1.0], 0),
            Embedding::new(vec![2.0], 5),
        ];
        let err = align_embeddings(bad, 2).unwrap_err();
        assert!(matches!(err, EmbeddingError::Provider(_)));
    }

    #[test]
    fn test_usage_absent_fields_stay_absent() {
        let usage: EmbeddingUsage = serde_json::from_str(r#"{"prompt_tokens": 7}"#).unwrap();
        assert_eq!(usage.prompt_tokens, Some(7));
        assert_eq!(usage.total_tokens, None);
        assert_eq!(usage.completion_tokens, None);

        let json = serde_json::to_string(&usage).unwrap();
        assert_eq!(json, r#"{"prompt_tokens":7}"#);
    }
}
