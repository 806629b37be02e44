//! Error types for the embeddings system.

use thiserror::Error;

/// Result type alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// Errors that can occur in the embeddings system.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Provider not configured (missing API key or endpoint).
    #[error("embedding provider not configured")]
    ProviderNotConfigured,

    /// Provider call failed, timed out, or returned mismatched results.
    #[error("provider request failed: {0}")]
    Provider(String),

    /// Provider returned a body that could not be decoded.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// Vector length inconsistent with the established dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Embedding requested for zero-length text or an empty batch.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            EmbeddingError::InvalidResponse(err.to_string())
        } else if err.is_timeout() {
            EmbeddingError::Provider(format!("request timed out: {err}"))
        } else {
            EmbeddingError::Provider(err.to_string())
        }
    }
}
