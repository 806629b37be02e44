//! Error types for the retriever.

use thiserror::Error;

/// Result type alias for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Errors that can occur during retrieval.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// Embedding or vector store error, propagated unchanged.
    #[error("embedding error: {0}")]
    Embedding(#[from] ragkit_embeddings::EmbeddingError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}
