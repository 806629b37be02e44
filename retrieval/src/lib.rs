//! # Retrieval
//!
//! This crate turns a raw user query into ranked context documents:
//!
//! - **Retriever**: embed the query, search the vector store, return
//!   documents
//! - **Configuration**: provider selection, model, timeout, cache knobs
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Retrieval                                │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   query ──► EmbeddingClient ──► VectorStore ──► documents       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ragkit_embeddings::{Document, InMemoryVectorStore, OpenAiEmbeddingClient, VectorStore};
//! use ragkit_retrieval::Retriever;
//!
//! let client = Arc::new(OpenAiEmbeddingClient::new());
//! let store = Arc::new(InMemoryVectorStore::new(client.clone()));
//! store.add(documents).await?;
//!
//! let retriever = Retriever::new(client, store);
//! let context = retriever.retrieve("What bike is good for city commuting?").await?;
//! ```

pub mod config;
pub mod error;
pub mod retriever;

pub use config::{DEFAULT_TOP_K, EmbeddingConfig, EmbeddingProviderType, RetrievalConfig};
pub use error::{Result, RetrievalError};
pub use retriever::Retriever;

// Re-export from dependencies for convenience
pub use ragkit_embeddings::{
    Document, EmbeddingClient, InMemoryVectorStore, SearchResult, VectorStore,
};
