//! # Embeddings
//!
//! This crate provides the embedding-and-storage half of the RAG core:
//! one client contract over heterogeneous embedding providers, and a
//! vector store with cosine similarity search.
//!
//! ## Features
//!
//! - **Embedding Port**: a single [`EmbeddingClient`] contract every
//!   provider adapter satisfies
//! - **Provider Adapters**: OpenAI and Azure OpenAI backends normalized
//!   into one response envelope
//! - **Vector Store**: in-memory index with k-nearest search and score
//!   thresholds
//! - **Caching**: a decorator that avoids repeat provider calls
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Embeddings System                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingClient ──► EmbeddingResponse ──► VectorStore          │
//! │       │                     │                   │               │
//! │       ▼                     ▼                   ▼               │
//! │  OpenAI / Azure      usage metadata      similarity search      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod client;
pub mod document;
pub mod error;
pub mod provider;
pub mod response;
pub mod similarity;
pub mod store;

pub use cache::{CacheStats, CachedEmbeddingClient};
pub use client::EmbeddingClient;
pub use document::Document;
pub use error::{EmbeddingError, Result};
pub use provider::{AzureOpenAiEmbeddingClient, OpenAiEmbeddingClient};
pub use response::{Embedding, EmbeddingResponse, EmbeddingUsage, ResponseMetadata};
pub use similarity::cosine_similarity;
pub use store::{InMemoryVectorStore, SearchResult, StoredVector, VectorStore};

/// A raw embedding vector.
pub type Vector = Vec<f64>;
