//! Query-to-documents retriever.

use std::sync::Arc;

use tracing::debug;

use ragkit_embeddings::{Document, EmbeddingClient, VectorStore};

use crate::config::DEFAULT_TOP_K;
use crate::error::Result;

/// Turns a raw query string into ranked, relevant documents.
///
/// The retriever embeds the query through the embedding port, searches the
/// vector store, and returns documents only; callers that need scores use
/// the store directly. A provider failure during query embedding aborts
/// retrieval entirely rather than degrading to an empty result, since an
/// empty set would be indistinguishable from "nothing relevant found".
pub struct Retriever {
    /// Client used to embed queries.
    client: Arc<dyn EmbeddingClient>,

    /// Store holding the embedded corpus.
    store: Arc<dyn VectorStore>,

    /// Number of documents returned by [`Retriever::retrieve`].
    top_k: usize,
}

impl Retriever {
    /// Create a retriever with the default `top_k`.
    pub fn new(client: Arc<dyn EmbeddingClient>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            client,
            store,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Set the number of documents to return.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Retrieve the documents most relevant to `query`.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<Document>> {
        self.retrieve_top_k(query, self.top_k).await
    }

    /// Retrieve with an explicit result count.
    pub async fn retrieve_top_k(&self, query: &str, top_k: usize) -> Result<Vec<Document>> {
        debug!("retrieving top {top_k} documents");

        let vector = self.client.embed(query).await?;
        let results = self.store.search(&vector, top_k, None).await?;

        debug!("retrieved {} documents", results.len());
        Ok(results.into_iter().map(|r| r.document).collect())
    }
}
