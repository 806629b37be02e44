//! Vector store: embedded documents with similarity search.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::Vector;
use crate::client::EmbeddingClient;
use crate::document::Document;
use crate::error::{EmbeddingError, Result};
use crate::similarity::rank_top_k;

/// A document paired with its embedding, the unit held by a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredVector {
    /// The embedded document.
    pub document: Document,

    /// The document's embedding vector.
    pub vector: Vector,
}

/// A search hit: a document and its similarity score to the query.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched document.
    pub document: Document,

    /// Cosine similarity to the query vector.
    pub score: f64,
}

/// Storage contract for embedded documents.
///
/// This is the backend-selection seam: the in-memory implementation below
/// is the default, and an external vector database client can stand behind
/// the same four operations without touching the retriever or the
/// embedding port.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Embed and insert documents. All-or-nothing per call: if embedding
    /// fails partway, no documents from the call are inserted.
    async fn add(&self, documents: Vec<Document>) -> Result<()>;

    /// Find the `k` nearest documents by cosine similarity, descending.
    ///
    /// Entries scoring strictly below `score_threshold` are excluded;
    /// fewer than `k` qualifying entries is not an error. Ties break by
    /// insertion order, earlier-inserted documents first.
    async fn search(
        &self,
        query_vector: &[f64],
        k: usize,
        score_threshold: Option<f64>,
    ) -> Result<Vec<SearchResult>>;

    /// Number of stored documents.
    async fn size(&self) -> usize;

    /// Remove all stored documents and reset the dimension.
    async fn clear(&self);
}

#[derive(Default)]
struct StoreInner {
    /// Entries in insertion order.
    entries: Vec<StoredVector>,

    /// Vector dimension, fixed at the first successful insert.
    dimension: Option<usize>,
}

impl StoreInner {
    /// Dimension every incoming vector must match. For the first insert
    /// into an empty store, the batch's leading vector establishes it.
    fn expected_dimension(&self, batch: &[Vector]) -> Option<usize> {
        self.dimension
            .or_else(|| batch.first().map(Vec::len))
    }
}

/// In-memory vector store.
///
/// Holds [`StoredVector`] entries behind an async `RwLock`: concurrent
/// searches share the read lock while `add` and `clear` take the write
/// lock, so a reader never observes a half-inserted batch. Provider calls
/// are awaited before the write lock is taken.
pub struct InMemoryVectorStore {
    /// Client used to embed document content on insert.
    client: Arc<dyn EmbeddingClient>,

    /// Entries plus the established dimension.
    inner: RwLock<StoreInner>,
}

impl InMemoryVectorStore {
    /// Create an empty store embedding with the given client.
    pub fn new(client: Arc<dyn EmbeddingClient>) -> Self {
        Self {
            client,
            inner: RwLock::new(StoreInner::default()),
        }
    }

    /// Serialize the stored entries to JSON.
    ///
    /// Together with [`InMemoryVectorStore::from_json`] this is the
    /// persistence extension point: a durable backend can snapshot and
    /// restore the `StoredVector` collection without a new store contract.
    pub async fn to_json(&self) -> Result<String> {
        let inner = self.inner.read().await;
        Ok(serde_json::to_string(&inner.entries)?)
    }

    /// Restore a store from a JSON snapshot produced by `to_json`.
    ///
    /// Fails with a dimension mismatch if the snapshot's vectors are not
    /// uniform in length.
    pub async fn from_json(client: Arc<dyn EmbeddingClient>, json: &str) -> Result<Self> {
        let entries: Vec<StoredVector> = serde_json::from_str(json)?;

        let mut dimension = None;
        for entry in &entries {
            let expected = *dimension.get_or_insert(entry.vector.len());
            if entry.vector.len() != expected {
                return Err(EmbeddingError::DimensionMismatch {
                    expected,
                    actual: entry.vector.len(),
                });
            }
        }

        info!("restored vector store with {} entries", entries.len());

        Ok(Self {
            client,
            inner: RwLock::new(StoreInner { entries, dimension }),
        })
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn add(&self, documents: Vec<Document>) -> Result<()> {
        if documents.is_empty() {
            return Ok(());
        }

        // One batch request for the whole call, awaited before locking.
        let texts: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();
        let vectors = self.client.embed_batch(&texts).await?;

        let mut inner = self.inner.write().await;

        // Validate the entire batch against the established dimension
        // before inserting anything.
        if let Some(expected) = inner.expected_dimension(&vectors) {
            for vector in &vectors {
                if vector.len() != expected {
                    return Err(EmbeddingError::DimensionMismatch {
                        expected,
                        actual: vector.len(),
                    });
                }
            }
            inner.dimension = Some(expected);
        }

        let count = documents.len();
        inner.entries.extend(
            documents
                .into_iter()
                .zip(vectors)
                .map(|(document, vector)| StoredVector { document, vector }),
        );

        debug!("added {count} documents to vector store");
        Ok(())
    }

    async fn search(
        &self,
        query_vector: &[f64],
        k: usize,
        score_threshold: Option<f64>,
    ) -> Result<Vec<SearchResult>> {
        let inner = self.inner.read().await;

        let Some(expected) = inner.dimension else {
            // Nothing stored yet, so no dimension to violate.
            return Ok(Vec::new());
        };
        if query_vector.len() != expected {
            return Err(EmbeddingError::DimensionMismatch {
                expected,
                actual: query_vector.len(),
            });
        }

        let ranked = rank_top_k(
            query_vector,
            inner.entries.iter().map(|e| e.vector.as_slice()),
            k,
            score_threshold,
        )?;

        Ok(ranked
            .into_iter()
            .map(|(position, score)| SearchResult {
                document: inner.entries[position].document.clone(),
                score,
            })
            .collect())
    }

    async fn size(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.entries.clear();
        inner.dimension = None;
        info!("cleared vector store");
    }
}
