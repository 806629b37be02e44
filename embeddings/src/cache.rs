//! Caching decorator for embedding clients.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::Vector;
use crate::client::{EmbeddingClient, validate_batch};
use crate::error::Result;
use crate::response::{Embedding, EmbeddingResponse, EmbeddingUsage, ResponseMetadata};

struct CacheSlot {
    vector: Vector,
    seq: u64,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CacheSlot>,
    next_seq: u64,
}

/// Statistics about an embedding cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached vectors.
    pub entries: usize,

    /// Capacity bound.
    pub max_entries: usize,
}

/// An [`EmbeddingClient`] decorator that caches vectors by text and model.
///
/// A batch where every text hits is served from cache; the response then
/// reports no usage, since nothing reached the provider. Any miss delegates
/// the whole batch to the inner client (still one provider request) and
/// populates the cache from the result. When the cache is full the
/// oldest-inserted entry is evicted.
pub struct CachedEmbeddingClient {
    /// The client that performs real provider calls.
    inner: Arc<dyn EmbeddingClient>,

    /// Cached vectors keyed by hash of (text, model).
    cache: RwLock<CacheState>,

    /// Maximum number of cached vectors.
    max_entries: usize,
}

impl CachedEmbeddingClient {
    /// Wrap a client with a cache bounded to `max_entries` vectors.
    pub fn new(inner: Arc<dyn EmbeddingClient>, max_entries: usize) -> Self {
        Self {
            inner,
            cache: RwLock::new(CacheState::default()),
            max_entries,
        }
    }

    /// Compute a hash for cache lookup.
    fn hash_key(text: &str, model: &str) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        model.hash(&mut hasher);
        format!("{:x}", hasher.finish())
    }

    /// Look up every text; `None` unless all of them hit.
    async fn lookup_all(&self, texts: &[String]) -> Option<Vec<Vector>> {
        let state = self.cache.read().await;
        texts
            .iter()
            .map(|text| {
                let key = Self::hash_key(text, self.inner.model());
                state.entries.get(&key).map(|slot| slot.vector.clone())
            })
            .collect()
    }

    async fn insert_all(&self, texts: &[String], vectors: &[Vector]) {
        let mut state = self.cache.write().await;
        for (text, vector) in texts.iter().zip(vectors) {
            let key = Self::hash_key(text, self.inner.model());

            if state.entries.len() >= self.max_entries && !state.entries.contains_key(&key) {
                if let Some(oldest) = state
                    .entries
                    .iter()
                    .min_by_key(|(_, slot)| slot.seq)
                    .map(|(k, _)| k.clone())
                {
                    state.entries.remove(&oldest);
                }
            }

            let seq = state.next_seq;
            state.next_seq += 1;
            state.entries.insert(
                key,
                CacheSlot {
                    vector: vector.clone(),
                    seq,
                },
            );
        }
    }

    /// Current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let state = self.cache.read().await;
        CacheStats {
            entries: state.entries.len(),
            max_entries: self.max_entries,
        }
    }

    /// Drop all cached vectors.
    pub async fn clear(&self) {
        self.cache.write().await.entries.clear();
    }
}

#[async_trait]
impl EmbeddingClient for CachedEmbeddingClient {
    fn model(&self) -> &str {
        self.inner.model()
    }

    async fn embed_for_response(&self, texts: &[String]) -> Result<EmbeddingResponse> {
        validate_batch(texts)?;

        if let Some(vectors) = self.lookup_all(texts).await {
            debug!("cache hit for batch of {}", texts.len());
            return Ok(EmbeddingResponse {
                embeddings: vectors
                    .into_iter()
                    .enumerate()
                    .map(|(index, vector)| Embedding::new(vector, index))
                    .collect(),
                metadata: ResponseMetadata {
                    model: self.inner.model().to_string(),
                    usage: EmbeddingUsage::default(),
                },
            });
        }

        let response = self.inner.embed_for_response(texts).await?;

        let vectors: Vec<Vector> = response
            .embeddings
            .iter()
            .map(|e| e.vector.clone())
            .collect();
        self.insert_all(texts, &vectors).await;

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    /// Stub that counts provider calls and embeds text as its length.
    struct CountingClient {
        calls: AtomicUsize,
    }

    impl CountingClient {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EmbeddingClient for CountingClient {
        fn model(&self) -> &str {
            "counting-model"
        }

        async fn embed_for_response(&self, texts: &[String]) -> Result<EmbeddingResponse> {
            validate_batch(texts)?;
            self.calls.fetch_add(1, Ordering::SeqCst);

            Ok(EmbeddingResponse {
                embeddings: texts
                    .iter()
                    .enumerate()
                    .map(|(i, text)| Embedding::new(vec![text.len() as f64, 1.0], i))
                    .collect(),
                metadata: ResponseMetadata {
                    model: "counting-model".to_string(),
                    usage: EmbeddingUsage {
                        prompt_tokens: Some(texts.len() as u64),
                        total_tokens: Some(texts.len() as u64),
                        completion_tokens: None,
                    },
                },
            })
        }
    }

    #[tokio::test]
    async fn test_repeated_embed_hits_cache() {
        let counting = Arc::new(CountingClient::new());
        let cached = CachedEmbeddingClient::new(counting.clone(), 16);

        let first = cached.embed("hello").await.unwrap();
        let second = cached.embed("hello").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(counting.calls(), 1);
    }

    #[tokio::test]
    async fn test_partial_miss_delegates_whole_batch() {
        let counting = Arc::new(CountingClient::new());
        let cached = CachedEmbeddingClient::new(counting.clone(), 16);

        cached.embed("alpha").await.unwrap();
        assert_eq!(counting.calls(), 1);

        // "beta" misses, so the batch goes to the provider once.
        let texts = vec!["alpha".to_string(), "beta".to_string()];
        cached.embed_batch(&texts).await.unwrap();
        assert_eq!(counting.calls(), 2);

        // Both are now cached.
        cached.embed("beta").await.unwrap();
        assert_eq!(counting.calls(), 2);
    }

    #[tokio::test]
    async fn test_cached_batch_reports_no_usage() {
        let counting = Arc::new(CountingClient::new());
        let cached = CachedEmbeddingClient::new(counting.clone(), 16);

        let texts = vec!["alpha".to_string()];
        let fresh = cached.embed_for_response(&texts).await.unwrap();
        assert_eq!(fresh.metadata.usage.prompt_tokens, Some(1));

        let hit = cached.embed_for_response(&texts).await.unwrap();
        assert_eq!(hit.metadata.usage, EmbeddingUsage::default());
        assert_eq!(counting.calls(), 1);
    }

    #[tokio::test]
    async fn test_eviction_keeps_cache_bounded() {
        let counting = Arc::new(CountingClient::new());
        let cached = CachedEmbeddingClient::new(counting.clone(), 2);

        cached.embed("a").await.unwrap();
        cached.embed("bb").await.unwrap();
        cached.embed("ccc").await.unwrap();

        let stats = cached.stats().await;
        assert_eq!(stats.entries, 2);

        // The oldest entry was evicted, so "a" costs another call.
        cached.embed("a").await.unwrap();
        assert_eq!(counting.calls(), 4);
    }

    #[tokio::test]
    async fn test_clear_empties_cache() {
        let counting = Arc::new(CountingClient::new());
        let cached = CachedEmbeddingClient::new(counting.clone(), 16);

        cached.embed("hello").await.unwrap();
        cached.clear().await;
        assert_eq!(cached.stats().await.entries, 0);

        cached.embed("hello").await.unwrap();
        assert_eq!(counting.calls(), 2);
    }
}
