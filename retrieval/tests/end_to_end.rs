//! End-to-end retrieval flow: add documents, query, get ranked context.

use std::sync::Arc;

use async_trait::async_trait;

use ragkit_embeddings::{
    Document, Embedding, EmbeddingClient, EmbeddingError, EmbeddingResponse, EmbeddingUsage,
    InMemoryVectorStore, ResponseMetadata, Vector, VectorStore,
};
use ragkit_retrieval::Retriever;

/// Deterministic embedding client over a fixed vocabulary, standing in for
/// a real provider.
struct VocabClient;

fn vocab(text: &str) -> Option<Vector> {
    match text {
        "road bike for commuting" => Some(vec![0.9, 0.1, 0.05]),
        "mountain bike for trails" => Some(vec![0.1, 0.9, 0.05]),
        "bike for city commuting" => Some(vec![0.85, 0.15, 0.05]),
        "bike for mountain trails" => Some(vec![0.15, 0.85, 0.05]),
        _ => None,
    }
}

#[async_trait]
impl EmbeddingClient for VocabClient {
    fn model(&self) -> &str {
        "vocab-model"
    }

    async fn embed_for_response(
        &self,
        texts: &[String],
    ) -> ragkit_embeddings::Result<EmbeddingResponse> {
        let embeddings = texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                vocab(text)
                    .map(|v| Embedding::new(v, i))
                    .ok_or_else(|| EmbeddingError::Provider(format!("unknown text: {text}")))
            })
            .collect::<ragkit_embeddings::Result<Vec<_>>>()?;

        Ok(EmbeddingResponse {
            embeddings,
            metadata: ResponseMetadata {
                model: "vocab-model".to_string(),
                usage: EmbeddingUsage {
                    prompt_tokens: Some(texts.len() as u64 * 4),
                    total_tokens: Some(texts.len() as u64 * 4),
                    completion_tokens: None,
                },
            },
        })
    }
}

#[tokio::test]
async fn test_commuting_query_retrieves_road_bike() {
    let client = Arc::new(VocabClient);
    let store = Arc::new(InMemoryVectorStore::new(client.clone()));

    store
        .add(vec![
            Document::from_content("road bike for commuting"),
            Document::from_content("mountain bike for trails"),
        ])
        .await
        .unwrap();
    assert_eq!(store.size().await, 2);

    let retriever = Retriever::new(client, store);
    let documents = retriever
        .retrieve_top_k("bike for city commuting", 1)
        .await
        .unwrap();

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].content, "road bike for commuting");
}

#[tokio::test]
async fn test_opposite_query_retrieves_mountain_bike() {
    let client = Arc::new(VocabClient);
    let store = Arc::new(InMemoryVectorStore::new(client.clone()));

    store
        .add(vec![
            Document::from_content("road bike for commuting"),
            Document::from_content("mountain bike for trails"),
        ])
        .await
        .unwrap();

    let retriever = Retriever::new(client, store);
    let documents = retriever
        .retrieve_top_k("bike for mountain trails", 1)
        .await
        .unwrap();

    assert_eq!(documents[0].content, "mountain bike for trails");
}

#[tokio::test]
async fn test_concurrent_searches_share_the_store() {
    let client = Arc::new(VocabClient);
    let store = Arc::new(InMemoryVectorStore::new(client.clone()));

    store
        .add(vec![
            Document::from_content("road bike for commuting"),
            Document::from_content("mountain bike for trails"),
        ])
        .await
        .unwrap();

    let retriever = Arc::new(Retriever::new(client, store));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let retriever = retriever.clone();
        handles.push(tokio::spawn(async move {
            retriever
                .retrieve_top_k("bike for city commuting", 1)
                .await
                .unwrap()
        }));
    }

    for handle in handles {
        let documents = handle.await.unwrap();
        assert_eq!(documents[0].content, "road bike for commuting");
    }
}
