use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tomgpt_core::{Embedding, EmbeddingError};
use tomgpt_pinecone::{PineconeStoreError, PineconeVectorStore};

#[derive(Clone)]
struct DummyEmbedding;

#[async_trait::async_trait]
impl Embedding for DummyEmbedding {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(vec![0.1, 0.2])
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|_| vec![0.1, 0.2]).collect())
    }

    fn dimension(&self) -> usize {
        2
    }
}

#[tokio::test]
async fn builder_sets_default_text_key() {
    let store = PineconeVectorStore::builder(DummyEmbedding)
        .base_url("https://example.test")
        .api_key("key")
        .build()
        .await
        .unwrap();
    assert_eq!(store.text_key(), "text");
    assert_eq!(store.host(), "https://example.test");
}

#[tokio::test]
async fn builder_resolves_host_from_index_name() {
    let controller = MockServer::start().await;
    let index = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes/tom-gpt-doc"))
        .and(header("Api-Key", "key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "tom-gpt-doc",
            "dimension": 1024,
            "metric": "cosine",
            "host": index.uri()
        })))
        .expect(1)
        .mount(&controller)
        .await;

    let store = PineconeVectorStore::builder(DummyEmbedding)
        .controller_url(controller.uri())
        .index_name("tom-gpt-doc")
        .api_key("key")
        .build()
        .await
        .unwrap();

    assert_eq!(store.host(), index.uri());
    assert_eq!(store.index_name(), Some("tom-gpt-doc"));
}

#[tokio::test]
async fn builder_reports_unknown_index() {
    let controller = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"error": {"code": "NOT_FOUND", "message": "Index not found"}})),
        )
        .mount(&controller)
        .await;

    let err = PineconeVectorStore::builder(DummyEmbedding)
        .controller_url(controller.uri())
        .index_name("missing")
        .api_key("key")
        .build()
        .await
        .err()
        .unwrap();

    match err {
        PineconeStoreError::Api { status, message, .. } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Index not found");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn builder_requires_api_key_and_target() {
    let err = PineconeVectorStore::builder(DummyEmbedding)
        .base_url("https://example.test")
        .build()
        .await
        .err()
        .unwrap();
    assert!(matches!(err, PineconeStoreError::Config(_)));

    let err = PineconeVectorStore::builder(DummyEmbedding)
        .api_key("key")
        .build()
        .await
        .err()
        .unwrap();
    assert!(matches!(err, PineconeStoreError::Config(_)));
}

#[tokio::test]
async fn verify_dimension_reads_index_stats_and_still_builds() {
    let index = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/describe_index_stats"))
        .and(header("Api-Key", "key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "dimension": 1024,
            "totalVectorCount": 310
        })))
        .expect(1)
        .mount(&index)
        .await;

    let store = PineconeVectorStore::builder(DummyEmbedding)
        .base_url(index.uri())
        .index_name("tom-gpt-doc")
        .api_key("key")
        .verify_dimension(true)
        .build()
        .await
        .unwrap();

    assert_eq!(store.host(), index.uri());
    assert_eq!(store.index_name(), Some("tom-gpt-doc"));
}
