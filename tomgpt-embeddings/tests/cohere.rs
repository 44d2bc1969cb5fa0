#![cfg(feature = "cohere")]

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tomgpt_core::{Embedding, EmbeddingError};
use tomgpt_embeddings::{CohereEmbedding, InputType};

#[tokio::test]
async fn cohere_embedding_sends_query_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embed"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_json(json!({
            "texts": ["弓道とは"],
            "model": "embed-multilingual-v3.0",
            "input_type": "search_query"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "e1",
            "embeddings": [[0.25, 0.5, 0.75]]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let embedder = CohereEmbedding::new("test-key")
        .with_base_url(server.uri())
        .with_model("embed-multilingual-v3.0", 3);
    let out = embedder.embed("弓道とは").await.unwrap();
    assert_eq!(out, vec![0.25, 0.5, 0.75]);
}

#[tokio::test]
async fn cohere_embedding_batches_documents() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embed"))
        .and(body_json(json!({
            "texts": ["a", "b"],
            "model": "embed-multilingual-v3.0",
            "input_type": "search_document"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embeddings": [[1.0, 0.0], [0.0, 1.0]]
        })))
        .mount(&server)
        .await;

    let embedder = CohereEmbedding::new("test-key")
        .with_base_url(server.uri())
        .with_model("embed-multilingual-v3.0", 2)
        .with_input_type(InputType::SearchDocument);
    let out = embedder
        .embed_batch(&["a".to_string(), "b".to_string()])
        .await
        .unwrap();
    assert_eq!(out, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
}

#[tokio::test]
async fn cohere_embedding_rejects_wrong_dimension() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embeddings": [[0.1, 0.2]]
        })))
        .mount(&server)
        .await;

    let embedder = CohereEmbedding::new("test-key").with_base_url(server.uri());
    let err = embedder.embed("hello").await.unwrap_err();
    assert!(matches!(err, EmbeddingError::InvalidResponse(_)));
}

#[tokio::test]
async fn cohere_embedding_reports_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embed"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&server)
        .await;

    let embedder = CohereEmbedding::new("test-key").with_base_url(server.uri());
    let err = embedder.embed("hello").await.unwrap_err();
    assert!(matches!(
        err,
        EmbeddingError::RateLimited { retry_after: Some(d) } if d.as_secs() == 7
    ));
}
