use tomgpt_core::StoreError;
use tomgpt_pinecone::PineconeStoreError;

#[test]
fn pinecone_errors_wrap_into_store_errors() {
    let store_err: StoreError = PineconeStoreError::Config("missing api key".to_string()).into();
    assert_eq!(
        store_err.to_string(),
        "vector store error: pinecone store misconfigured: missing api key"
    );

    let dim: StoreError = PineconeStoreError::DimensionMismatch { expected: 1024, got: 2 }.into();
    assert!(matches!(dim, StoreError::DimensionMismatch { expected: 1024, got: 2 }));
}

#[test]
fn api_errors_report_status_and_retryability() {
    let limited = PineconeStoreError::Api {
        status: 429,
        message: "rate limited".to_string(),
        retry_after_seconds: Some(30),
        namespace: Some("prod".to_string()),
    };
    assert_eq!(limited.to_string(), "pinecone returned HTTP 429: rate limited");
    assert!(limited.is_retryable());

    let unauthorized = PineconeStoreError::Api {
        status: 401,
        message: "invalid api key".to_string(),
        retry_after_seconds: None,
        namespace: None,
    };
    assert!(!unauthorized.is_retryable());
    assert!(PineconeStoreError::Transport("reset".to_string()).is_retryable());
}
