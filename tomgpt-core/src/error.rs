use std::{error::Error as StdError, time::Duration};

use thiserror::Error;

/// Failure of a completion call or of the plumbing around it.
#[derive(Debug, Error)]
pub enum TomGptError {
    #[error("completion service error: {0}")]
    LlmProvider(String),
    #[error("malformed completion payload ({reason}): {output}")]
    ParseFailed { output: String, reason: String },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("retrieval failed: {0}")]
    Retrieval(String),
}

impl From<EmbeddingError> for TomGptError {
    fn from(err: EmbeddingError) -> Self {
        TomGptError::Retrieval(err.to_string())
    }
}

impl From<StoreError> for TomGptError {
    fn from(err: StoreError) -> Self {
        TomGptError::Retrieval(err.to_string())
    }
}

fn retry_hint(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(delay) => format!(", retry after {}s", delay.as_secs()),
        None => String::new(),
    }
}

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding response was invalid: {0}")]
    InvalidResponse(String),
    #[error("embedding request was rate limited{}", retry_hint(.retry_after))]
    RateLimited { retry_after: Option<Duration> },
    #[error("embedding provider error: {0}")]
    Provider(String),
    #[error("embedding failed: {0}")]
    Other(#[source] Box<dyn StdError + Send + Sync>),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("invalid document id: {0:?}")]
    InvalidId(String),
    #[error("vector store error: {0}")]
    Internal(#[source] Box<dyn StdError + Send + Sync>),
}
