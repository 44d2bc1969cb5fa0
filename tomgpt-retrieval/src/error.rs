use thiserror::Error;
use tomgpt_core::{EmbeddingError, StoreError, TomGptError};

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("invalid document id: {0}")]
    InvalidId(String),
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("completion error: {0}")]
    Completion(#[from] TomGptError),
}

pub type RetrievalResult<T> = Result<T, RetrievalError>;
