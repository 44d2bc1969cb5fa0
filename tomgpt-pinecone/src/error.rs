use thiserror::Error;
use tomgpt_core::StoreError;

#[derive(Debug, Error)]
pub enum PineconeStoreError {
    #[error("pinecone store misconfigured: {0}")]
    Config(String),
    #[error("could not reach pinecone: {0}")]
    Transport(String),
    #[error("pinecone returned HTTP {status}: {message}")]
    Api {
        status: u16,
        message: String,
        retry_after_seconds: Option<u64>,
        namespace: Option<String>,
    },
    #[error("unexpected pinecone response: {0}")]
    Malformed(String),
    #[error("match metadata has no string field '{text_key}' to rebuild the chunk from")]
    MissingTextKey { text_key: String },
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

impl PineconeStoreError {
    /// Rate limiting and server-side failures; everything else needs a fix.
    pub fn is_retryable(&self) -> bool {
        match self {
            PineconeStoreError::Transport(_) => true,
            PineconeStoreError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<PineconeStoreError> for StoreError {
    fn from(value: PineconeStoreError) -> Self {
        if let PineconeStoreError::DimensionMismatch { expected, got } = value {
            return StoreError::DimensionMismatch { expected, got };
        }
        StoreError::Internal(Box::new(value))
    }
}
