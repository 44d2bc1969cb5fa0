use std::time::Duration;

use thiserror::Error;
use tomgpt_core::EmbeddingError;

/// What can go wrong talking to a hosted embedding endpoint.
#[derive(Debug, Error)]
pub enum EmbeddingProviderError {
    #[error("embed request failed: {0}")]
    Request(String),
    #[error("unexpected embed response: {0}")]
    InvalidResponse(String),
    #[error("embed endpoint rate limited the request")]
    RateLimited { retry_after: Option<Duration> },
}

impl From<EmbeddingProviderError> for EmbeddingError {
    fn from(error: EmbeddingProviderError) -> Self {
        match error {
            EmbeddingProviderError::Request(message) => EmbeddingError::Provider(message),
            EmbeddingProviderError::InvalidResponse(message) => {
                EmbeddingError::InvalidResponse(message)
            }
            EmbeddingProviderError::RateLimited { retry_after } => {
                EmbeddingError::RateLimited { retry_after }
            }
        }
    }
}
