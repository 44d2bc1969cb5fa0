mod error;

#[cfg(feature = "cohere")]
mod cohere;

pub use error::EmbeddingProviderError;

#[cfg(feature = "cohere")]
pub use cohere::{CohereEmbedding, InputType, DEFAULT_EMBED_DIMENSION, DEFAULT_EMBED_MODEL};
