#[cfg(any(feature = "cohere", feature = "ollama"))]
mod ndjson;
mod stream;

#[cfg(feature = "cohere")]
mod cohere;

#[cfg(feature = "ollama")]
mod ollama;

pub use stream::complete_with_callbacks;
pub use tomgpt_core::{LlmRequest, LlmResponse, Message, Role};

#[cfg(feature = "cohere")]
pub use cohere::{CohereClient, COHERE_BASE_URL, DEFAULT_COHERE_MODEL};

#[cfg(feature = "ollama")]
pub use ollama::{OllamaClient, OLLAMA_BASE_URL};

use tomgpt_core::Runnable;

/// Any completion service usable behind an `Arc<dyn Llm>`.
pub trait Llm: Runnable<LlmRequest, LlmResponse> + Send + Sync {}

impl<T> Llm for T where T: Runnable<LlmRequest, LlmResponse> + Send + Sync {}
