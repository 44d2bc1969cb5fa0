//! Shared building blocks for the TomGPT agent crates.
//!
//! Everything that crosses a crate boundary lives here: chat messages and the
//! session [`Transcript`], the [`Tool`] contract, the [`Runnable`] completion
//! interface, the ReAct [`Scratchpad`], retrieval primitives and the
//! callback/event types used for streaming display.

mod agent_event;
mod callbacks;
mod document;
mod embedding;
mod error;
mod llm;
mod metadata_filter;
mod react;
mod runnable;
mod tool;
mod transcript;
mod value;
mod vector_store;

pub use agent_event::AgentEvent;
pub use callbacks::{CallbackHandler, CallbackManager};
pub use document::Document;
pub use embedding::Embedding;
pub use error::{EmbeddingError, StoreError, TomGptError};
pub use llm::{LlmRequest, LlmResponse, Message, Role};
pub use metadata_filter::MetadataFilter;
pub use react::{Scratchpad, ScratchpadStep};
pub use runnable::{Runnable, StreamEvent};
pub use tool::{Tool, ToolError};
pub use transcript::Transcript;
pub use value::Value;
pub use vector_store::{SearchResult, VectorStore};
