//! Pinecone vector store integration for TomGPT.
//!
//! The store only queries an existing index: documents are embedded and
//! upserted out of band. It can be pointed at an index host directly or at an
//! index name, which is resolved through the Pinecone control plane.
//!
//! Environment variables commonly used by the binary:
//! - `PINECONE_API_KEY`
//! - `PINECONE_INDEX_HOST` (optional, skips name resolution)

pub mod client;
mod config;
mod error;
pub mod filter;
pub mod mapper;
mod store;
mod types;

pub use config::{PineconeStoreBuilder, PINECONE_CONTROLLER_URL};
pub use error::PineconeStoreError;
pub use store::PineconeVectorStore;
