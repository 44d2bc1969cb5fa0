use async_trait::async_trait;
use tomgpt_core::{MetadataFilter, SearchResult};

use crate::error::RetrievalError;

/// Anything that turns a query into ranked chunks, most relevant first.
#[async_trait]
pub trait BaseRetriever: Send + Sync {
    async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SearchResult>, RetrievalError>;
}
