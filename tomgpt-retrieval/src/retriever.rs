use async_trait::async_trait;
use tomgpt_core::{Embedding, MetadataFilter, SearchResult, VectorStore};

use crate::{BaseRetriever, RetrievalError};

/// Embeds the query, then searches the store with the resulting vector.
pub struct Retriever<E, S> {
    embedder: E,
    store: S,
}

impl<E, S> Retriever<E, S>
where
    E: Embedding,
    S: VectorStore,
{
    pub fn new(embedder: E, store: S) -> Self {
        Self { embedder, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait]
impl<E, S> BaseRetriever for Retriever<E, S>
where
    E: Embedding + Send + Sync,
    S: VectorStore + Send + Sync,
{
    async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SearchResult>, RetrievalError> {
        let embedding = self.embedder.embed(query).await?;
        let results = self.store.search(&embedding, top_k, filter).await?;
        tracing::debug!(top_k, hits = results.len(), "retrieved chunks");
        Ok(results)
    }
}
