use serde_json::{Map, Value};
use tomgpt_core::{Document, Embedding, MetadataFilter, SearchResult, StoreError, VectorStore};
use tracing::Instrument;

use crate::client::PineconeEndpoint;
use crate::config::PineconeStoreBuilder;
use crate::filter::filter_to_json;
use crate::mapper::match_to_document;
use crate::types::{IndexStatsResponse, QueryMatch, QueryRequest, QueryResponse};

/// Read-only view of an existing Pinecone index.
pub struct PineconeVectorStore<E> {
    embedder: E,
    endpoint: PineconeEndpoint,
    namespace: Option<String>,
    text_key: String,
    index_name: Option<String>,
}

impl<E> PineconeVectorStore<E>
where
    E: Embedding + Send + Sync,
{
    pub fn builder(embedder: E) -> PineconeStoreBuilder<E> {
        PineconeStoreBuilder::new(embedder)
    }
}

impl<E> PineconeVectorStore<E> {
    pub(crate) fn new(
        embedder: E,
        endpoint: PineconeEndpoint,
        namespace: Option<String>,
        text_key: String,
        index_name: Option<String>,
    ) -> Self {
        Self {
            embedder,
            endpoint,
            namespace,
            text_key,
            index_name,
        }
    }

    pub fn text_key(&self) -> &str {
        &self.text_key
    }

    pub fn host(&self) -> &str {
        self.endpoint.root()
    }

    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    fn to_result(&self, hit: QueryMatch) -> Result<SearchResult, StoreError> {
        let metadata = hit
            .metadata
            .unwrap_or_else(|| Value::Object(Map::new()));
        let document = match_to_document(&hit.id, &metadata, &self.text_key)?;
        Ok(SearchResult {
            document,
            score: hit.score,
        })
    }
}

impl<E> PineconeVectorStore<E>
where
    E: Embedding + Send + Sync,
{
    /// Warns when the index and the embedder disagree on vector size.
    pub(crate) async fn check_dimension(&self) {
        let expected = self.embedder.dimension();
        let stats = self
            .endpoint
            .post::<_, IndexStatsResponse>("/describe_index_stats", &Map::new(), None)
            .await;
        match stats {
            Ok(IndexStatsResponse { dimension: Some(actual) }) if actual != expected => {
                tracing::warn!(
                    index_name = ?self.index_name,
                    index_dimension = actual,
                    embedder_dimension = expected,
                    "embedder and pinecone index dimensions differ"
                )
            }
            Ok(IndexStatsResponse { dimension: None }) => {
                tracing::warn!("index stats did not report a dimension")
            }
            Ok(_) => {}
            Err(err) => tracing::warn!(error = %err, "could not read pinecone index stats"),
        }
    }

    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SearchResult>, StoreError> {
        let filter = match filter {
            Some(filter) => Some(filter_to_json(filter)?),
            None => None,
        };
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            filter,
            namespace: self.namespace.clone(),
        };
        let span = tracing::info_span!(
            "pinecone_query",
            index_name = ?self.index_name,
            namespace = ?self.namespace,
            top_k,
        );

        let response = self
            .endpoint
            .post::<_, QueryResponse>("/query", &request, self.namespace.as_deref())
            .instrument(span)
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, retryable = err.is_retryable(), "pinecone query failed");
                err
            })?;

        let results = response
            .matches
            .into_iter()
            .map(|hit| self.to_result(hit))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(matches = results.len(), "pinecone query finished");
        Ok(results)
    }

    /// Embeds `query` and returns the closest chunks with their scores.
    pub async fn similarity_search_with_score(
        &self,
        query: &str,
        k: usize,
        filter: Option<MetadataFilter>,
    ) -> Result<Vec<SearchResult>, StoreError> {
        let vector = self
            .embedder
            .embed(query)
            .await
            .map_err(|err| StoreError::Internal(Box::new(err)))?;
        self.query(vector, k, filter.as_ref()).await
    }

    pub async fn similarity_search(
        &self,
        query: &str,
        k: usize,
        filter: Option<MetadataFilter>,
    ) -> Result<Vec<Document>, StoreError> {
        let hits = self.similarity_search_with_score(query, k, filter).await?;
        Ok(hits.into_iter().map(|hit| hit.document).collect())
    }
}

#[async_trait::async_trait]
impl<E> VectorStore for PineconeVectorStore<E>
where
    E: Embedding + Send + Sync,
{
    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SearchResult>, StoreError> {
        self.query(query_embedding.to_vec(), top_k, filter).await
    }
}
