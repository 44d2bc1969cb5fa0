use std::sync::Arc;

use tokio::sync::RwLock;
use tomgpt_core::{Document, MetadataFilter, SearchResult, StoreError, VectorStore};

struct Entry {
    document: Document,
    vector: Vec<f32>,
}

#[derive(Default)]
struct Index {
    entries: Vec<Entry>,
    dimension: Option<usize>,
}

/// Local stand-in for the hosted index, ranked by cosine similarity.
#[derive(Clone, Default)]
pub struct InMemoryVectorStore {
    index: Arc<RwLock<Index>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts pre-embedded documents; re-adding an id replaces it.
    pub async fn add(&self, docs: Vec<Document>) -> Result<(), StoreError> {
        let mut index = self.index.write().await;
        for mut document in docs {
            if document.id.trim().is_empty() {
                return Err(StoreError::InvalidId(document.id));
            }
            let Some(vector) = document.embedding.take() else {
                return Err(StoreError::Internal(
                    format!("document '{}' has no embedding", document.id).into(),
                ));
            };
            let dimension = *index.dimension.get_or_insert(vector.len());
            if dimension != vector.len() {
                return Err(StoreError::DimensionMismatch {
                    expected: dimension,
                    got: vector.len(),
                });
            }

            let entry = Entry { document, vector };
            match index
                .entries
                .iter()
                .position(|existing| existing.document.id == entry.document.id)
            {
                Some(position) => index.entries[position] = entry,
                None => index.entries.push(entry),
            }
        }
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.index.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SearchResult>, StoreError> {
        let index = self.index.read().await;
        if let Some(dimension) = index.dimension.filter(|&d| d != query_embedding.len()) {
            return Err(StoreError::DimensionMismatch {
                expected: dimension,
                got: query_embedding.len(),
            });
        }

        let mut results: Vec<SearchResult> = index
            .entries
            .iter()
            .filter(|entry| filter.map_or(true, |f| f.matches(&entry.document.metadata)))
            .map(|entry| SearchResult {
                document: entry.document.clone(),
                score: cosine(query_embedding, &entry.vector),
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(top_k);
        Ok(results)
    }
}

/// NaN (from non-finite input) ranks last.
fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm = |v: &[f32]| v.iter().map(|x| x * x).sum::<f32>().sqrt();
    let denominator = norm(a) * norm(b);
    if denominator == 0.0 {
        return 0.0;
    }
    let score = dot / denominator;
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        score
    }
}
