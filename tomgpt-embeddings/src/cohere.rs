use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tomgpt_core::{Embedding, EmbeddingError};

use crate::EmbeddingProviderError;

const COHERE_BASE_URL: &str = "https://api.cohere.com";
pub const DEFAULT_EMBED_MODEL: &str = "embed-multilingual-v3.0";
pub const DEFAULT_EMBED_DIMENSION: usize = 1024;

/// Cohere v3 models embed queries and documents differently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    #[default]
    SearchQuery,
    SearchDocument,
}

#[derive(Clone)]
pub struct CohereEmbedding {
    base_url: String,
    api_key: String,
    model: String,
    dimension: usize,
    input_type: InputType,
    http: Client,
}

impl CohereEmbedding {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: COHERE_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_EMBED_MODEL.to_string(),
            dimension: DEFAULT_EMBED_DIMENSION,
            input_type: InputType::default(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>, dimension: usize) -> Self {
        self.model = model.into();
        self.dimension = dimension;
        self
    }

    pub fn with_input_type(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    async fn request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
        let url = format!("{}/v1/embed", self.base_url.trim_end_matches('/'));
        let body = EmbedRequest {
            texts,
            model: &self.model,
            input_type: self.input_type,
        };
        tracing::debug!(model = %self.model, count = texts.len(), "cohere embed");

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| EmbeddingProviderError::Request(err.to_string()))?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(EmbeddingProviderError::RateLimited { retry_after });
        }

        let response: EmbedResponse = response
            .error_for_status()
            .map_err(|err| EmbeddingProviderError::Request(err.to_string()))?
            .json()
            .await
            .map_err(|err| EmbeddingProviderError::InvalidResponse(err.to_string()))?;

        if response.embeddings.len() != texts.len() {
            return Err(EmbeddingProviderError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                response.embeddings.len()
            )));
        }
        if let Some(bad) = response
            .embeddings
            .iter()
            .find(|vector| vector.len() != self.dimension)
        {
            return Err(EmbeddingProviderError::InvalidResponse(format!(
                "expected embedding dimension {}, got {}",
                self.dimension,
                bad.len()
            )));
        }

        Ok(response.embeddings)
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    texts: &'a [String],
    model: &'a str,
    input_type: InputType,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[async_trait]
impl Embedding for CohereEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.request(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| EmbeddingError::InvalidResponse("empty embeddings".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.request(texts).await?)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
