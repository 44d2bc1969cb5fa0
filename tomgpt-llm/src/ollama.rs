use futures::stream::{self, BoxStream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use tomgpt_core::{Runnable, StreamEvent, TomGptError};

use crate::ndjson::{parse_ndjson_response, LineOutcome};
use crate::{LlmRequest, LlmResponse, Message};

pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Chat client for a local Ollama server.
#[derive(Clone)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    temperature: Option<f32>,
    http: Client,
}

fn chunk_events(chunk: OllamaChatResponse, accumulated: &mut String) -> LineOutcome {
    let mut events = Vec::new();
    if !chunk.message.content.is_empty() {
        accumulated.push_str(&chunk.message.content);
        events.push(Ok(StreamEvent::ContentChunk(chunk.message.content)));
    }
    if chunk.done {
        events.push(Ok(StreamEvent::FinalAnswer(accumulated.clone())));
    }
    LineOutcome {
        events,
        done: chunk.done,
    }
}

impl OllamaClient {
    pub fn new(base_url: String, model: String) -> Result<Self, TomGptError> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|err| TomGptError::LlmProvider(err.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            temperature: None,
            http,
        })
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, input: LlmRequest, stream: bool) -> OllamaChatRequest {
        let LlmRequest {
            model,
            messages,
            stop,
            temperature,
        } = input;
        let model = if model.is_empty() {
            self.model.clone()
        } else {
            model
        };
        OllamaChatRequest {
            model,
            messages,
            stream,
            options: OllamaOptions {
                stop,
                temperature: temperature.or(self.temperature),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    done_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

#[async_trait::async_trait]
impl Runnable<LlmRequest, LlmResponse> for OllamaClient {
    async fn invoke(&self, input: LlmRequest) -> Result<LlmResponse, TomGptError> {
        let request = self.build_request(input, false);

        let url = format!("{}/api/chat", self.base_url);
        let response: OllamaChatResponse = self
            .http
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|err| TomGptError::LlmProvider(err.to_string()))?
            .error_for_status()
            .map_err(|err| TomGptError::LlmProvider(err.to_string()))?
            .json()
            .await
            .map_err(|err| TomGptError::LlmProvider(err.to_string()))?;

        Ok(LlmResponse {
            content: response.message.content,
            finish_reason: response.done_reason,
        })
    }

    fn stream(&self, input: LlmRequest) -> BoxStream<'_, Result<StreamEvent, TomGptError>> {
        let request = self.build_request(input, true);
        let url = format!("{}/api/chat", self.base_url);
        let http = self.http.clone();

        stream::once(async move {
            let response = http
                .post(url)
                .json(&request)
                .send()
                .await
                .map_err(|err| TomGptError::LlmProvider(err.to_string()))?
                .error_for_status()
                .map_err(|err| TomGptError::LlmProvider(err.to_string()))?;

            let mut accumulated = String::new();
            Ok::<_, TomGptError>(parse_ndjson_response(
                response,
                move |chunk: OllamaChatResponse| chunk_events(chunk, &mut accumulated),
            ))
        })
        .flat_map(|result| match result {
            Ok(events) => events,
            Err(err) => stream::iter(vec![Err(err)]).boxed(),
        })
        .boxed()
    }
}
