//! Cohere chat API client

use futures::stream::{self, BoxStream, StreamExt};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tomgpt_core::{LlmRequest, LlmResponse, Message, Role, Runnable, StreamEvent, TomGptError};

use crate::ndjson::{parse_ndjson_response, LineOutcome};

pub const COHERE_BASE_URL: &str = "https://api.cohere.com";
pub const DEFAULT_COHERE_MODEL: &str = "command-r";

#[derive(Clone)]
pub struct CohereClient {
    base_url: String,
    api_key: String,
    model: String,
    temperature: Option<f32>,
    http: Client,
}

impl CohereClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, TomGptError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(TomGptError::InvalidConfig(
                "cohere api key must not be empty".to_string(),
            ));
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|err| TomGptError::LlmProvider(err.to_string()))?;
        Ok(Self {
            base_url: COHERE_BASE_URL.to_string(),
            api_key,
            model: model.into(),
            temperature: None,
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_url(&self) -> String {
        format!("{}/v1/chat", self.base_url.trim_end_matches('/'))
    }

    fn build_request(&self, input: LlmRequest, stream: bool) -> ChatRequest {
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
        let (preamble, chat_history, message) = split_messages(messages);
        ChatRequest {
            model,
            message,
            chat_history,
            preamble,
            temperature: temperature.or(self.temperature),
            stop_sequences: stop,
            stream,
        }
    }

    async fn send(&self, request: &ChatRequest) -> Result<Response, TomGptError> {
        let response = self
            .http
            .post(self.chat_url())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|err| TomGptError::LlmProvider(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<CohereErrorResponse>(&body)
            .map(|e| e.message)
            .unwrap_or_else(|_| format!("HTTP {}: {}", status, body));
        Err(TomGptError::LlmProvider(message))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    chat_history: Vec<ChatHistoryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    preamble: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop_sequences: Vec<String>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatHistoryEntry {
    role: &'static str,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    text: String,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatStreamEvent {
    event_type: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    finish_reason: Option<String>,
    #[serde(default)]
    response: Option<ChatResponse>,
}

#[derive(Debug, Deserialize)]
struct CohereErrorResponse {
    message: String,
}

fn history_role(role: Role) -> &'static str {
    match role {
        Role::System => "SYSTEM",
        Role::User => "USER",
        Role::Assistant => "CHATBOT",
    }
}

/// Splits generic messages into Cohere's `preamble`, `chat_history` and the
/// final `message`.
///
/// System messages form the preamble. The last non-system message is sent as
/// `message`; everything before it goes to the history.
fn split_messages(messages: Vec<Message>) -> (Option<String>, Vec<ChatHistoryEntry>, String) {
    let mut system = Vec::new();
    let mut conversation = Vec::new();
    for message in messages {
        match message.role {
            Role::System => system.push(message.content),
            _ => conversation.push(message),
        }
    }

    let message = conversation
        .pop()
        .map(|message| message.content)
        .unwrap_or_default();
    let chat_history = conversation
        .into_iter()
        .map(|message| ChatHistoryEntry {
            role: history_role(message.role),
            message: message.content,
        })
        .collect();
    let preamble = if system.is_empty() {
        None
    } else {
        Some(system.join("\n\n"))
    };

    (preamble, chat_history, message)
}

fn is_error_finish_reason(reason: &str) -> bool {
    matches!(reason, "ERROR" | "ERROR_TOXIC" | "ERROR_LIMIT")
}

fn map_stream_event(event: ChatStreamEvent, accumulated: &mut String) -> LineOutcome {
    match event.event_type.as_str() {
        "text-generation" => {
            let text = event.text.unwrap_or_default();
            if text.is_empty() {
                return LineOutcome {
                    events: Vec::new(),
                    done: false,
                };
            }
            accumulated.push_str(&text);
            LineOutcome {
                events: vec![Ok(StreamEvent::ContentChunk(text))],
                done: false,
            }
        }
        "stream-end" => {
            let reason = event
                .finish_reason
                .or_else(|| event.response.as_ref().and_then(|r| r.finish_reason.clone()));
            if let Some(reason) = reason.as_deref().filter(|r| is_error_finish_reason(r)) {
                return LineOutcome {
                    events: vec![Err(TomGptError::LlmProvider(format!(
                        "Generation failed: {}",
                        reason
                    )))],
                    done: true,
                };
            }
            let text = event
                .response
                .map(|response| response.text)
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| accumulated.clone());
            let mut events = Vec::new();
            if let Some(reason) = reason {
                events.push(Ok(StreamEvent::Metadata {
                    key: "finish_reason".to_string(),
                    value: reason.into(),
                }));
            }
            events.push(Ok(StreamEvent::FinalAnswer(text)));
            LineOutcome { events, done: true }
        }
        _ => LineOutcome {
            events: Vec::new(),
            done: false,
        },
    }
}

#[async_trait::async_trait]
impl Runnable<LlmRequest, LlmResponse> for CohereClient {
    async fn invoke(&self, input: LlmRequest) -> Result<LlmResponse, TomGptError> {
        let request = self.build_request(input, false);
        tracing::debug!(model = %request.model, stop = ?request.stop_sequences, "cohere chat");

        let response = self
            .send(&request)
            .await?
            .json::<ChatResponse>()
            .await
            .map_err(|err| TomGptError::LlmProvider(err.to_string()))?;

        if let Some(reason) = response
            .finish_reason
            .as_deref()
            .filter(|reason| is_error_finish_reason(reason))
        {
            return Err(TomGptError::LlmProvider(format!(
                "Generation failed: {}",
                reason
            )));
        }

        Ok(LlmResponse {
            content: response.text,
            finish_reason: response.finish_reason,
        })
    }

    fn stream(&self, input: LlmRequest) -> BoxStream<'_, Result<StreamEvent, TomGptError>> {
        let request = self.build_request(input, true);
        tracing::debug!(model = %request.model, "cohere chat stream");

        stream::once(async move { self.send(&request).await })
            .flat_map(|result| match result {
                Ok(response) => {
                    let mut accumulated = String::new();
                    parse_ndjson_response(response, move |event: ChatStreamEvent| {
                        map_stream_event(event, &mut accumulated)
                    })
                }
                Err(err) => stream::iter(vec![Err(err)]).boxed(),
            })
            .boxed()
    }
}
