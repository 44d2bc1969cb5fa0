#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use tomgpt_agent::{AgentExecutor, ToolRegistry};
use tomgpt_core::{
    AgentEvent, CallbackHandler, LlmRequest, LlmResponse, Runnable, StreamEvent, Tool, ToolError,
    TomGptError,
};

/// Replays canned completions and records every prompt it was sent.
#[derive(Default)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String, String>>>,
    repeat: Option<String>,
    pub prompts: Mutex<Vec<String>>,
    pub stops: Mutex<Vec<Vec<String>>>,
    pub invoke_calls: Mutex<usize>,
    pub stream_calls: Mutex<usize>,
}

impl ScriptedLlm {
    pub fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
            ..Default::default()
        })
    }

    pub fn repeating(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            repeat: Some(reply.to_string()),
            ..Default::default()
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::from([Err(message.to_string())])),
            ..Default::default()
        })
    }

    pub fn prompt(&self, index: usize) -> String {
        self.prompts.lock().unwrap()[index].clone()
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn next(&self, request: &LlmRequest) -> Result<String, TomGptError> {
        let prompt = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.prompts.lock().unwrap().push(prompt);
        self.stops.lock().unwrap().push(request.stop.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(TomGptError::LlmProvider(message)),
            None => self
                .repeat
                .clone()
                .ok_or_else(|| TomGptError::LlmProvider("script exhausted".to_string())),
        }
    }
}

#[async_trait]
impl Runnable<LlmRequest, LlmResponse> for ScriptedLlm {
    async fn invoke(&self, input: LlmRequest) -> Result<LlmResponse, TomGptError> {
        *self.invoke_calls.lock().unwrap() += 1;
        let content = self.next(&input)?;
        Ok(LlmResponse {
            content,
            finish_reason: None,
        })
    }

    fn stream(&self, input: LlmRequest) -> BoxStream<'_, Result<StreamEvent, TomGptError>> {
        *self.stream_calls.lock().unwrap() += 1;
        match self.next(&input) {
            Ok(text) => {
                let mid = text
                    .char_indices()
                    .map(|(i, _)| i)
                    .nth(text.chars().count() / 2)
                    .unwrap_or(0);
                let (head, tail) = text.split_at(mid);
                stream::iter(vec![
                    Ok(StreamEvent::ContentChunk(head.to_string())),
                    Ok(StreamEvent::ContentChunk(tail.to_string())),
                    Ok(StreamEvent::FinalAnswer(text.clone())),
                ])
                .boxed()
            }
            Err(err) => stream::iter(vec![Err(err)]).boxed(),
        }
    }
}

/// Tool double that records its inputs.
pub struct RecordingTool {
    name: String,
    description: String,
    reply: Result<String, String>,
    pub calls: Mutex<Vec<String>>,
    log: Option<Arc<Mutex<Vec<String>>>>,
}

impl RecordingTool {
    pub fn ok(name: &str, description: &str, output: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            description: description.to_string(),
            reply: Ok(output.to_string()),
            calls: Mutex::new(Vec::new()),
            log: None,
        })
    }

    pub fn failing(name: &str, message: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            description: format!("{name} tool"),
            reply: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
            log: None,
        })
    }

    /// Shares a call log across tools to check invocation order.
    pub fn logged(
        name: &str,
        description: &str,
        output: &str,
        log: Arc<Mutex<Vec<String>>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            description: description.to_string(),
            reply: Ok(output.to_string()),
            calls: Mutex::new(Vec::new()),
            log: Some(log),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Tool for RecordingTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        self.calls.lock().unwrap().push(input.to_string());
        if let Some(log) = &self.log {
            log.lock().unwrap().push(self.name.clone());
        }
        self.reply
            .clone()
            .map_err(ToolError::ExecutionFailed)
    }
}

#[derive(Default)]
pub struct EventRecorder {
    pub events: Mutex<Vec<AgentEvent>>,
    pub tokens: Mutex<Vec<String>>,
}

impl EventRecorder {
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|event| match event {
                AgentEvent::Thought { .. } => "thought",
                AgentEvent::ToolCall { .. } => "tool_call",
                AgentEvent::Observation { .. } => "observation",
                AgentEvent::Final { .. } => "final",
                AgentEvent::Error { .. } => "error",
            })
            .collect()
    }
}

#[async_trait]
impl CallbackHandler for EventRecorder {
    async fn on_llm_token(&self, token: &str) {
        self.tokens.lock().unwrap().push(token.to_string());
    }

    async fn on_agent_event(&self, event: &AgentEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

pub fn registry(tools: Vec<Arc<dyn Tool>>) -> ToolRegistry {
    ToolRegistry::builder()
        .register_all(tools)
        .build()
        .expect("registry")
}

pub fn executor(llm: Arc<ScriptedLlm>, tools: Vec<Arc<dyn Tool>>) -> AgentExecutor {
    AgentExecutor::builder()
        .llm(llm)
        .registry(registry(tools))
        .build()
        .expect("executor")
}
