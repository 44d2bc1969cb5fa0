use futures::StreamExt;
use tomgpt_core::{CallbackManager, LlmRequest, LlmResponse, StreamEvent, TomGptError};

use crate::Llm;

/// Runs a streaming completion, forwarding every chunk to the callbacks, and
/// returns the full text.
///
/// Providers that end without a terminal event still yield the concatenated
/// chunks.
pub async fn complete_with_callbacks<L>(
    llm: &L,
    request: LlmRequest,
    callbacks: &CallbackManager,
) -> Result<LlmResponse, TomGptError>
where
    L: Llm + ?Sized,
{
    let mut events = llm.stream(request);
    let mut accumulated = String::new();
    let mut finish_reason = None;

    while let Some(event) = events.next().await {
        match event? {
            StreamEvent::ContentChunk(chunk) => {
                if !chunk.is_empty() {
                    callbacks.on_llm_token(&chunk).await;
                    accumulated.push_str(&chunk);
                }
            }
            StreamEvent::Metadata { key, value } => {
                if key == "finish_reason" {
                    finish_reason = value.as_str().map(ToOwned::to_owned);
                }
            }
            StreamEvent::FinalAnswer(text) => {
                let content = if text.is_empty() { accumulated } else { text };
                return Ok(LlmResponse {
                    content,
                    finish_reason,
                });
            }
        }
    }

    Ok(LlmResponse {
        content: accumulated,
        finish_reason,
    })
}
