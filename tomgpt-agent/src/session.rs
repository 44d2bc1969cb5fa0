use std::sync::Arc;

use tomgpt_core::{CallbackManager, Transcript};

use crate::{AgentError, AgentExecutor};

/// One chat session: the executor plus the transcript it answers against.
///
/// Every turn appends exactly two messages, the user input and one assistant
/// reply. A failed turn records a short notice as that reply.
pub struct ChatSession {
    executor: Arc<AgentExecutor>,
    transcript: Transcript,
    callbacks: CallbackManager,
}

impl ChatSession {
    pub fn new(executor: Arc<AgentExecutor>, greeting: impl Into<String>) -> Self {
        Self {
            executor,
            transcript: Transcript::with_system(greeting),
            callbacks: CallbackManager::noop(),
        }
    }

    pub fn with_callbacks(mut self, callbacks: CallbackManager) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn executor(&self) -> &AgentExecutor {
        &self.executor
    }

    pub async fn send(&mut self, input: &str) -> Result<String, AgentError> {
        let outcome = self
            .executor
            .run(input, &self.transcript, &self.callbacks)
            .await;

        self.transcript.push_user(input);
        match outcome {
            Ok(result) => {
                self.transcript.push_assistant(result.final_answer.clone());
                Ok(result.final_answer)
            }
            Err(err) => {
                tracing::warn!(error = %err, "turn failed");
                self.transcript.push_assistant(failure_notice(&err));
                Err(err)
            }
        }
    }
}

pub(crate) fn failure_notice(err: &AgentError) -> String {
    format!("Sorry, I could not finish answering that: {err}")
}
