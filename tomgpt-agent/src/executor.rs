use std::sync::Arc;

use tomgpt_core::{
    AgentEvent, CallbackManager, LlmRequest, Runnable, Scratchpad, ScratchpadStep, Transcript,
};
use tomgpt_llm::{complete_with_callbacks, Llm};
use tracing::Instrument;

use crate::parser::{parse_react_output, AgentDecision};
use crate::prompt::{ReactPrompt, ITERATION_LIMIT_ANSWER, OBSERVATION_STOP};
use crate::{AgentError, LoopState, ParseErrorPolicy, ToolFailurePolicy, ToolRegistry};

pub const DEFAULT_MAX_ITERATIONS: usize = 15;

const PARSE_ERROR_OBSERVATION: &str = "Invalid or incomplete response";
const EXCEPTION_ACTION: &str = "_Exception";

/// Outcome of one user turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnResult {
    pub final_answer: String,
    /// Completions requested during the turn.
    pub iterations: usize,
    /// Set when the iteration cap produced the fallback answer.
    pub stopped_early: bool,
}

/// Runs the reasoning loop for a single question.
pub struct AgentExecutor {
    llm: Arc<dyn Llm>,
    registry: ToolRegistry,
    prompt: ReactPrompt,
    max_iterations: usize,
    parse_error_policy: ParseErrorPolicy,
    tool_failure_policy: ToolFailurePolicy,
    streaming: bool,
    stop: Vec<String>,
}

pub struct AgentExecutorBuilder {
    llm: Option<Arc<dyn Llm>>,
    registry: Option<ToolRegistry>,
    prompt: Option<ReactPrompt>,
    max_iterations: usize,
    parse_error_policy: ParseErrorPolicy,
    tool_failure_policy: ToolFailurePolicy,
    streaming: bool,
}

impl AgentExecutor {
    pub fn builder() -> AgentExecutorBuilder {
        AgentExecutorBuilder {
            llm: None,
            registry: None,
            prompt: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            parse_error_policy: ParseErrorPolicy::default(),
            tool_failure_policy: ToolFailurePolicy::default(),
            streaming: true,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Answers `question`, with `history` as the conversation so far (not
    /// including the question itself).
    pub async fn run(
        &self,
        question: &str,
        history: &Transcript,
        callbacks: &CallbackManager,
    ) -> Result<TurnResult, AgentError> {
        let span = tracing::info_span!(
            "agent_turn",
            max_iterations = self.max_iterations,
            tools = self.registry.len()
        );
        self.run_loop(question, history, callbacks)
            .instrument(span)
            .await
    }

    async fn run_loop(
        &self,
        question: &str,
        history: &Transcript,
        callbacks: &CallbackManager,
    ) -> Result<TurnResult, AgentError> {
        let mut scratchpad = Scratchpad::new();
        let mut iterations = 0usize;
        let mut state = LoopState::Thinking;

        loop {
            tracing::trace!(state = state.name(), iterations, "loop transition");
            state = match state {
                LoopState::Thinking => {
                    if iterations >= self.max_iterations {
                        return Ok(self.stop_early(iterations, callbacks).await);
                    }
                    iterations += 1;
                    self.think(question, history, &scratchpad, iterations, callbacks)
                        .await?
                }
                LoopState::ActionDispatch {
                    tool,
                    input,
                    thought,
                    log,
                } => {
                    self.dispatch(tool, input, thought, log, iterations, callbacks)
                        .await
                }
                LoopState::Observing { tool, step } => {
                    callbacks
                        .on_agent_event(&AgentEvent::Observation {
                            tool_name: tool,
                            output: step.observation.clone(),
                            step: iterations,
                        })
                        .await;
                    scratchpad.push(step);
                    LoopState::Thinking
                }
                LoopState::Done { answer } => {
                    callbacks
                        .on_agent_event(&AgentEvent::Final {
                            content: answer.clone(),
                            step: iterations,
                        })
                        .await;
                    tracing::debug!(iterations, "agent produced final answer");
                    return Ok(TurnResult {
                        final_answer: answer,
                        iterations,
                        stopped_early: false,
                    });
                }
                LoopState::Failed { error } => {
                    callbacks
                        .on_agent_event(&AgentEvent::Error {
                            message: error.to_string(),
                            step: iterations,
                            recoverable: false,
                        })
                        .await;
                    return Err(error);
                }
            };
        }
    }

    async fn think(
        &self,
        question: &str,
        history: &Transcript,
        scratchpad: &Scratchpad,
        step: usize,
        callbacks: &CallbackManager,
    ) -> Result<LoopState, AgentError> {
        let prompt = self.prompt.render(&self.registry, question, scratchpad, history)?;
        let request = LlmRequest::from_prompt(prompt).with_stop(self.stop.clone());
        tracing::debug!(step, "requesting completion");

        let response = if self.streaming {
            complete_with_callbacks(self.llm.as_ref(), request, callbacks).await
        } else {
            self.llm.invoke(request).await
        };
        let completion = match response {
            Ok(response) => truncate_at_stop(&response.content, &self.stop).to_string(),
            Err(err) => {
                let error = AgentError::Completion(err);
                tracing::warn!(step, error = %error, "completion failed");
                return Ok(LoopState::Failed { error });
            }
        };

        match parse_react_output(&completion) {
            Ok(decision) => {
                if !decision.thought().is_empty() {
                    callbacks
                        .on_agent_event(&AgentEvent::Thought {
                            content: decision.thought().to_string(),
                            step,
                        })
                        .await;
                }
                Ok(match decision {
                    AgentDecision::Finish { answer, .. } => LoopState::Done { answer },
                    AgentDecision::Act {
                        tool,
                        input,
                        thought,
                        log,
                    } => LoopState::ActionDispatch {
                        tool,
                        input,
                        thought,
                        log,
                    },
                })
            }
            Err(error) => self.on_parse_error(error, completion, step, callbacks).await,
        }
    }

    async fn on_parse_error(
        &self,
        error: AgentError,
        completion: String,
        step: usize,
        callbacks: &CallbackManager,
    ) -> Result<LoopState, AgentError> {
        if self.parse_error_policy == ParseErrorPolicy::FailFast {
            return Ok(LoopState::Failed { error });
        }

        let reason = match &error {
            AgentError::Parse { reason, .. } => reason.clone(),
            other => other.to_string(),
        };
        tracing::warn!(step, reason = %reason, "unparseable completion, reprompting");
        report(&error, step, callbacks).await;

        Ok(LoopState::Observing {
            tool: EXCEPTION_ACTION.to_string(),
            step: ScratchpadStep {
                log: completion,
                thought: String::new(),
                action: EXCEPTION_ACTION.to_string(),
                action_input: String::new(),
                observation: format!("{PARSE_ERROR_OBSERVATION}: {reason}"),
            },
        })
    }

    async fn dispatch(
        &self,
        tool: String,
        input: String,
        thought: String,
        log: String,
        step: usize,
        callbacks: &CallbackManager,
    ) -> LoopState {
        callbacks
            .on_agent_event(&AgentEvent::ToolCall {
                tool_name: tool.clone(),
                input: input.clone(),
                step,
            })
            .await;

        let observation = match self.registry.get(&tool) {
            None => {
                let error = AgentError::ToolNotFound {
                    name: tool.clone(),
                    available: self
                        .registry
                        .names()
                        .into_iter()
                        .map(ToOwned::to_owned)
                        .collect(),
                };
                tracing::warn!(step, tool = %tool, "model requested an unknown tool");
                report(&error, step, callbacks).await;
                error.to_string()
            }
            Some(resolved) => {
                tracing::debug!(step, tool = %tool, input = %input, "invoking tool");
                match resolved.invoke(&input).await {
                    Ok(output) => output,
                    Err(err) => {
                        let error = AgentError::ToolExecution {
                            tool: tool.clone(),
                            message: err.to_string(),
                        };
                        if self.tool_failure_policy == ToolFailurePolicy::FailFast {
                            return LoopState::Failed { error };
                        }
                        tracing::warn!(step, error = %error, "tool failed, continuing");
                        report(&error, step, callbacks).await;
                        err.to_string()
                    }
                }
            }
        };

        LoopState::Observing {
            step: ScratchpadStep {
                log,
                thought,
                action: tool.clone(),
                action_input: input,
                observation,
            },
            tool,
        }
    }

    async fn stop_early(&self, iterations: usize, callbacks: &CallbackManager) -> TurnResult {
        let error = AgentError::IterationLimitExceeded {
            max_iterations: self.max_iterations,
        };
        tracing::warn!(iterations, "{error}");
        report(&error, iterations, callbacks).await;
        callbacks
            .on_agent_event(&AgentEvent::Final {
                content: ITERATION_LIMIT_ANSWER.to_string(),
                step: iterations,
            })
            .await;
        TurnResult {
            final_answer: ITERATION_LIMIT_ANSWER.to_string(),
            iterations,
            stopped_early: true,
        }
    }
}

/// Announces an error the loop is about to absorb into its next step.
async fn report(error: &AgentError, step: usize, callbacks: &CallbackManager) {
    callbacks
        .on_agent_event(&AgentEvent::Error {
            message: error.to_string(),
            step,
            recoverable: error.is_recoverable(),
        })
        .await;
}

/// Cuts a completion at the earliest stop sequence, for providers that echo
/// it back or ignore it.
fn truncate_at_stop<'a>(text: &'a str, stop: &[String]) -> &'a str {
    stop.iter()
        .filter(|sequence| !sequence.is_empty())
        .filter_map(|sequence| text.find(sequence.as_str()))
        .min()
        .map_or(text, |index| &text[..index])
}

impl AgentExecutorBuilder {
    pub fn llm(mut self, llm: Arc<dyn Llm>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn registry(mut self, registry: ToolRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn prompt(mut self, prompt: ReactPrompt) -> Self {
        self.prompt = Some(prompt);
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn parse_error_policy(mut self, policy: ParseErrorPolicy) -> Self {
        self.parse_error_policy = policy;
        self
    }

    pub fn tool_failure_policy(mut self, policy: ToolFailurePolicy) -> Self {
        self.tool_failure_policy = policy;
        self
    }

    /// Stream completion tokens to `on_llm_token`; otherwise use `invoke`.
    pub fn streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn build(self) -> Result<AgentExecutor, AgentError> {
        let llm = self
            .llm
            .ok_or_else(|| AgentError::Config("llm is required".to_string()))?;
        let registry = self
            .registry
            .ok_or_else(|| AgentError::Config("tool registry is required".to_string()))?;
        if self.max_iterations == 0 {
            return Err(AgentError::Config(
                "max_iterations must be greater than 0".to_string(),
            ));
        }
        let prompt = match self.prompt {
            Some(prompt) => prompt,
            None => ReactPrompt::default_template()?,
        };

        Ok(AgentExecutor {
            llm,
            registry,
            prompt,
            max_iterations: self.max_iterations,
            parse_error_policy: self.parse_error_policy,
            tool_failure_policy: self.tool_failure_policy,
            streaming: self.streaming,
            stop: vec![OBSERVATION_STOP.to_string()],
        })
    }
}
