use thiserror::Error;
use tomgpt_core::TomGptError;

#[derive(Debug, Error)]
pub enum AgentError {
    /// The completion matched neither a final answer nor an action.
    #[error("could not parse model output: {reason}")]
    Parse { reason: String, output: String },
    #[error("{name} is not a valid tool, try one of [{}].", .available.join(", "))]
    ToolNotFound {
        name: String,
        available: Vec<String>,
    },
    #[error("tool '{tool}' failed: {message}")]
    ToolExecution { tool: String, message: String },
    #[error("iteration limit of {max_iterations} reached")]
    IterationLimitExceeded { max_iterations: usize },
    #[error("completion failed: {0}")]
    Completion(#[from] TomGptError),
    #[error("invalid agent configuration: {0}")]
    Config(String),
}

impl AgentError {
    /// Whether the loop can turn this error into an observation and go on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AgentError::Parse { .. }
                | AgentError::ToolNotFound { .. }
                | AgentError::ToolExecution { .. }
                | AgentError::IterationLimitExceeded { .. }
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ToolRegistryError {
    #[error("tool name must not be empty or whitespace: {name:?}")]
    InvalidName { name: String },
    #[error("duplicate tool name: {name}")]
    DuplicateName { name: String },
    #[error("at least one tool must be registered")]
    Empty,
}

impl From<ToolRegistryError> for AgentError {
    fn from(err: ToolRegistryError) -> Self {
        AgentError::Config(err.to_string())
    }
}
