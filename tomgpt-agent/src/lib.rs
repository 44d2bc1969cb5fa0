//! The ReAct reasoning loop: prompt, parse, dispatch one tool, observe,
//! repeat until a final answer or the iteration cap.

mod error;
mod executor;
mod parser;
mod policy;
mod prompt;
mod registry;
mod session;
mod state;

pub use error::{AgentError, ToolRegistryError};
pub use executor::{AgentExecutor, AgentExecutorBuilder, TurnResult, DEFAULT_MAX_ITERATIONS};
pub use parser::{parse_react_output, AgentDecision};
pub use policy::{ParseErrorPolicy, ToolFailurePolicy};
pub use prompt::{ReactPrompt, ITERATION_LIMIT_ANSWER, OBSERVATION_STOP, REACT_TEMPLATE};
pub use registry::{ToolRegistry, ToolRegistryBuilder};
pub use session::ChatSession;
pub use state::LoopState;
