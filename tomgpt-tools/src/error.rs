use thiserror::Error;
use tomgpt_core::{ToolError, TomGptError};

#[derive(Debug, Error)]
pub enum CalculatorError {
    #[error("empty expression")]
    Empty,
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar { ch: char, position: usize },
    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unknown name '{0}'")]
    UnknownName(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("expression nests deeper than {limit} levels")]
    TooDeep { limit: usize },
    #[error("result is not a finite number")]
    NonFinite,
    #[error("unknown format from LLM: {0}")]
    UnknownFormat(String),
    #[error(transparent)]
    Completion(#[from] TomGptError),
}

impl From<CalculatorError> for ToolError {
    fn from(err: CalculatorError) -> Self {
        ToolError::ExecutionFailed(err.to_string())
    }
}
