use serde::{Deserialize, Serialize};

/// Display-side record of what the reasoning loop is doing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum AgentEvent {
    Thought {
        content: String,
        step: usize,
    },
    ToolCall {
        tool_name: String,
        input: String,
        step: usize,
    },
    Observation {
        tool_name: String,
        output: String,
        step: usize,
    },
    Final {
        content: String,
        step: usize,
    },
    Error {
        message: String,
        step: usize,
        recoverable: bool,
    },
}

impl AgentEvent {
    pub fn step(&self) -> usize {
        match self {
            Self::Thought { step, .. }
            | Self::ToolCall { step, .. }
            | Self::Observation { step, .. }
            | Self::Final { step, .. }
            | Self::Error { step, .. } => *step,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Final { .. }
                | Self::Error {
                    recoverable: false,
                    ..
                }
        )
    }
}
