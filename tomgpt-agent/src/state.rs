use tomgpt_core::ScratchpadStep;

use crate::AgentError;

/// Where the loop is within one turn.
///
/// `Thinking` asks the model; `ActionDispatch` runs the chosen tool once;
/// `Observing` records the step; `Done` and `Failed` end the turn.
#[derive(Debug)]
pub enum LoopState {
    Thinking,
    ActionDispatch {
        tool: String,
        input: String,
        thought: String,
        log: String,
    },
    Observing {
        tool: String,
        step: ScratchpadStep,
    },
    Done {
        answer: String,
    },
    Failed {
        error: AgentError,
    },
}

impl LoopState {
    pub fn name(&self) -> &'static str {
        match self {
            LoopState::Thinking => "thinking",
            LoopState::ActionDispatch { .. } => "action_dispatch",
            LoopState::Observing { .. } => "observing",
            LoopState::Done { .. } => "done",
            LoopState::Failed { .. } => "failed",
        }
    }
}
