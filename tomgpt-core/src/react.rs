use serde::{Deserialize, Serialize};

/// One think/act/observe round of a reasoning loop.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScratchpadStep {
    /// Completion text exactly as produced for this step.
    pub log: String,
    pub thought: String,
    pub action: String,
    pub action_input: String,
    pub observation: String,
}

/// Steps accumulated during a single user turn.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scratchpad {
    steps: Vec<ScratchpadStep>,
}

impl Scratchpad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: ScratchpadStep) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[ScratchpadStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Renders the steps so they continue a prompt ending in `Thought:`.
    ///
    /// Each step contributes its raw log followed by its observation and a
    /// fresh `Thought: ` cue, so the model always resumes mid-format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            out.push_str(&step.log);
            out.push_str("\nObservation: ");
            out.push_str(&step.observation);
            out.push_str("\nThought: ");
        }
        out
    }
}
