use std::sync::OnceLock;

use regex::Regex;

use crate::AgentError;

const FINAL_ANSWER_MARKER: &str = "Final Answer:";
const ACTION_PATTERN: &str =
    r"(?s)Action\s*\d*\s*:[\s]*(.*?)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)";
const ACTION_ONLY_PATTERN: &str = r"(?s)Action\s*\d*\s*:[\s]*(.*?)";
const ACTION_INPUT_ONLY_PATTERN: &str = r"(?s)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)";

pub(crate) const MISSING_ACTION: &str = "Invalid Format: Missing 'Action:' after 'Thought:'";
pub(crate) const MISSING_ACTION_INPUT: &str =
    "Invalid Format: Missing 'Action Input:' after 'Action:'";

/// What one completion asks the loop to do next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AgentDecision {
    Finish {
        answer: String,
        thought: String,
        log: String,
    },
    Act {
        tool: String,
        input: String,
        thought: String,
        log: String,
    },
}

impl AgentDecision {
    pub fn thought(&self) -> &str {
        match self {
            AgentDecision::Finish { thought, .. } | AgentDecision::Act { thought, .. } => thought,
        }
    }
}

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("valid regex"))
}

fn action_regex() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    regex(&CELL, ACTION_PATTERN)
}

fn action_only_regex() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    regex(&CELL, ACTION_ONLY_PATTERN)
}

fn action_input_only_regex() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    regex(&CELL, ACTION_INPUT_ONLY_PATTERN)
}

/// Parses a ReAct continuation (the text generated after `Thought:`).
///
/// An `Action:`/`Action Input:` pair wins over a `Final Answer:` only when the
/// answer is absent; having both is ambiguous and rejected.
pub fn parse_react_output(text: &str) -> Result<AgentDecision, AgentError> {
    let includes_answer = text.contains(FINAL_ANSWER_MARKER);

    if let Some(caps) = action_regex().captures(text) {
        if includes_answer {
            return Err(AgentError::Parse {
                reason: "Parsing LLM output produced both a final answer and a parse-able action"
                    .to_string(),
                output: text.to_string(),
            });
        }
        let start = caps.get(0).map_or(0, |m| m.start());
        let tool = caps[1].trim().to_string();
        let input = caps[2].trim().trim_matches(' ').trim_matches('"').to_string();
        return Ok(AgentDecision::Act {
            tool,
            input,
            thought: text[..start].trim().to_string(),
            log: text.to_string(),
        });
    }

    if includes_answer {
        let (before, answer) = text
            .rsplit_once(FINAL_ANSWER_MARKER)
            .unwrap_or(("", text));
        return Ok(AgentDecision::Finish {
            answer: answer.trim().to_string(),
            thought: before.trim().to_string(),
            log: text.to_string(),
        });
    }

    let reason = if !action_only_regex().is_match(text) {
        MISSING_ACTION.to_string()
    } else if !action_input_only_regex().is_match(text) {
        MISSING_ACTION_INPUT.to_string()
    } else {
        format!("Could not parse LLM output: `{}`", text.trim())
    };
    Err(AgentError::Parse {
        reason,
        output: text.to_string(),
    })
}
