use std::collections::HashMap;

use tomgpt_core::{Scratchpad, Transcript, Value};
use tomgpt_prompt::PromptTemplate;

use crate::{AgentError, ToolRegistry};

pub const REACT_TEMPLATE: &str = "Answer the following questions as best you can. You have access to the following tools:\n\
{{tools}}\n\
Use the following format:\n\
Question: the input question you must answer\n\
Thought: you should always think about what to do\n\
Action: the action to take, should be one of [{{tool_names}}]\n\
Action Input: the input to the action\n\
Observation: the result of the action\n\
... (this Thought/Action/Action Input/Observation can repeat N times)\n\
Thought: I now know the final answer\n\
Final Answer: the final answer to the original input question\n\
Begin!\n\
Question: {{input}}\n\
Thought:{{agent_scratchpad}}";

/// Stop sequence sent with every reasoning completion.
pub const OBSERVATION_STOP: &str = "\nObservation";

pub const ITERATION_LIMIT_ANSWER: &str = "Agent stopped due to iteration limit or time limit.";

const REQUIRED_VARIABLES: [&str; 4] = ["tools", "tool_names", "input", "agent_scratchpad"];

/// ReAct prompt with its variables bound from the registry, the question,
/// the scratchpad and, when referenced, the chat history.
#[derive(Clone, Debug)]
pub struct ReactPrompt {
    template: PromptTemplate,
}

impl ReactPrompt {
    pub fn new(template: PromptTemplate) -> Result<Self, AgentError> {
        if let Some(missing) = REQUIRED_VARIABLES
            .iter()
            .find(|variable| !template.uses(variable))
        {
            return Err(AgentError::Config(format!(
                "react prompt must reference '{{{{{missing}}}}}'"
            )));
        }
        Ok(Self { template })
    }

    pub fn default_template() -> Result<Self, AgentError> {
        let template = PromptTemplate::new(REACT_TEMPLATE)
            .map_err(|err| AgentError::Config(err.to_string()))?;
        Self::new(template)
    }

    pub fn uses_chat_history(&self) -> bool {
        self.template.uses("chat_history")
    }

    pub fn render(
        &self,
        registry: &ToolRegistry,
        question: &str,
        scratchpad: &Scratchpad,
        history: &Transcript,
    ) -> Result<String, AgentError> {
        let mut vars = HashMap::from([
            (
                "tools".to_string(),
                Value::String(registry.render_descriptions()),
            ),
            (
                "tool_names".to_string(),
                Value::String(registry.render_names()),
            ),
            ("input".to_string(), Value::String(question.to_string())),
            (
                "agent_scratchpad".to_string(),
                Value::String(scratchpad.render()),
            ),
        ]);
        if self.uses_chat_history() {
            vars.insert("chat_history".to_string(), Value::String(history.render()));
        }
        self.template
            .render(&vars)
            .map_err(|err| AgentError::Config(err.to_string()))
    }
}
