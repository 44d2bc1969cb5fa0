use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use tomgpt_core::{AgentEvent, CallbackHandler};

const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Prints a running turn: streamed tokens as they arrive, loop events as
/// dimmed step lines.
pub struct TerminalDisplay {
    out: Mutex<Box<dyn Write + Send>>,
    color: bool,
}

impl TerminalDisplay {
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()), true)
    }

    pub fn new(out: Box<dyn Write + Send>, color: bool) -> Self {
        Self {
            out: Mutex::new(out),
            color,
        }
    }

    fn write(&self, text: &str) {
        if let Ok(mut out) = self.out.lock() {
            // a closed terminal is not worth failing the turn over
            let _ = out.write_all(text.as_bytes());
            let _ = out.flush();
        }
    }

    fn dimmed(&self, line: &str) -> String {
        if self.color {
            format!("{DIM}{line}{RESET}\n")
        } else {
            format!("{line}\n")
        }
    }
}

/// One status line per loop event; `None` for the final answer, which the
/// REPL prints itself.
pub fn format_event(event: &AgentEvent) -> Option<String> {
    match event {
        AgentEvent::Thought { content, step } => Some(format!("[{step}] Thought: {content}")),
        AgentEvent::ToolCall {
            tool_name,
            input,
            step,
        } => Some(format!("[{step}] Action: {tool_name}({input})")),
        AgentEvent::Observation {
            tool_name,
            output,
            step,
        } => Some(format!("[{step}] Observation from {tool_name}: {output}")),
        AgentEvent::Error { message, step, .. } => Some(format!("[{step}] Error: {message}")),
        AgentEvent::Final { .. } => None,
    }
}

#[async_trait]
impl CallbackHandler for TerminalDisplay {
    async fn on_llm_token(&self, token: &str) {
        if self.color {
            self.write(&format!("{DIM}{token}{RESET}"));
        } else {
            self.write(token);
        }
    }

    async fn on_agent_event(&self, event: &AgentEvent) {
        if let Some(line) = format_event(event) {
            self.write("\n");
            self.write(&self.dimmed(&line));
        }
    }
}
