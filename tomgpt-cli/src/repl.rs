use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tomgpt_agent::ChatSession;
use tomgpt_core::{Message, Role};

const PROMPT: &str = "you> ";

pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "you",
        Role::System | Role::Assistant => "tomgpt",
    }
}

pub fn render_message(message: &Message) -> String {
    format!("{}> {}", role_label(message.role), message.content)
}

fn history_file() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("tomgpt").join("history.txt"))
}

/// Interactive loop over one chat session. The transcript lives as long as
/// the process.
pub struct Repl {
    editor: DefaultEditor,
    session: ChatSession,
}

impl Repl {
    pub fn new(session: ChatSession) -> Result<Self, ReadlineError> {
        let mut editor = DefaultEditor::new()?;
        if let Some(path) = history_file().filter(|path| path.exists()) {
            if let Err(err) = editor.load_history(&path) {
                tracing::debug!(error = %err, "could not load history");
            }
        }
        Ok(Self { editor, session })
    }

    pub async fn run(&mut self) -> Result<(), ReadlineError> {
        println!("# Tom GPT");
        for message in self.session.transcript().iter() {
            println!("{}\n", render_message(message));
        }

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
                        break;
                    }
                    self.editor.add_history_entry(input)?;
                    self.turn(input).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Use 'exit' to quit");
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err),
            }
        }

        self.save_history();
        Ok(())
    }

    async fn turn(&mut self, input: &str) {
        if let Err(err) = self.session.send(input).await {
            tracing::debug!(error = ?err, "turn ended with an error");
        }
        if let Some(reply) = self.session.transcript().last() {
            println!("\n{}\n", render_message(reply));
        }
    }

    fn save_history(&mut self) {
        let Some(path) = history_file() else {
            return;
        };
        if let Some(parent) = path.parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                tracing::debug!(error = %err, "could not create history directory");
                return;
            }
        }
        if let Err(err) = self.editor.save_history(&path) {
            tracing::debug!(error = %err, "could not save history");
        }
    }
}
