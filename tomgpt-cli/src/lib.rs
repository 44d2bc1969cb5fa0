//! Pieces of the `tomgpt` binary that are worth testing on their own:
//! argument parsing, secrets, variants and the terminal display.

pub mod app;
pub mod args;
pub mod config;
pub mod display;
pub mod repl;
pub mod variant;

pub use app::{build_llm, build_session, build_tools};
pub use args::{Args, Provider};
pub use config::{ConfigError, Secrets, DEFAULT_SECRETS_PATHS};
pub use display::TerminalDisplay;
pub use variant::Variant;
