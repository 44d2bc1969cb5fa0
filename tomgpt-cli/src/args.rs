use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tomgpt_agent::DEFAULT_MAX_ITERATIONS;
use tomgpt_llm::OLLAMA_BASE_URL;

use crate::Variant;

pub const DEFAULT_PINECONE_INDEX: &str = "tom-gpt-doc";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    #[default]
    Cohere,
    Ollama,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "tomgpt")]
#[command(version, about = "Tom GPT - a ReAct chat agent with web search, a calculator and Kyudo manual lookup", long_about = None)]
pub struct Args {
    /// Front-end variant to run
    #[arg(long, value_enum, default_value_t = Variant::Base, env = "TOMGPT_VARIANT")]
    pub variant: Variant,

    /// Secrets file (defaults to .streamlit/secrets.toml, then secrets.toml)
    #[arg(long, env = "TOMGPT_SECRETS")]
    pub secrets: Option<PathBuf>,

    /// Completion service
    #[arg(long, value_enum, default_value_t = Provider::Cohere, env = "TOMGPT_PROVIDER")]
    pub provider: Provider,

    /// Model name (provider default when omitted)
    #[arg(short, long, env = "TOMGPT_MODEL")]
    pub model: Option<String>,

    /// Upper bound on completions per turn
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_iterations: usize,

    /// Ollama server URL
    #[arg(long, default_value = OLLAMA_BASE_URL, env = "OLLAMA_URL")]
    pub ollama_url: String,

    /// Pinecone index holding the Kyudo manual (rag variant)
    #[arg(long, default_value = DEFAULT_PINECONE_INDEX, env = "PINECONE_INDEX")]
    pub pinecone_index: String,

    /// Pinecone index host; skips resolving the index name
    #[arg(long, env = "PINECONE_INDEX_HOST")]
    pub pinecone_host: Option<String>,

    /// Restrict document lookup to these collections (repeatable)
    #[arg(long)]
    pub collection: Vec<String>,

    /// Wait for whole completions instead of streaming tokens
    #[arg(long)]
    pub no_stream: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "warn,tomgpt=debug"
        } else {
            "warn"
        }
    }
}
