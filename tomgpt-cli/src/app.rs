use std::sync::Arc;

use thiserror::Error;
use tomgpt_agent::{AgentError, AgentExecutor, ChatSession, ToolRegistry};
use tomgpt_core::{CallbackManager, MetadataFilter, Tool, ToolError, TomGptError};
use tomgpt_embeddings::{CohereEmbedding, InputType};
use tomgpt_llm::{CohereClient, Llm, OllamaClient, DEFAULT_COHERE_MODEL};
use tomgpt_pinecone::{PineconeStoreError, PineconeVectorStore};
use tomgpt_retrieval::{RetrievalError, RetrievalQa, Retriever, StuffQaChain};
use tomgpt_tools::{CalculatorError, DocumentTool, DuckDuckGoSearch, LlmMathTool};

use crate::args::DEFAULT_OLLAMA_MODEL;
use crate::{Args, ConfigError, Provider, Secrets};

/// Metadata key the manual's chunks carry their collection under.
pub const COLLECTION_KEY: &str = "collection_id";

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("completion service: {0}")]
    Llm(#[from] TomGptError),
    #[error("pinecone: {0}")]
    Pinecone(#[from] PineconeStoreError),
    #[error("retrieval: {0}")]
    Retrieval(#[from] RetrievalError),
    #[error("tool setup: {0}")]
    Tool(#[from] ToolError),
    #[error("calculator setup: {0}")]
    Calculator(#[from] CalculatorError),
    #[error(transparent)]
    Agent(#[from] AgentError),
}

pub fn build_llm(args: &Args, secrets: &Secrets) -> Result<Arc<dyn Llm>, AppError> {
    let llm: Arc<dyn Llm> = match args.provider {
        Provider::Cohere => {
            let model = args
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_COHERE_MODEL.to_string());
            Arc::new(CohereClient::new(secrets.cohere_api_key()?, model)?)
        }
        Provider::Ollama => {
            let model = args
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string());
            Arc::new(OllamaClient::new(args.ollama_url.clone(), model)?)
        }
    };
    Ok(llm)
}

/// The variant's tools in prompt order: Search, Calculator, then Document
/// for the retrieval variant.
pub async fn build_tools(
    args: &Args,
    secrets: &Secrets,
    llm: Arc<dyn Llm>,
) -> Result<Vec<Arc<dyn Tool>>, AppError> {
    let mut tools: Vec<Arc<dyn Tool>> = vec![
        Arc::new(DuckDuckGoSearch::new()?),
        Arc::new(LlmMathTool::new(llm.clone())?),
    ];
    if args.variant.needs_retrieval() {
        tools.push(Arc::new(build_document_tool(args, secrets, llm).await?));
    }
    Ok(tools)
}

async fn build_document_tool(
    args: &Args,
    secrets: &Secrets,
    llm: Arc<dyn Llm>,
) -> Result<DocumentTool, AppError> {
    let embedder =
        CohereEmbedding::new(secrets.cohere_api_key()?).with_input_type(InputType::SearchQuery);
    let builder =
        PineconeVectorStore::builder(embedder.clone()).api_key(secrets.pinecone_api_key()?);
    let builder = match &args.pinecone_host {
        Some(host) => builder.base_url(host),
        None => builder.index_name(&args.pinecone_index),
    };
    let store = builder.verify_dimension(true).build().await?;
    tracing::info!(host = store.host(), "connected to pinecone index");

    let chain = StuffQaChain::new(llm)?;
    let mut qa = RetrievalQa::new(Arc::new(Retriever::new(embedder, store)), chain);
    let filter = MetadataFilter::collections(COLLECTION_KEY, args.collection.iter().cloned());
    if let Some(filter) = filter {
        qa = qa.with_filter(filter);
    }
    Ok(DocumentTool::new(qa))
}

pub async fn build_session(
    args: &Args,
    secrets: &Secrets,
    callbacks: CallbackManager,
) -> Result<ChatSession, AppError> {
    let llm = build_llm(args, secrets)?;
    let tools = build_tools(args, secrets, llm.clone()).await?;
    let registry = ToolRegistry::builder()
        .register_all(tools)
        .build()
        .map_err(AgentError::from)?;
    let executor = AgentExecutor::builder()
        .llm(llm)
        .registry(registry)
        .max_iterations(args.max_iterations)
        .streaming(!args.no_stream)
        .build()?;
    Ok(ChatSession::new(Arc::new(executor), args.variant.greeting()).with_callbacks(callbacks))
}
