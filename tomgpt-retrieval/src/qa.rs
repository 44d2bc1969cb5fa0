use std::collections::HashMap;
use std::sync::Arc;

use tomgpt_core::{Document, LlmRequest, MetadataFilter, Runnable, Value};
use tomgpt_llm::Llm;
use tomgpt_prompt::PromptTemplate;
use tracing::Instrument;

use crate::{BaseRetriever, RetrievalError};

pub const STUFF_QA_TEMPLATE: &str = "Use the following pieces of context to answer the question at the end. If you don't know the answer, just say that you don't know, don't try to make up an answer.\n\n{{context}}\n\nQuestion: {{question}}\nHelpful Answer:";

pub const DEFAULT_TOP_K: usize = 4;

/// Answers a question from a handful of chunks by pasting all of them into a
/// single prompt.
#[derive(Clone)]
pub struct StuffQaChain {
    llm: Arc<dyn Llm>,
    prompt: PromptTemplate,
    separator: String,
}

impl StuffQaChain {
    pub fn new(llm: Arc<dyn Llm>) -> Result<Self, RetrievalError> {
        Ok(Self {
            llm,
            prompt: PromptTemplate::new(STUFF_QA_TEMPLATE)?,
            separator: "\n\n".to_string(),
        })
    }

    /// Replaces the prompt; it must reference `{{context}}` and `{{question}}`.
    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Result<Self, RetrievalError> {
        for variable in ["context", "question"] {
            if !prompt.uses(variable) {
                return Err(tomgpt_core::TomGptError::InvalidConfig(format!(
                    "qa prompt must reference '{{{{{variable}}}}}'"
                ))
                .into());
            }
        }
        self.prompt = prompt;
        Ok(self)
    }

    pub fn format_prompt(
        &self,
        question: &str,
        documents: &[Document],
    ) -> Result<String, RetrievalError> {
        let context = documents
            .iter()
            .map(|doc| doc.content.as_str())
            .collect::<Vec<_>>()
            .join(&self.separator);
        let vars = HashMap::from([
            ("context".to_string(), Value::String(context)),
            ("question".to_string(), Value::String(question.to_string())),
        ]);
        Ok(self.prompt.render(&vars)?)
    }

    pub async fn run(
        &self,
        question: &str,
        documents: &[Document],
    ) -> Result<String, RetrievalError> {
        let prompt = self.format_prompt(question, documents)?;
        let response = self.llm.invoke(LlmRequest::from_prompt(prompt)).await?;
        Ok(response.content.trim().to_string())
    }
}

/// Retrieval followed by a stuff chain: the whole document question-answering
/// path behind one call.
#[derive(Clone)]
pub struct RetrievalQa {
    retriever: Arc<dyn BaseRetriever>,
    chain: StuffQaChain,
    top_k: usize,
    filter: Option<MetadataFilter>,
}

impl RetrievalQa {
    pub fn new(retriever: Arc<dyn BaseRetriever>, chain: StuffQaChain) -> Self {
        Self {
            retriever,
            chain,
            top_k: DEFAULT_TOP_K,
            filter: None,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Restricts retrieval to chunks matching `filter`, typically one
    /// collection.
    pub fn with_filter(mut self, filter: MetadataFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub async fn ask(&self, question: &str) -> Result<String, RetrievalError> {
        let span = tracing::info_span!("retrieval_qa", top_k = self.top_k);
        async move {
            let results = self
                .retriever
                .retrieve(question, self.top_k, self.filter.as_ref())
                .await?;
            let documents: Vec<Document> = results.into_iter().map(|hit| hit.document).collect();
            tracing::debug!(chunks = documents.len(), "stuffing retrieved chunks");
            self.chain.run(question, &documents).await
        }
        .instrument(span)
        .await
    }
}
