use std::sync::Arc;

use async_trait::async_trait;
use tomgpt_core::{Tool, ToolError};
use tomgpt_retrieval::RetrievalQa;

pub const DOCUMENT_NAME: &str = "Document";
pub const DOCUMENT_DESCRIPTION: &str =
    "useful for when you need to answer questions about 弓道, きゅうどう or Kyudo";

/// The `Document` tool: answers from the Kyudo manual through a retrieval QA
/// chain.
#[derive(Clone)]
pub struct DocumentTool {
    qa: Arc<RetrievalQa>,
}

impl DocumentTool {
    pub fn new(qa: RetrievalQa) -> Self {
        Self { qa: Arc::new(qa) }
    }
}

#[async_trait]
impl Tool for DocumentTool {
    fn name(&self) -> &str {
        DOCUMENT_NAME
    }

    fn description(&self) -> &str {
        DOCUMENT_DESCRIPTION
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        self.qa
            .ask(input.trim())
            .await
            .map_err(|err| ToolError::ExecutionFailed(err.to_string()))
    }
}
