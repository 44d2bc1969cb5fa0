use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::TomGptError;

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    ContentChunk(String),
    /// Terminal event carrying the full accumulated text.
    FinalAnswer(String),
    Metadata { key: String, value: crate::Value },
}

#[async_trait]
pub trait Runnable<Input: Send + 'static, Output: Send + 'static> {
    async fn invoke(&self, input: Input) -> Result<Output, TomGptError>;

    fn stream(&self, input: Input) -> BoxStream<'_, Result<StreamEvent, TomGptError>>;
}
