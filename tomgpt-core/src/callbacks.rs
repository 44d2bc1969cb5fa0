use std::sync::Arc;

use async_trait::async_trait;

use crate::AgentEvent;

/// Hook for incremental display of a running turn.
#[async_trait]
pub trait CallbackHandler: Send + Sync {
    async fn on_llm_token(&self, _token: &str) {}
    async fn on_agent_event(&self, _event: &AgentEvent) {}
}

#[derive(Clone, Default)]
pub struct CallbackManager {
    handlers: Vec<Arc<dyn CallbackHandler>>,
}

impl std::fmt::Debug for CallbackManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackManager")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl CallbackManager {
    pub fn new(handlers: Vec<Arc<dyn CallbackHandler>>) -> Self {
        Self { handlers }
    }

    pub fn noop() -> Self {
        Self { handlers: vec![] }
    }

    pub fn is_noop(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn add_handler(&mut self, handler: Arc<dyn CallbackHandler>) {
        self.handlers.push(handler);
    }

    pub async fn on_llm_token(&self, token: &str) {
        for handler in &self.handlers {
            handler.on_llm_token(token).await;
        }
    }

    pub async fn on_agent_event(&self, event: &AgentEvent) {
        for handler in &self.handlers {
            handler.on_agent_event(event).await;
        }
    }
}
