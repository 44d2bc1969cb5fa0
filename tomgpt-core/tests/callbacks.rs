use std::sync::{Arc, Mutex};

use tomgpt_core::{AgentEvent, CallbackHandler, CallbackManager};

#[derive(Default)]
struct Recorder {
    tokens: Mutex<Vec<String>>,
    events: Mutex<Vec<AgentEvent>>,
}

#[async_trait::async_trait]
impl CallbackHandler for Recorder {
    async fn on_llm_token(&self, token: &str) {
        self.tokens.lock().unwrap().push(token.to_string());
    }

    async fn on_agent_event(&self, event: &AgentEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

#[tokio::test]
async fn manager_fans_out_to_every_handler() {
    let first = Arc::new(Recorder::default());
    let second = Arc::new(Recorder::default());
    let manager = CallbackManager::new(vec![first.clone(), second.clone()]);

    manager.on_llm_token("Hel").await;
    manager
        .on_agent_event(&AgentEvent::Final {
            content: "done".to_string(),
            step: 1,
        })
        .await;

    for recorder in [&first, &second] {
        assert_eq!(*recorder.tokens.lock().unwrap(), vec!["Hel".to_string()]);
        assert_eq!(recorder.events.lock().unwrap().len(), 1);
    }
}

#[test]
fn noop_manager_reports_noop() {
    assert!(CallbackManager::noop().is_noop());
}

#[test]
fn agent_event_serializes_with_type_tag() {
    let event = AgentEvent::ToolCall {
        tool_name: "Search".to_string(),
        input: "weather".to_string(),
        step: 2,
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "ToolCall");
    assert_eq!(json["data"]["step"], 2);
    assert_eq!(event.step(), 2);
    assert!(!event.is_terminal());
}
