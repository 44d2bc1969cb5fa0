#![cfg(feature = "ollama")]

use httpmock::prelude::*;
use serde_json::json;
use tomgpt_core::Runnable;
use tomgpt_llm::{LlmRequest, Message, OllamaClient};

#[tokio::test]
async fn ollama_invoke_maps_response() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/chat").json_body(json!({
            "model": "llama3.1",
            "messages": [{"role": "user", "content": "hi"}],
            "stream": false,
            "options": {"stop": ["\nObservation"]}
        }));
        then.status(200).json_body(json!({
            "message": {"role": "assistant", "content": "hello"},
            "done": true,
            "done_reason": "stop"
        }));
    });

    let client = OllamaClient::new(server.url(""), "llama3.1".to_string()).expect("client");
    let request = LlmRequest {
        model: String::new(),
        messages: vec![Message::user("hi")],
        stop: vec!["\nObservation".to_string()],
        temperature: None,
    };

    let response = client.invoke(request).await.expect("invoke");
    assert_eq!(response.content, "hello");
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    mock.assert();
}

#[tokio::test]
async fn ollama_invoke_reports_http_errors() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/chat");
        then.status(500).body("boom");
    });

    let client = OllamaClient::new(server.url(""), "llama3.1".to_string()).expect("client");
    let result = client.invoke(LlmRequest::from_prompt("hi")).await;
    assert!(result.is_err());
}
