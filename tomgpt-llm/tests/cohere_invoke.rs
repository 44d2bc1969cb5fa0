#![cfg(feature = "cohere")]

use httpmock::prelude::*;
use serde_json::json;
use tomgpt_core::{Runnable, TomGptError};
use tomgpt_llm::{CohereClient, LlmRequest, Message};

#[tokio::test]
async fn cohere_invoke_maps_request_and_response() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat")
            .header("authorization", "Bearer test-key")
            .json_body(json!({
                "model": "command-r",
                "message": "what is kyudo?",
                "chat_history": [
                    {"role": "USER", "message": "hi"},
                    {"role": "CHATBOT", "message": "hello"}
                ],
                "preamble": "You are TomGPT.",
                "stop_sequences": ["\nObservation"],
                "stream": false
            }));
        then.status(200).json_body(json!({
            "text": "Thought: I should look it up",
            "finish_reason": "COMPLETE"
        }));
    });

    let client = CohereClient::new("test-key", "command-r")
        .expect("client")
        .with_base_url(server.url(""));
    let request = LlmRequest {
        model: String::new(),
        messages: vec![
            Message::system("You are TomGPT."),
            Message::user("hi"),
            Message::assistant("hello"),
            Message::user("what is kyudo?"),
        ],
        stop: vec!["\nObservation".to_string()],
        temperature: None,
    };

    let response = client.invoke(request).await.expect("invoke");
    assert_eq!(response.content, "Thought: I should look it up");
    assert_eq!(response.finish_reason.as_deref(), Some("COMPLETE"));
    mock.assert();
}

#[tokio::test]
async fn cohere_invoke_surfaces_provider_error_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat");
        then.status(401)
            .json_body(json!({"message": "invalid api token"}));
    });

    let client = CohereClient::new("bad-key", "command-r")
        .expect("client")
        .with_base_url(server.url(""));
    let err = client
        .invoke(LlmRequest::from_prompt("hi"))
        .await
        .expect_err("should fail");

    match err {
        TomGptError::LlmProvider(message) => assert_eq!(message, "invalid api token"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn cohere_invoke_rejects_error_finish_reason() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat");
        then.status(200)
            .json_body(json!({"text": "", "finish_reason": "ERROR_TOXIC"}));
    });

    let client = CohereClient::new("test-key", "command-r")
        .expect("client")
        .with_base_url(server.url(""));
    let err = client
        .invoke(LlmRequest::from_prompt("hi"))
        .await
        .expect_err("should fail");
    assert!(err.to_string().contains("ERROR_TOXIC"));
}

#[test]
fn cohere_client_requires_api_key() {
    let err = CohereClient::new("  ", "command-r").err().expect("error");
    assert!(matches!(err, TomGptError::InvalidConfig(_)));
}
