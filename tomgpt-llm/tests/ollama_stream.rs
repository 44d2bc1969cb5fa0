#![cfg(feature = "ollama")]

use futures::StreamExt;
use httpmock::prelude::*;
use tomgpt_core::{Runnable, StreamEvent};
use tomgpt_llm::{LlmRequest, OllamaClient};

#[tokio::test]
async fn ollama_stream_flushes_trailing_line_without_newline() {
    let server = MockServer::start();
    let body = concat!(
        "{\"message\":{\"content\":\"Hel\"},\"done\":false}\n",
        "{\"message\":{\"content\":\"lo\"},\"done\":true}"
    );
    server.mock(|when, then| {
        when.method(POST).path("/api/chat");
        then.status(200)
            .header("content-type", "application/x-ndjson")
            .body(body);
    });

    let client = OllamaClient::new(server.url(""), "llama3.1".to_string()).expect("client");
    let events: Vec<_> = client
        .stream(LlmRequest::from_prompt("hi"))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<_, _>>()
        .expect("stream");

    assert_eq!(
        events,
        vec![
            StreamEvent::ContentChunk("Hel".to_string()),
            StreamEvent::ContentChunk("lo".to_string()),
            StreamEvent::FinalAnswer("Hello".to_string()),
        ]
    );
}

#[tokio::test]
async fn ollama_stream_stops_at_done_and_ignores_later_lines() {
    let server = MockServer::start();
    let body = concat!(
        "{\"message\":{\"content\":\"Final Answer: 4\"},\"done\":false}\n",
        "\n",
        "{\"message\":{\"content\":\"\"},\"done\":true}\n",
        "{\"message\":{\"content\":\"ignored\"},\"done\":false}\n"
    );
    server.mock(|when, then| {
        when.method(POST).path("/api/chat");
        then.status(200).body(body);
    });

    let client = OllamaClient::new(server.url(""), "llama3".to_string()).expect("client");
    let events: Vec<_> = client
        .stream(LlmRequest::from_prompt("2+2?"))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<_, _>>()
        .expect("stream");

    assert_eq!(
        events,
        vec![
            StreamEvent::ContentChunk("Final Answer: 4".to_string()),
            StreamEvent::FinalAnswer("Final Answer: 4".to_string()),
        ]
    );
}

#[tokio::test]
async fn ollama_stream_reports_malformed_line_and_ends() {
    let server = MockServer::start();
    let body = concat!(
        "{\"message\":{\"content\":\"hi\"},\"done\":false}\n",
        "{\"message\":{\"content\":\"hi\"}\n",
        "{\"message\":{\"content\":\"never\"},\"done\":true}\n"
    );
    server.mock(|when, then| {
        when.method(POST).path("/api/chat");
        then.status(200).body(body);
    });

    let client = OllamaClient::new(server.url(""), "llama3".to_string()).expect("client");
    let events = client
        .stream(LlmRequest::from_prompt("hi"))
        .collect::<Vec<_>>()
        .await;

    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0].as_ref().expect("first chunk"),
        &StreamEvent::ContentChunk("hi".to_string())
    );
    assert!(events[1].is_err());
}
