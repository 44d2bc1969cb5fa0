mod common;

use std::sync::Arc;

use common::{registry, EventRecorder, RecordingTool, ScriptedLlm};
use tomgpt_agent::{AgentError, AgentExecutor, ParseErrorPolicy, ToolFailurePolicy};
use tomgpt_core::{AgentEvent, CallbackHandler, CallbackManager, Transcript};

fn manager(recorder: &Arc<EventRecorder>) -> CallbackManager {
    CallbackManager::new(vec![recorder.clone() as Arc<dyn CallbackHandler>])
}

#[tokio::test]
async fn events_follow_think_act_observe_order() {
    let llm = ScriptedLlm::new(&[
        " I should calculate.\nAction: Calculator\nAction Input: 2+2",
        " I now know the final answer\nFinal Answer: 4",
    ]);
    let calc = RecordingTool::ok("Calculator", "math", "Answer: 4");
    let agent = AgentExecutor::builder()
        .llm(llm)
        .registry(registry(vec![calc]))
        .build()
        .unwrap();
    let recorder = Arc::new(EventRecorder::default());

    agent
        .run("What is 2+2?", &Transcript::new(), &manager(&recorder))
        .await
        .unwrap();

    assert_eq!(
        recorder.kinds(),
        vec!["thought", "tool_call", "observation", "thought", "final"]
    );
    let events = recorder.events.lock().unwrap();
    assert_eq!(
        events[0],
        AgentEvent::Thought {
            content: "I should calculate.".to_string(),
            step: 1
        }
    );
    assert_eq!(
        events[1],
        AgentEvent::ToolCall {
            tool_name: "Calculator".to_string(),
            input: "2+2".to_string(),
            step: 1
        }
    );
    assert_eq!(
        events[2],
        AgentEvent::Observation {
            tool_name: "Calculator".to_string(),
            output: "Answer: 4".to_string(),
            step: 1
        }
    );
    assert_eq!(
        events[4],
        AgentEvent::Final {
            content: "4".to_string(),
            step: 2
        }
    );
}

#[tokio::test]
async fn streaming_forwards_tokens_and_non_streaming_uses_invoke() {
    let streaming_llm = ScriptedLlm::new(&["Final Answer: streamed"]);
    let tool = RecordingTool::ok("Search", "web", "");
    let agent = AgentExecutor::builder()
        .llm(streaming_llm.clone())
        .registry(registry(vec![tool.clone()]))
        .build()
        .unwrap();
    let recorder = Arc::new(EventRecorder::default());
    agent
        .run("q", &Transcript::new(), &manager(&recorder))
        .await
        .unwrap();
    assert_eq!(
        recorder.tokens.lock().unwrap().concat(),
        "Final Answer: streamed"
    );
    assert_eq!(*streaming_llm.stream_calls.lock().unwrap(), 1);
    assert_eq!(*streaming_llm.invoke_calls.lock().unwrap(), 0);

    let blocking_llm = ScriptedLlm::new(&["Final Answer: blocking"]);
    let agent = AgentExecutor::builder()
        .llm(blocking_llm.clone())
        .registry(registry(vec![tool]))
        .streaming(false)
        .build()
        .unwrap();
    let recorder = Arc::new(EventRecorder::default());
    let result = agent
        .run("q", &Transcript::new(), &manager(&recorder))
        .await
        .unwrap();
    assert_eq!(result.final_answer, "blocking");
    assert!(recorder.tokens.lock().unwrap().is_empty());
    assert_eq!(*blocking_llm.invoke_calls.lock().unwrap(), 1);
    assert_eq!(*blocking_llm.stream_calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn parse_errors_are_reported_as_recoverable_events() {
    let llm = ScriptedLlm::new(&["gibberish", "Final Answer: ok"]);
    let agent = AgentExecutor::builder()
        .llm(llm)
        .registry(registry(vec![RecordingTool::ok("Search", "web", "")]))
        .build()
        .unwrap();
    let recorder = Arc::new(EventRecorder::default());

    agent
        .run("q", &Transcript::new(), &manager(&recorder))
        .await
        .unwrap();

    let events = recorder.events.lock().unwrap();
    assert!(matches!(
        events[0],
        AgentEvent::Error { recoverable: true, step: 1, .. }
    ));
    assert!(matches!(
        events[1],
        AgentEvent::Observation { ref tool_name, .. } if tool_name == "_Exception"
    ));
}

#[tokio::test]
async fn fail_fast_parse_policy_ends_the_turn() {
    let llm = ScriptedLlm::new(&["gibberish", "Final Answer: never reached"]);
    let agent = AgentExecutor::builder()
        .llm(llm.clone())
        .registry(registry(vec![RecordingTool::ok("Search", "web", "")]))
        .parse_error_policy(ParseErrorPolicy::FailFast)
        .build()
        .unwrap();
    let recorder = Arc::new(EventRecorder::default());

    let err = agent
        .run("q", &Transcript::new(), &manager(&recorder))
        .await
        .unwrap_err();

    assert!(matches!(err, AgentError::Parse { ref output, .. } if output == "gibberish"));
    assert_eq!(llm.prompt_count(), 1);
    assert!(recorder
        .events
        .lock()
        .unwrap()
        .last()
        .map_or(false, AgentEvent::is_terminal));
}

#[tokio::test]
async fn fail_fast_tool_policy_surfaces_tool_error() {
    let llm = ScriptedLlm::new(&["Action: Search\nAction Input: x", "Final Answer: unused"]);
    let search = RecordingTool::failing("Search", "timeout");
    let agent = AgentExecutor::builder()
        .llm(llm.clone())
        .registry(registry(vec![search.clone()]))
        .tool_failure_policy(ToolFailurePolicy::FailFast)
        .build()
        .unwrap();

    let err = agent
        .run("q", &Transcript::new(), &CallbackManager::noop())
        .await
        .unwrap_err();

    match err {
        AgentError::ToolExecution { tool, message } => {
            assert_eq!(tool, "Search");
            assert!(message.contains("timeout"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(search.calls().len(), 1);
    assert_eq!(llm.prompt_count(), 1);
}

#[tokio::test]
async fn iteration_limit_emits_error_then_final() {
    let llm = ScriptedLlm::repeating("Action: Search\nAction Input: again");
    let agent = AgentExecutor::builder()
        .llm(llm)
        .registry(registry(vec![RecordingTool::ok("Search", "web", "same")]))
        .max_iterations(1)
        .build()
        .unwrap();
    let recorder = Arc::new(EventRecorder::default());

    agent
        .run("q", &Transcript::new(), &manager(&recorder))
        .await
        .unwrap();

    let kinds = recorder.kinds();
    assert_eq!(&kinds[kinds.len() - 2..], &["error", "final"]);
}

#[tokio::test]
async fn unknown_tool_is_reported_as_recoverable_error() {
    let llm = ScriptedLlm::new(&[
        " I'll look it up.\nAction: Wikipedia\nAction Input: kyudo",
        " I now know the final answer\nFinal Answer: done",
    ]);
    let search = RecordingTool::ok("Search", "web", "");
    let agent = AgentExecutor::builder()
        .llm(llm)
        .registry(registry(vec![search]))
        .build()
        .unwrap();
    let recorder = Arc::new(EventRecorder::default());

    agent
        .run("q", &Transcript::new(), &manager(&recorder))
        .await
        .unwrap();

    assert_eq!(
        recorder.kinds(),
        vec!["thought", "tool_call", "error", "observation", "thought", "final"]
    );
    let events = recorder.events.lock().unwrap();
    assert_eq!(
        events[2],
        AgentEvent::Error {
            message: "Wikipedia is not a valid tool, try one of [Search].".to_string(),
            step: 1,
            recoverable: true,
        }
    );
}
