use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::BytesMut;
use futures::{
    future,
    stream::{self, BoxStream, StreamExt},
};
use serde::de::DeserializeOwned;
use tomgpt_core::{StreamEvent, TomGptError};

pub(crate) type EventResult = Result<StreamEvent, TomGptError>;

/// Events decoded from one NDJSON line and whether the provider signalled
/// the end of the generation.
pub(crate) struct LineOutcome {
    pub events: Vec<EventResult>,
    pub done: bool,
}

/// Splits a newline-delimited JSON body into decoded items.
///
/// A trailing line without a newline is still decoded once the body ends.
/// Decoding stops at the first malformed line or at the first item the
/// mapper marks as `done`.
pub(crate) fn parse_ndjson_response<T, F>(
    response: reqwest::Response,
    mut on_item: F,
) -> BoxStream<'static, EventResult>
where
    T: DeserializeOwned,
    F: FnMut(T) -> LineOutcome + Send + 'static,
{
    let mut buffer = BytesMut::new();
    let terminated = Arc::new(AtomicBool::new(false));
    let terminated_for_take = terminated.clone();

    response
        .bytes_stream()
        .map(Some)
        .chain(stream::once(async { None }))
        .take_while(move |_| future::ready(!terminated_for_take.load(Ordering::SeqCst)))
        .flat_map(move |chunk| {
            let mut events = Vec::new();
            match chunk {
                Some(Ok(bytes)) => buffer.extend_from_slice(&bytes),
                Some(Err(err)) => {
                    terminated.store(true, Ordering::SeqCst);
                    return stream::iter(vec![Err(TomGptError::LlmProvider(err.to_string()))]);
                }
                None => {
                    if !buffer.is_empty() && !buffer.ends_with(b"\n") {
                        buffer.extend_from_slice(b"\n");
                    }
                }
            }

            while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                let line = buffer.split_to(pos + 1);
                let line = String::from_utf8_lossy(&line);
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match serde_json::from_str::<T>(line) {
                    Ok(item) => {
                        let outcome = on_item(item);
                        events.extend(outcome.events);
                        if outcome.done {
                            terminated.store(true, Ordering::SeqCst);
                            break;
                        }
                    }
                    Err(err) => {
                        terminated.store(true, Ordering::SeqCst);
                        events.push(Err(TomGptError::ParseFailed {
                            output: line.to_string(),
                            reason: err.to_string(),
                        }));
                        break;
                    }
                }
            }

            stream::iter(events)
        })
        .boxed()
}
