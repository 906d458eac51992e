//! Server-Sent Events (SSE) decoding for streamed model answers.
//!
//! `SseDecoder` is a line-fed state machine; `read_sse_events` drives it
//! from a reqwest byte stream.

use futures_util::StreamExt;
use tokio::io::AsyncBufReadExt;
use tokio_util::io::StreamReader;

use crate::AiError;

/// A single SSE event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: Option<String>,
    /// Data lines joined with `\n`.
    pub data: String,
}

/// Accumulates `event:`/`data:` fields until a blank line ends the event.
#[derive(Debug, Default)]
pub struct SseDecoder {
    event: Option<String>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line (without its terminator). Returns a completed event
    /// when `line` is the blank separator.
    pub fn push_line(&mut self, line: &str) -> Option<SseEvent> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            return self.take();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((f, v)) => (f, v.strip_prefix(' ').unwrap_or(v)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            // id:, retry: and unknown fields carry nothing we use
            _ => {}
        }
        None
    }

    /// Flush a trailing event not followed by a blank line.
    pub fn finish(&mut self) -> Option<SseEvent> {
        self.take()
    }

    fn take(&mut self) -> Option<SseEvent> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        Some(SseEvent {
            event,
            data: std::mem::take(&mut self.data).join("\n"),
        })
    }
}

/// Read an SSE response body to the end, calling `on_event` per event.
pub async fn read_sse_events(
    response: reqwest::Response,
    mut on_event: impl FnMut(SseEvent),
) -> Result<(), AiError> {
    let byte_stream = response
        .bytes_stream()
        .map(|result| result.map_err(std::io::Error::other));
    let mut lines = tokio::io::BufReader::new(StreamReader::new(byte_stream)).lines();
    let mut decoder = SseDecoder::new();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| AiError::NetworkError(e.to_string()))?
    {
        if let Some(event) = decoder.push_line(&line) {
            on_event(event);
        }
    }
    if let Some(event) = decoder.finish() {
        on_event(event);
    }
    Ok(())
}
