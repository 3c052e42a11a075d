//! Server-Sent Events decoding.
//!
//! A blank-line separated record becomes a [`ServerSentEvent`]; its `data`
//! is then turned into a JSON payload with
//! [`ServerSentEvent::json_payload`].

use crate::errors::{AnthropicError, AnthropicResult};
use crate::streaming::guard::StreamHandle;
use crate::streaming::splitter::{Framing, RecordStream};
use futures::Stream;
use pin_project_lite::pin_project;
use serde_json::Value;
use std::pin::Pin;
use std::task::{Context, Poll};

/// One parsed SSE record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerSentEvent {
    /// Trimmed value of the last `event:` line
    pub event: Option<String>,
    /// `data:` values joined with `\n`
    pub data: String,
    /// Value of the last `id:` line
    pub id: Option<String>,
    /// Reconnection delay from the last valid `retry:` line, in milliseconds
    pub retry: Option<u64>,
}

impl ServerSentEvent {
    /// Parse a delimiter-stripped record.
    pub fn parse(record: &str) -> Self {
        let mut event = ServerSentEvent::default();
        let mut data_lines: Vec<&str> = Vec::new();

        for line in Lines::new(record) {
            if line.is_empty() || line.starts_with(':') {
                continue;
            }

            let (field, value) = match line.find(':') {
                Some(colon) => (&line[..colon], &line[colon + 1..]),
                None => (line, ""),
            };

            match field {
                "event" => event.event = Some(value.trim().to_string()),
                "data" => data_lines.push(value.strip_prefix(' ').unwrap_or(value)),
                "id" => event.id = Some(value.trim().to_string()),
                "retry" => {
                    if let Ok(ms) = value.trim().parse::<u64>() {
                        event.retry = Some(ms);
                    }
                }
                _ => {}
            }
        }

        event.data = data_lines.join("\n");
        event
    }

    /// Returns true when the data buffer is empty or equals `sentinel`.
    pub fn is_noop(&self, sentinel: &str) -> bool {
        self.data.is_empty() || self.data == sentinel
    }

    /// Decode the data buffer as JSON.
    ///
    /// Returns `Ok(None)` for an empty buffer or the termination sentinel.
    /// When the payload is an object without a `type` field, the `event:`
    /// label is injected as `type`; a `type` already present wins.
    pub fn json_payload(&self, sentinel: &str) -> AnthropicResult<Option<Value>> {
        if self.is_noop(sentinel) {
            return Ok(None);
        }

        let mut value: Value = serde_json::from_str(&self.data)
            .map_err(|e| AnthropicError::decode(e, &self.data))?;

        if let (Some(label), Value::Object(map)) = (&self.event, &mut value) {
            if !map.contains_key("type") {
                map.insert("type".to_string(), Value::String(label.clone()));
            }
        }

        Ok(Some(value))
    }
}

/// Splits text on `\r\n`, `\n` or `\r`.
struct Lines<'a> {
    rest: Option<&'a str>,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self { rest: Some(text) }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let text = self.rest?;
        match text.find(|c: char| c == '\r' || c == '\n') {
            Some(pos) => {
                let skip = if text[pos..].starts_with("\r\n") { 2 } else { 1 };
                self.rest = Some(&text[pos + skip..]);
                Some(&text[..pos])
            }
            None => {
                self.rest = None;
                Some(text)
            }
        }
    }
}

pin_project! {
    /// Stream of [`ServerSentEvent`]s read from a byte source.
    pub struct SseDecoder {
        #[pin]
        records: RecordStream,
    }
}

impl SseDecoder {
    /// Create a decoder over a byte source
    pub fn new(source: StreamHandle) -> Self {
        Self {
            records: RecordStream::new(source, Framing::Sse),
        }
    }

    /// Fail once an unterminated record grows beyond `limit` bytes
    pub fn with_max_buffer_bytes(mut self, limit: Option<usize>) -> Self {
        self.records = self.records.with_max_buffer_bytes(limit);
        self
    }

    /// The lifetime guard owning the byte source
    pub fn handle(&self) -> &StreamHandle {
        self.records.handle()
    }

    /// Release the byte source; later polls yield `None`
    pub fn close(&mut self) {
        self.records.close();
    }
}

impl Stream for SseDecoder {
    type Item = AnthropicResult<ServerSentEvent>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project()
            .records
            .poll_next(cx)
            .map(|record| record.map(|r| r.map(|text| ServerSentEvent::parse(&text))))
    }
}
