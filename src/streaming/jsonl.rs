//! Line-delimited JSON decoding.
//!
//! Each line is an independent JSON document. A caller-supplied decode
//! function may turn the raw value into a typed record; when there is no
//! function, or it declines the value, the raw value is returned unchanged.

use crate::errors::{AnthropicError, AnthropicResult};
use crate::observability::log_decode_error;
use crate::streaming::guard::StreamHandle;
use crate::streaming::splitter::{Framing, RecordStream};
use crate::transport::ByteStream;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use pin_project_lite::pin_project;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Maps a decoded JSON value to a typed record, or declines with `None`.
pub type DecodeFn<T> = Box<dyn Fn(&Value) -> Option<T> + Send + Sync>;

/// One decoded JSONL line.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonlRecord<T> {
    /// The decode function accepted the value
    Typed(T),
    /// No decode function, or it declined; the value as parsed
    Raw(Value),
}

impl<T> JsonlRecord<T> {
    /// The typed record, if any
    pub fn typed(self) -> Option<T> {
        match self {
            JsonlRecord::Typed(t) => Some(t),
            JsonlRecord::Raw(_) => None,
        }
    }

    /// Borrow the typed record, if any
    pub fn as_typed(&self) -> Option<&T> {
        match self {
            JsonlRecord::Typed(t) => Some(t),
            JsonlRecord::Raw(_) => None,
        }
    }

    /// Returns true when the record degraded to its raw value
    pub fn is_raw(&self) -> bool {
        matches!(self, JsonlRecord::Raw(_))
    }
}

/// Decode one line. Malformed JSON is an error; a declined or missing
/// decode function yields the raw value.
pub fn decode_line<T>(line: &str, decode: Option<&DecodeFn<T>>) -> AnthropicResult<JsonlRecord<T>> {
    let value: Value = serde_json::from_str(line).map_err(|e| AnthropicError::decode(e, line))?;

    match decode.and_then(|f| f(&value)) {
        Some(typed) => Ok(JsonlRecord::Typed(typed)),
        None => Ok(JsonlRecord::Raw(value)),
    }
}

/// Serde-backed decode function. Values that do not fit `T` are declined.
pub fn serde_decoder<T: DeserializeOwned>() -> DecodeFn<T> {
    Box::new(|value: &Value| T::deserialize(value).ok())
}

pin_project! {
    /// Stream of JSONL records read from a byte source.
    ///
    /// The first malformed line ends the stream: it is reported once and
    /// nothing after it is decoded. Records yielded before it are unaffected.
    pub struct JsonlStream<T> {
        #[pin]
        records: RecordStream,
        decode: Option<DecodeFn<T>>,
        failed: bool,
    }
}

impl JsonlStream<Value> {
    /// Stream yielding every line as [`JsonlRecord::Raw`]
    pub fn new(source: StreamHandle) -> Self {
        Self::with_decoder_opt(source, None)
    }
}

impl<T> JsonlStream<T> {
    /// Stream that hands each value to `decode`
    pub fn with_decoder(
        source: StreamHandle,
        decode: impl Fn(&Value) -> Option<T> + Send + Sync + 'static,
    ) -> Self {
        Self::with_decoder_opt(source, Some(Box::new(decode)))
    }

    fn with_decoder_opt(source: StreamHandle, decode: Option<DecodeFn<T>>) -> Self {
        Self {
            records: RecordStream::new(source, Framing::Jsonl),
            decode,
            failed: false,
        }
    }

    /// Fail once an unterminated line grows beyond `limit` bytes
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

    /// Collect all records, stopping at the first error
    pub async fn collect(self) -> AnthropicResult<Vec<JsonlRecord<T>>> {
        let mut results = Vec::new();
        let mut stream = Box::pin(self);

        while let Some(record) = stream.next().await {
            results.push(record?);
        }

        Ok(results)
    }
}

impl<T: DeserializeOwned> JsonlStream<T> {
    /// Stream that deserializes each line into `T`, degrading to the raw
    /// value when a line does not fit
    pub fn typed(source: StreamHandle) -> Self {
        Self::with_decoder_opt(source, Some(serde_decoder()))
    }

    /// Typed stream over raw JSONL text (useful for testing)
    pub fn from_jsonl(data: &str) -> Self {
        let chunk = Bytes::from(data.to_string());
        let source: ByteStream = Box::pin(futures::stream::iter(std::iter::once(Ok(chunk))));
        Self::typed(StreamHandle::new(source))
    }
}

impl<T> Stream for JsonlStream<T> {
    type Item = AnthropicResult<JsonlRecord<T>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.failed {
            return Poll::Ready(None);
        }

        let line = match this.records.as_mut().poll_next(cx) {
            Poll::Ready(Some(line)) => line,
            Poll::Ready(None) => return Poll::Ready(None),
            Poll::Pending => return Poll::Pending,
        };

        match line.and_then(|line| decode_line(&line, this.decode.as_ref())) {
            Ok(record) => Poll::Ready(Some(Ok(record))),
            Err(e) => {
                log_decode_error(&e, "jsonl line");
                if e.is_fatal_for_stream() {
                    *this.failed = true;
                    this.records.get_mut().close();
                }
                Poll::Ready(Some(Err(e)))
            }
        }
    }
}
