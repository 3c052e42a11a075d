//! Streaming support for the Messages API

use super::accumulator::{AccumulatorState, MessageAccumulator};
use super::types::{Message, StreamEvent};
use crate::config::StreamConfig;
use crate::errors::{AnthropicError, AnthropicResult};
use crate::observability::{log_decode_error, log_stream_event};
use crate::streaming::{ServerSentEvent, SseDecoder, StreamHandle};
use crate::transport::ByteStream;
use bytes::Bytes;
use futures::{future, Stream, StreamExt};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

pin_project! {
    /// Stream of typed Messages API events.
    ///
    /// Every event is applied to an internal [`MessageAccumulator`] before it
    /// is yielded, so [`MessageStream::final_message`] is available once the
    /// events have been consumed. The first error ends the stream.
    pub struct MessageStream {
        #[pin]
        events: SseDecoder,
        accumulator: MessageAccumulator,
        config: StreamConfig,
        done: bool,
        error: Option<AnthropicError>,
    }
}

impl MessageStream {
    /// Create a message stream with default configuration
    pub fn new(source: StreamHandle) -> Self {
        Self::with_config(source, StreamConfig::default())
    }

    /// Create a message stream with the given configuration
    pub fn with_config(source: StreamHandle, config: StreamConfig) -> Self {
        Self {
            events: SseDecoder::new(source).with_max_buffer_bytes(config.max_buffer_bytes),
            accumulator: MessageAccumulator::new(),
            config,
            done: false,
            error: None,
        }
    }

    /// Message stream over raw SSE text (useful for testing)
    pub fn from_sse(body: &str) -> Self {
        let chunk = Bytes::from(body.to_string());
        let source: ByteStream = Box::pin(futures::stream::iter(std::iter::once(Ok(chunk))));
        Self::new(StreamHandle::new(source))
    }

    /// The lifetime guard owning the byte source
    pub fn handle(&self) -> &StreamHandle {
        self.events.handle()
    }

    /// The message as built so far
    pub fn current_message(&self) -> Option<&Message> {
        self.accumulator.snapshot()
    }

    /// Lifecycle state of the message being built
    pub fn state(&self) -> AccumulatorState {
        self.accumulator.state()
    }

    /// Release the byte source. Events not yet read are discarded.
    pub fn close(&mut self) {
        self.done = true;
        self.events.close();
    }

    /// Drain the remaining events and return the completed message.
    ///
    /// Calling this again, or after draining the stream manually, returns
    /// the same message. If the stream failed, the failure is returned.
    /// A body that ends before `message_stop` is reported as
    /// [`AnthropicError::Protocol`] rather than returned as a partial
    /// message; use [`MessageStream::current_message`] for the snapshot.
    pub async fn final_message(&mut self) -> AnthropicResult<Message> {
        while let Some(event) = self.next().await {
            event?;
        }

        match &self.error {
            Some(error) => Err(error.clone()),
            None => self.accumulator.finish(),
        }
    }

    /// Text of the completed message
    pub async fn final_text(&mut self) -> AnthropicResult<String> {
        Ok(self.final_message().await?.text())
    }

    /// Only the text fragments, in arrival order
    pub fn text_stream(self) -> impl Stream<Item = AnthropicResult<String>> + Send {
        self.filter_map(|event| {
            future::ready(match event {
                Ok(event) => event.text_delta().map(|text| Ok(text.to_string())),
                Err(e) => Some(Err(e)),
            })
        })
    }

    fn decode(sse: ServerSentEvent, sentinel: &str) -> AnthropicResult<Option<StreamEvent>> {
        sse.json_payload(sentinel)?
            .map(StreamEvent::from_value)
            .transpose()
    }
}

impl Stream for MessageStream {
    type Item = AnthropicResult<StreamEvent>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if *this.done {
                return Poll::Ready(None);
            }

            let sse = match this.events.as_mut().poll_next(cx) {
                Poll::Ready(Some(sse)) => sse,
                Poll::Ready(None) => {
                    *this.done = true;
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            };

            let result = sse.and_then(|sse| Self::decode(sse, &this.config.done_sentinel));
            let result = match result {
                Ok(None) => continue,
                Ok(Some(event)) => this.accumulator.apply(&event).map(|()| event),
                Err(e) => Err(e),
            };

            match result {
                Ok(event) => {
                    if this.config.trace_events {
                        log_stream_event(event.event_type(), event.index());
                    }
                    return Poll::Ready(Some(Ok(event)));
                }
                Err(e) => {
                    log_decode_error(&e, "message stream");
                    if e.is_fatal_for_stream() {
                        *this.done = true;
                        *this.error = Some(e.clone());
                        this.events.as_mut().get_mut().close();
                    }
                    return Poll::Ready(Some(Err(e)));
                }
            }
        }
    }
}
