//! Mock implementations for testing.
//!
//! [`MockByteSource`] stands in for a live response body: it plays back a
//! script of chunks, injected errors and `Pending` gaps, and records when
//! it is dropped so tests can assert the source was released.

use crate::errors::{AnthropicError, AnthropicResult};
use crate::streaming::StreamHandle;
use crate::transport::ByteStream;
use bytes::Bytes;
use futures::Stream;
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

enum Step {
    Chunk(Bytes),
    Error(AnthropicError),
    Pending,
}

/// Observes whether a [`MockByteSource`] has been dropped
#[derive(Debug, Clone)]
pub struct DropProbe(Arc<AtomicBool>);

impl DropProbe {
    /// Returns true once the source has been dropped
    pub fn is_released(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Scripted byte source for testing
pub struct MockByteSource {
    script: VecDeque<Step>,
    dropped: Arc<AtomicBool>,
}

impl MockByteSource {
    /// Create a source that yields `chunks` in order, then ends
    pub fn new<C: AsRef<[u8]>>(chunks: impl IntoIterator<Item = C>) -> Self {
        Self {
            script: chunks
                .into_iter()
                .map(|c| Step::Chunk(Bytes::copy_from_slice(c.as_ref())))
                .collect(),
            dropped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Append a chunk
    pub fn then_chunk(mut self, chunk: impl AsRef<[u8]>) -> Self {
        self.script
            .push_back(Step::Chunk(Bytes::copy_from_slice(chunk.as_ref())));
        self
    }

    /// Append an error
    pub fn then_error(mut self, error: AnthropicError) -> Self {
        self.script.push_back(Step::Error(error));
        self
    }

    /// Append one poll that returns `Pending` and wakes the task
    pub fn then_pending(mut self) -> Self {
        self.script.push_back(Step::Pending);
        self
    }

    /// Probe that outlives the source
    pub fn released_flag(&self) -> DropProbe {
        DropProbe(Arc::clone(&self.dropped))
    }

    /// Box the source as a [`ByteStream`]
    pub fn into_byte_stream(self) -> ByteStream {
        Box::pin(self)
    }

    /// Wrap the source in a lifetime guard
    pub fn into_handle(self) -> StreamHandle {
        StreamHandle::new(self.into_byte_stream())
    }
}

impl Stream for MockByteSource {
    type Item = AnthropicResult<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.script.pop_front() {
            Some(Step::Chunk(chunk)) => Poll::Ready(Some(Ok(chunk))),
            Some(Step::Error(error)) => Poll::Ready(Some(Err(error))),
            Some(Step::Pending) => {
                cx.waker().wake_by_ref();
                Poll::Pending
            }
            None => Poll::Ready(None),
        }
    }
}

impl Drop for MockByteSource {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_mock_plays_script_in_order() {
        let mut source = MockByteSource::new(vec!["a"])
            .then_pending()
            .then_error(AnthropicError::Network {
                message: "reset".to_string(),
            })
            .then_chunk("b");

        assert_eq!(source.next().await.unwrap().unwrap(), Bytes::from_static(b"a"));
        assert!(source.next().await.unwrap().is_err());
        assert_eq!(source.next().await.unwrap().unwrap(), Bytes::from_static(b"b"));
        assert!(source.next().await.is_none());
    }

    #[test]
    fn test_drop_probe() {
        let source = MockByteSource::new(vec!["a"]);
        let probe = source.released_flag();
        assert!(!probe.is_released());
        drop(source);
        assert!(probe.is_released());
    }
}
