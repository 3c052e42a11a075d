//! Lifetime guard for the underlying byte source.
//!
//! [`StreamHandle`] owns the response body and drops it exactly once: when
//! the body is exhausted, when it yields an error, when the owner calls
//! [`StreamHandle::release`], or, as a backstop, when the handle itself is
//! dropped before any of those happened.

use crate::errors::AnthropicResult;
use crate::observability::log_release;
use crate::transport::ByteStream;
use bytes::Bytes;
use futures::Stream;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

/// Why a byte source was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseReason {
    /// The source reported end of data
    Exhausted,
    /// The source yielded an error
    Error,
    /// The owner released it explicitly
    Closed,
    /// The handle was dropped before any other release
    Dropped,
}

impl ReleaseReason {
    /// Stable lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseReason::Exhausted => "exhausted",
            ReleaseReason::Error => "error",
            ReleaseReason::Closed => "closed",
            ReleaseReason::Dropped => "dropped",
        }
    }
}

impl fmt::Display for ReleaseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cloneable observer of a handle's released flag.
#[derive(Debug, Clone)]
pub struct ReleaseSignal(Arc<AtomicBool>);

impl ReleaseSignal {
    /// Returns true once the source has been released
    pub fn is_released(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

type ReleaseHook = Box<dyn FnOnce(ReleaseReason) + Send>;

/// Owns a byte source and guarantees it is released exactly once.
pub struct StreamHandle {
    source: Option<ByteStream>,
    released: Arc<AtomicBool>,
    on_release: Option<ReleaseHook>,
}

impl StreamHandle {
    /// Take ownership of an open byte source
    pub fn new(source: ByteStream) -> Self {
        Self {
            source: Some(source),
            released: Arc::new(AtomicBool::new(false)),
            on_release: None,
        }
    }

    /// Run `hook` once, right after the source is dropped.
    ///
    /// A panicking hook is logged and swallowed.
    pub fn with_release_hook(mut self, hook: impl FnOnce(ReleaseReason) + Send + 'static) -> Self {
        self.on_release = Some(Box::new(hook));
        self
    }

    /// Observer for the released flag that outlives the handle
    pub fn release_signal(&self) -> ReleaseSignal {
        ReleaseSignal(Arc::clone(&self.released))
    }

    /// Returns true once the source has been released
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Release the source. Idempotent.
    pub fn release(&mut self) {
        self.release_with(ReleaseReason::Closed);
    }

    fn release_with(&mut self, reason: ReleaseReason) {
        let Some(source) = self.source.take() else {
            return;
        };
        drop(source);
        self.released.store(true, Ordering::Release);
        log_release(reason.as_str());

        if let Some(hook) = self.on_release.take() {
            if catch_unwind(AssertUnwindSafe(|| hook(reason))).is_err() {
                tracing::warn!(reason = reason.as_str(), "release hook panicked");
            }
        }
    }
}

impl fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamHandle")
            .field("released", &self.is_released())
            .finish()
    }
}

impl Stream for StreamHandle {
    type Item = AnthropicResult<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let Some(source) = self.source.as_mut() else {
            return Poll::Ready(None);
        };

        match source.as_mut().poll_next(cx) {
            Poll::Ready(None) => {
                self.release_with(ReleaseReason::Exhausted);
                Poll::Ready(None)
            }
            Poll::Ready(Some(Err(e))) => {
                self.release_with(ReleaseReason::Error);
                Poll::Ready(Some(Err(e)))
            }
            other => other,
        }
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.release_with(ReleaseReason::Dropped);
    }
}
