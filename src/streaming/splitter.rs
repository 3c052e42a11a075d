//! Record framing over a chunked byte stream.
//!
//! Chunks arrive with no alignment to record boundaries. [`FrameSplitter`]
//! buffers bytes until a delimiter completes a record, and [`RecordStream`]
//! drives it from a [`StreamHandle`].

use crate::errors::{AnthropicError, AnthropicResult};
use crate::streaming::guard::StreamHandle;
use bytes::{Buf, BytesMut};
use futures::{Stream, StreamExt};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

const SSE_DELIMITERS: &[&[u8]] = &[b"\r\n\r\n", b"\n\n", b"\r\r"];
const JSONL_DELIMITERS: &[&[u8]] = &[b"\r\n", b"\n", b"\r"];

/// Record boundary convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// Records separated by a blank line (`\r\n\r\n`, `\n\n` or `\r\r`)
    Sse,
    /// Records separated by a single line ending (`\r\n`, `\n` or `\r`)
    Jsonl,
}

impl Framing {
    /// Candidate delimiters, longest first.
    pub fn delimiters(self) -> &'static [&'static [u8]] {
        match self {
            Framing::Sse => SSE_DELIMITERS,
            Framing::Jsonl => JSONL_DELIMITERS,
        }
    }

}

/// Splits buffered bytes into complete, delimiter-stripped records.
///
/// After every call to [`FrameSplitter::next_record`] that returns `None`,
/// the buffer holds at most one trailing partial record.
#[derive(Debug)]
pub struct FrameSplitter {
    framing: Framing,
    buffer: BytesMut,
    // Prefix of `buffer` already known to contain no delimiter start.
    scanned: usize,
}

impl FrameSplitter {
    /// Create an empty splitter for the given framing
    pub fn new(framing: Framing) -> Self {
        Self {
            framing,
            buffer: BytesMut::new(),
            scanned: 0,
        }
    }

    /// The framing this splitter uses
    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// Append a chunk. Empty chunks are accepted and change nothing.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Number of bytes waiting for a delimiter
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Extract the next complete record, skipping empty ones.
    ///
    /// A record that is not valid UTF-8 is consumed and reported as
    /// [`AnthropicError::Decode`].
    pub fn next_record(&mut self) -> Option<AnthropicResult<String>> {
        loop {
            let (offset, len) = self.find_delimiter()?;
            let raw = self.buffer.split_to(offset);
            self.buffer.advance(len);
            self.scanned = 0;

            if let Some(record) = clean_record(&raw) {
                return Some(record);
            }
        }
    }

    /// Flush whatever remains as one final record.
    ///
    /// Call once the source is exhausted. Returns `None` when the remainder
    /// is blank, and on every call after the first.
    pub fn finish(&mut self) -> Option<AnthropicResult<String>> {
        let rest = self.buffer.split();
        self.scanned = 0;
        clean_record(&rest)
    }

    /// Discard all buffered bytes
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.scanned = 0;
    }

    /// Earliest delimiter in the buffer as `(offset, length)`. Ties at the
    /// same offset go to the longer delimiter.
    ///
    /// Every delimiter starts with `\r` or `\n`, so a single forward pass
    /// over line-ending bytes visits candidate offsets in order.
    fn find_delimiter(&mut self) -> Option<(usize, usize)> {
        let delimiters = self.framing.delimiters();
        let mut from = self.scanned;

        loop {
            let offset = match self.buffer[from..].iter().position(|&b| b == b'\r' || b == b'\n') {
                Some(found) => from + found,
                None => {
                    self.scanned = self.buffer.len();
                    return None;
                }
            };

            let rest = &self.buffer[offset..];
            if let Some(delimiter) = delimiters.iter().find(|d| rest.starts_with(**d)) {
                return Some((offset, delimiter.len()));
            }

            // A delimiter may straddle the next chunk; resume here.
            if delimiters.iter().any(|d| d.len() > rest.len() && d.starts_with(rest)) {
                self.scanned = offset;
                return None;
            }

            from = offset + 1;
        }
    }
}

fn clean_record(raw: &[u8]) -> Option<AnthropicResult<String>> {
    let text = match std::str::from_utf8(raw) {
        Ok(text) => text,
        Err(e) => return Some(Err(AnthropicError::invalid_utf8(e, raw))),
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(Ok(trimmed.to_string()))
    }
}

pin_project! {
    /// Lazy sequence of raw records read from a byte source.
    ///
    /// Forward-only and destructive: every poll mutates the buffer. The
    /// source is released on exhaustion, on the first error, on
    /// [`RecordStream::close`], or when the stream is dropped.
    pub struct RecordStream {
        source: StreamHandle,
        splitter: FrameSplitter,
        max_buffer_bytes: Option<usize>,
        source_done: bool,
        done: bool,
    }
}

impl RecordStream {
    /// Create a record stream over a byte source
    pub fn new(source: StreamHandle, framing: Framing) -> Self {
        Self {
            source,
            splitter: FrameSplitter::new(framing),
            max_buffer_bytes: None,
            source_done: false,
            done: false,
        }
    }

    /// Fail the stream once more than `limit` bytes wait for a delimiter
    pub fn with_max_buffer_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_buffer_bytes = limit;
        self
    }

    /// The lifetime guard owning the byte source
    pub fn handle(&self) -> &StreamHandle {
        &self.source
    }

    /// Release the source and drop buffered bytes; later polls yield `None`.
    pub fn close(&mut self) {
        self.done = true;
        self.splitter.clear();
        self.source.release();
    }
}

impl Stream for RecordStream {
    type Item = AnthropicResult<String>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        if *this.done {
            return Poll::Ready(None);
        }

        loop {
            match this.splitter.next_record() {
                Some(Ok(record)) => return Poll::Ready(Some(Ok(record))),
                Some(Err(e)) => {
                    *this.done = true;
                    this.splitter.clear();
                    this.source.release();
                    return Poll::Ready(Some(Err(e)));
                }
                None => {}
            }

            if let Some(limit) = *this.max_buffer_bytes {
                if this.splitter.buffered_len() > limit {
                    *this.done = true;
                    this.splitter.clear();
                    this.source.release();
                    return Poll::Ready(Some(Err(AnthropicError::StreamError {
                        message: format!("unterminated record exceeds {} buffered bytes", limit),
                    })));
                }
            }

            if *this.source_done {
                *this.done = true;
                return Poll::Ready(this.splitter.finish());
            }

            match this.source.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(chunk))) => {
                    // Zero-length reads are not end of stream.
                    if !chunk.is_empty() {
                        this.splitter.push(&chunk);
                    }
                }
                Poll::Ready(Some(Err(e))) => {
                    *this.done = true;
                    this.splitter.clear();
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(None) => {
                    *this.source_done = true;
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
