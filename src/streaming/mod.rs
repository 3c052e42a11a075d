//! Byte-level stream decoding.
//!
//! - [`splitter`]: record framing over arbitrary chunk boundaries
//! - [`sse`]: Server-Sent Events records
//! - [`jsonl`]: line-delimited JSON records
//! - [`guard`]: exactly-once release of the byte source

pub mod guard;
pub mod jsonl;
pub mod splitter;
pub mod sse;

pub use guard::{ReleaseReason, ReleaseSignal, StreamHandle};
pub use jsonl::{decode_line, serde_decoder, DecodeFn, JsonlRecord, JsonlStream};
pub use splitter::{FrameSplitter, Framing, RecordStream};
pub use sse::{ServerSentEvent, SseDecoder};
