//! # Anthropic Claude API Streaming Decoders
//!
//! Decoders for the streamed response bodies of the Anthropic Claude API.
//!
//! ## Features
//!
//! - Server-Sent Events framing that tolerates any chunking of the body
//!   and all three line-ending conventions
//! - Typed Messages API events, aggregated into the final [`Message`]
//! - Line-delimited JSON decoding for Message Batches results
//! - Exactly-once release of the response body, including on early drop
//! - Structured logging through `tracing`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use integrations_anthropic_streaming::{StreamConfig, StreamingResponse};
//!
//! # async fn run(response: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
//! let config = StreamConfig::from_env()?;
//! let response = StreamingResponse::from_reqwest(response).error_for_status().await?;
//!
//! let mut stream = response.into_message_stream(&config);
//! while let Some(event) = stream.next().await {
//!     if let Some(text) = event?.text_delta() {
//!         print!("{}", text);
//!     }
//! }
//!
//! let message = stream.final_message().await?;
//! println!("\n{:?} after {} tokens", message.stop_reason, message.usage.output_tokens);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - `streaming` - Frame splitting, SSE and JSONL decoding, lifetime guard
//! - `services` - Messages event stream and aggregation, batch results
//! - `transport` - Boundary with the HTTP layer
//! - `config` - Decoder configuration
//! - `errors` - Error types and taxonomy
//! - `observability` - Logging setup and helpers
//! - `types` - Common types (Usage, StopReason, Role)
//! - `mocks` - Mock byte sources for testing
//! - `fixtures` - Test fixtures and helper data

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod config;
pub mod errors;
pub mod observability;
pub mod services;
pub mod streaming;
pub mod transport;
pub mod types;

// Development/testing modules
#[cfg(test)]
pub mod fixtures;
#[cfg(test)]
pub mod mocks;

/// `data:` payload that marks the end of an SSE stream
pub const DEFAULT_DONE_SENTINEL: &str = "[DONE]";

// Re-exports for convenience
pub use config::{StreamConfig, StreamConfigBuilder};
pub use errors::{AnthropicError, AnthropicResult};
pub use observability::{LogFormat, LogLevel, LoggingConfig};
pub use services::messages::{
    AccumulatorState, ContentBlock, ContentDelta, Message, MessageAccumulator, MessageStream,
    StreamEvent,
};
pub use streaming::{
    FrameSplitter, Framing, JsonlRecord, JsonlStream, ReleaseReason, ServerSentEvent,
    SseDecoder, StreamHandle,
};
pub use transport::{ByteStream, StreamingResponse};
pub use types::{Role, StopReason, Usage, UsageDelta};

#[cfg(feature = "batches")]
pub use services::batches::{BatchResult, BatchResultType, BatchResults, BatchResultsStream};
