//! Configuration for the streaming decoders.

use crate::errors::{AnthropicError, AnthropicResult};
use crate::DEFAULT_DONE_SENTINEL;

/// Environment variable overriding the SSE termination sentinel
pub const ENV_DONE_SENTINEL: &str = "ANTHROPIC_STREAM_DONE_SENTINEL";
/// Environment variable setting the maximum unresolved buffer size in bytes
pub const ENV_MAX_BUFFER_BYTES: &str = "ANTHROPIC_STREAM_MAX_BUFFER_BYTES";
/// Environment variable enabling trace logs for every decoded event
pub const ENV_TRACE_EVENTS: &str = "ANTHROPIC_STREAM_TRACE_EVENTS";

/// Configuration shared by the SSE and JSONL decoders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    /// `data:` payload that is swallowed instead of decoded (default `[DONE]`)
    pub done_sentinel: String,
    /// Upper bound on bytes buffered while waiting for a record delimiter.
    /// `None` buffers without limit.
    pub max_buffer_bytes: Option<usize>,
    /// Emit a trace-level log line for every decoded event
    pub trace_events: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            done_sentinel: DEFAULT_DONE_SENTINEL.to_string(),
            max_buffer_bytes: None,
            trace_events: false,
        }
    }
}

impl StreamConfig {
    /// Creates a new configuration builder
    pub fn builder() -> StreamConfigBuilder {
        StreamConfigBuilder::default()
    }

    /// Creates a configuration from environment variables.
    ///
    /// Unset variables fall back to defaults; unparsable numbers are ignored
    /// the same way.
    pub fn from_env() -> AnthropicResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AnthropicResult<Self> {
        let mut builder = Self::builder();

        if let Some(sentinel) = lookup(ENV_DONE_SENTINEL) {
            builder = builder.done_sentinel(sentinel);
        }

        if let Some(limit) = lookup(ENV_MAX_BUFFER_BYTES).and_then(|s| s.parse().ok()) {
            builder = builder.max_buffer_bytes(limit);
        }

        if let Some(flag) = lookup(ENV_TRACE_EVENTS) {
            builder = builder.trace_events(matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            ));
        }

        builder.build()
    }
}

/// Builder for StreamConfig
#[derive(Debug, Default)]
pub struct StreamConfigBuilder {
    done_sentinel: Option<String>,
    max_buffer_bytes: Option<usize>,
    trace_events: Option<bool>,
}

impl StreamConfigBuilder {
    /// Sets the termination sentinel
    pub fn done_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.done_sentinel = Some(sentinel.into());
        self
    }

    /// Sets the maximum unresolved buffer size
    pub fn max_buffer_bytes(mut self, limit: usize) -> Self {
        self.max_buffer_bytes = Some(limit);
        self
    }

    /// Enables or disables per-event trace logging
    pub fn trace_events(mut self, enabled: bool) -> Self {
        self.trace_events = Some(enabled);
        self
    }

    /// Builds the configuration
    pub fn build(self) -> AnthropicResult<StreamConfig> {
        let done_sentinel = self
            .done_sentinel
            .unwrap_or_else(|| DEFAULT_DONE_SENTINEL.to_string());

        if done_sentinel.trim().is_empty() {
            return Err(AnthropicError::Configuration {
                message: "done sentinel must not be empty".to_string(),
            });
        }

        if self.max_buffer_bytes == Some(0) {
            return Err(AnthropicError::Configuration {
                message: "max_buffer_bytes must be greater than zero".to_string(),
            });
        }

        Ok(StreamConfig {
            done_sentinel,
            max_buffer_bytes: self.max_buffer_bytes,
            trace_events: self.trace_events.unwrap_or(false),
        })
    }
}
