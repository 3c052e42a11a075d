//! Common types shared by the message and batch decoders.

use serde::{Deserialize, Serialize};

/// Token usage information for a message
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    /// Number of input tokens
    #[serde(default)]
    pub input_tokens: u32,
    /// Number of output tokens
    #[serde(default)]
    pub output_tokens: u32,
    /// Number of tokens used for cache creation (if prompt caching is enabled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_creation_input_tokens: Option<u32>,
    /// Number of tokens read from cache (if prompt caching is enabled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_read_input_tokens: Option<u32>,
}

impl Usage {
    /// Create a new Usage instance
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            cache_creation_input_tokens: None,
            cache_read_input_tokens: None,
        }
    }

    /// Get total tokens (input + output)
    pub fn total_tokens(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }

    /// Overwrite every counter present in a `message_delta` usage patch.
    ///
    /// The server reports cumulative totals, so values replace rather than
    /// add.
    pub fn apply_delta(&mut self, delta: &UsageDelta) {
        if let Some(input) = delta.input_tokens {
            self.input_tokens = input;
        }
        if let Some(output) = delta.output_tokens {
            self.output_tokens = output;
        }
        if delta.cache_creation_input_tokens.is_some() {
            self.cache_creation_input_tokens = delta.cache_creation_input_tokens;
        }
        if delta.cache_read_input_tokens.is_some() {
            self.cache_read_input_tokens = delta.cache_read_input_tokens;
        }
    }
}

/// Cumulative usage carried by a `message_delta` event. Every field is
/// optional; absent fields leave the stored counter untouched.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageDelta {
    /// Cumulative input tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u32>,
    /// Cumulative output tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u32>,
    /// Cumulative cache creation tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_creation_input_tokens: Option<u32>,
    /// Cumulative cache read tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_read_input_tokens: Option<u32>,
}

/// Reason why a message stopped generating
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of message
    EndTurn,
    /// Hit maximum token limit
    MaxTokens,
    /// Encountered a stop sequence
    StopSequence,
    /// Model decided to use a tool
    ToolUse,
    /// Long-running turn paused by the server
    PauseTurn,
    /// Response withheld by the server
    Refusal,
}

/// Role of a message participant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User role
    User,
    /// Assistant role
    Assistant,
}
