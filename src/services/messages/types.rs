//! Type definitions for streamed Messages API responses

use crate::errors::{AnthropicError, AnthropicResult};
pub use crate::types::{Role, StopReason, Usage, UsageDelta};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A complete message, as returned by the API or assembled from a stream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Message identifier (`msg_...`)
    pub id: String,
    /// Object type, always `message`
    #[serde(rename = "type", default = "default_message_type")]
    pub message_type: String,
    /// Author role, always assistant for responses
    pub role: Role,
    /// Content blocks in index order
    pub content: Vec<ContentBlock>,
    /// Model that produced the message
    pub model: String,
    /// Why generation stopped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<StopReason>,
    /// Custom stop sequence that was hit, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_sequence: Option<String>,
    /// Token usage
    #[serde(default)]
    pub usage: Usage,
}

fn default_message_type() -> String {
    "message".to_string()
}

impl Message {
    /// Concatenated text of every text block
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Tool-use blocks as `(id, name, input)`
    pub fn tool_uses(&self) -> Vec<(&str, &str, &Value)> {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::ToolUse { id, name, input } => {
                    Some((id.as_str(), name.as_str(), input))
                }
                _ => None,
            })
            .collect()
    }
}

/// Message skeleton carried by `message_start`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartialMessage {
    /// Message identifier
    pub id: String,
    /// Object type
    #[serde(rename = "type", default = "default_message_type")]
    pub message_type: String,
    /// Author role
    pub role: Role,
    /// Model name
    pub model: String,
    /// Initial content, normally empty
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    /// Stop reason, normally null at start
    #[serde(default)]
    pub stop_reason: Option<StopReason>,
    /// Stop sequence, normally null at start
    #[serde(default)]
    pub stop_sequence: Option<String>,
    /// Usage at start of generation
    #[serde(default)]
    pub usage: Usage,
}

impl From<PartialMessage> for Message {
    fn from(partial: PartialMessage) -> Self {
        Message {
            id: partial.id,
            message_type: partial.message_type,
            role: partial.role,
            content: partial.content,
            model: partial.model,
            stop_reason: partial.stop_reason,
            stop_sequence: partial.stop_sequence,
            usage: partial.usage,
        }
    }
}

/// Content block in a response message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text
    Text {
        /// Text accumulated so far
        #[serde(default)]
        text: String,
    },
    /// Tool invocation requested by the model
    ToolUse {
        /// Tool use identifier (`toolu_...`)
        id: String,
        /// Name of the tool
        name: String,
        /// Parsed tool input; filled in at `message_stop` when streamed
        #[serde(default = "empty_object")]
        input: Value,
    },
    /// Extended thinking
    Thinking {
        /// Thinking text
        #[serde(default)]
        thinking: String,
        /// Signature over the thinking text
        #[serde(default)]
        signature: String,
    },
    /// Thinking content redacted by the server
    RedactedThinking {
        /// Opaque encrypted payload
        data: String,
    },
    /// Block kind this client does not model; deltas to it are ignored
    #[serde(other)]
    Unsupported,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

impl ContentBlock {
    /// Wire name of the block kind
    pub fn kind(&self) -> &'static str {
        match self {
            ContentBlock::Text { .. } => "text",
            ContentBlock::ToolUse { .. } => "tool_use",
            ContentBlock::Thinking { .. } => "thinking",
            ContentBlock::RedactedThinking { .. } => "redacted_thinking",
            ContentBlock::Unsupported => "unsupported",
        }
    }
}

/// Incremental patch for one content block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentDelta {
    /// Text appended to a text block
    TextDelta {
        /// Text fragment
        text: String,
    },
    /// Fragment of a tool-use block's JSON input
    InputJsonDelta {
        /// Raw JSON fragment, not valid on its own
        partial_json: String,
    },
    /// Text appended to a thinking block
    ThinkingDelta {
        /// Thinking fragment
        thinking: String,
    },
    /// Signature for a thinking block
    SignatureDelta {
        /// Full signature
        signature: String,
    },
    /// Delta kind this client does not model
    #[serde(other)]
    Unsupported,
}

/// Top-level fields patched by `message_delta`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MessageDelta {
    /// New stop reason, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<StopReason>,
    /// New stop sequence, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_sequence: Option<String>,
}

/// Error body carried by an `error` event or an errored batch entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiErrorDetail {
    /// Error type (e.g. `overloaded_error`)
    #[serde(rename = "type")]
    pub error_type: String,
    /// Human-readable message
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEventPayload {
    error: ApiErrorDetail,
}

/// Event types with a typed representation in [`StreamEvent`]
pub const KNOWN_EVENT_TYPES: &[&str] = &[
    "message_start",
    "content_block_start",
    "content_block_delta",
    "content_block_stop",
    "message_delta",
    "message_stop",
    "ping",
];

/// Stream events from the Messages API
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Message started
    MessageStart {
        /// Message skeleton
        message: PartialMessage,
    },
    /// Content block started
    ContentBlockStart {
        /// Block position
        index: usize,
        /// Initial block
        content_block: ContentBlock,
    },
    /// Content block delta (incremental update)
    ContentBlockDelta {
        /// Block position
        index: usize,
        /// Patch to apply
        delta: ContentDelta,
    },
    /// Content block stopped
    ContentBlockStop {
        /// Block position
        index: usize,
    },
    /// Message delta (metadata update)
    MessageDelta {
        /// Top-level field patch
        delta: MessageDelta,
        /// Usage counters to replace
        #[serde(default)]
        usage: UsageDelta,
    },
    /// Message stopped
    MessageStop,
    /// Ping event (keepalive)
    Ping,
    /// Any other event type, passed through untouched
    #[serde(skip_deserializing)]
    Unknown {
        /// Value of the `type` field
        event_type: String,
        /// Full payload
        data: Value,
    },
}

impl StreamEvent {
    /// Build a typed event from a decoded payload carrying a `type` field.
    ///
    /// `error` payloads become [`AnthropicError::Api`]. A known type whose
    /// payload does not match its shape is a decode error.
    pub fn from_value(value: Value) -> AnthropicResult<Self> {
        let event_type = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        if event_type == "error" {
            let payload: ErrorEventPayload = serde_json::from_value(value)?;
            return Err(AnthropicError::Api {
                error_type: payload.error.error_type,
                message: payload.error.message,
            });
        }

        if !KNOWN_EVENT_TYPES.contains(&event_type.as_str()) {
            return Ok(StreamEvent::Unknown {
                event_type,
                data: value,
            });
        }

        serde_json::from_value(value).map_err(|e| AnthropicError::Decode {
            message: format!("Failed to parse {}: {}", event_type, e),
            record: None,
        })
    }

    /// Wire name of this event
    pub fn event_type(&self) -> &str {
        match self {
            StreamEvent::MessageStart { .. } => "message_start",
            StreamEvent::ContentBlockStart { .. } => "content_block_start",
            StreamEvent::ContentBlockDelta { .. } => "content_block_delta",
            StreamEvent::ContentBlockStop { .. } => "content_block_stop",
            StreamEvent::MessageDelta { .. } => "message_delta",
            StreamEvent::MessageStop => "message_stop",
            StreamEvent::Ping => "ping",
            StreamEvent::Unknown { event_type, .. } => event_type,
        }
    }

    /// Content block index, for block-scoped events
    pub fn index(&self) -> Option<usize> {
        match self {
            StreamEvent::ContentBlockStart { index, .. }
            | StreamEvent::ContentBlockDelta { index, .. }
            | StreamEvent::ContentBlockStop { index } => Some(*index),
            _ => None,
        }
    }

    /// Text fragment carried by a `text_delta`
    pub fn text_delta(&self) -> Option<&str> {
        match self {
            StreamEvent::ContentBlockDelta {
                delta: ContentDelta::TextDelta { text },
                ..
            } => Some(text),
            _ => None,
        }
    }
}
