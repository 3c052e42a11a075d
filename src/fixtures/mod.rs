//! Test fixtures and helper data.
//!
//! This module provides wire-format SSE frames, JSONL batch lines and typed
//! events shared across test suites.

use crate::types::Usage;
use serde_json::json;

/// Sample model ID
pub const TEST_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Sample message ID
pub const TEST_MESSAGE_ID: &str = "msg_01XFDUDYJgAACzvnptvVoYEL";

/// Create a sample Usage struct
pub fn sample_usage() -> Usage {
    Usage {
        input_tokens: 10,
        output_tokens: 20,
        cache_creation_input_tokens: None,
        cache_read_input_tokens: None,
    }
}

/// Create a sample message response JSON
pub fn sample_message_response() -> serde_json::Value {
    json!({
        "id": TEST_MESSAGE_ID,
        "type": "message",
        "role": "assistant",
        "content": [
            {
                "type": "text",
                "text": "Hello! How can I assist you today?"
            }
        ],
        "model": TEST_MODEL,
        "stop_reason": "end_turn",
        "stop_sequence": null,
        "usage": {
            "input_tokens": 10,
            "output_tokens": 20
        }
    })
}

/// Create a sample error body
pub fn sample_error_response(error_type: &str, message: &str) -> serde_json::Value {
    json!({
        "type": "error",
        "error": {
            "type": error_type,
            "message": message
        }
    })
}

/// Create a sample streaming event
pub fn sample_sse_event(event_type: &str, data: serde_json::Value) -> String {
    format!(
        "event: {}\ndata: {}\n\n",
        event_type,
        serde_json::to_string(&data).unwrap()
    )
}

/// Create a sample message start event
pub fn sample_message_start_event() -> String {
    sample_sse_event(
        "message_start",
        json!({
            "type": "message_start",
            "message": {
                "id": TEST_MESSAGE_ID,
                "type": "message",
                "role": "assistant",
                "content": [],
                "model": TEST_MODEL,
                "stop_reason": null,
                "stop_sequence": null,
                "usage": {
                    "input_tokens": 10,
                    "output_tokens": 1
                }
            }
        }),
    )
}

/// Create a sample text block start event
pub fn sample_text_block_start_event(index: usize) -> String {
    sample_sse_event(
        "content_block_start",
        json!({
            "type": "content_block_start",
            "index": index,
            "content_block": {"type": "text", "text": ""}
        }),
    )
}

/// Create a sample tool-use block start event
pub fn sample_tool_block_start_event(index: usize, id: &str, name: &str) -> String {
    sample_sse_event(
        "content_block_start",
        json!({
            "type": "content_block_start",
            "index": index,
            "content_block": {"type": "tool_use", "id": id, "name": name, "input": {}}
        }),
    )
}

/// Create a sample content block delta event
pub fn sample_content_block_delta_event(index: usize, text: &str) -> String {
    sample_sse_event(
        "content_block_delta",
        json!({
            "type": "content_block_delta",
            "index": index,
            "delta": {
                "type": "text_delta",
                "text": text
            }
        }),
    )
}

/// Create a sample input JSON delta event
pub fn sample_input_json_delta_event(index: usize, partial_json: &str) -> String {
    sample_sse_event(
        "content_block_delta",
        json!({
            "type": "content_block_delta",
            "index": index,
            "delta": {
                "type": "input_json_delta",
                "partial_json": partial_json
            }
        }),
    )
}

/// Create a sample content block stop event
pub fn sample_content_block_stop_event(index: usize) -> String {
    sample_sse_event(
        "content_block_stop",
        json!({"type": "content_block_stop", "index": index}),
    )
}

/// Create a sample message delta event
pub fn sample_message_delta_event() -> String {
    sample_sse_event(
        "message_delta",
        json!({
            "type": "message_delta",
            "delta": {
                "stop_reason": "end_turn",
                "stop_sequence": null
            },
            "usage": {
                "output_tokens": 20
            }
        }),
    )
}

/// Create a sample message stop event
pub fn sample_message_stop_event() -> String {
    sample_sse_event("message_stop", json!({"type": "message_stop"}))
}

/// Create a sample ping event
pub fn sample_ping_event() -> String {
    sample_sse_event("ping", json!({"type": "ping"}))
}

/// Create a sample error event
pub fn sample_error_event(error_type: &str, message: &str) -> String {
    sample_sse_event("error", sample_error_response(error_type, message))
}

/// A complete text response streamed as one block of `parts`
pub fn sample_text_stream(parts: &[&str]) -> String {
    let mut body = sample_message_start_event();
    body.push_str(&sample_text_block_start_event(0));
    body.push_str(&sample_ping_event());
    for part in parts {
        body.push_str(&sample_content_block_delta_event(0, part));
    }
    body.push_str(&sample_content_block_stop_event(0));
    body.push_str(&sample_message_delta_event());
    body.push_str(&sample_message_stop_event());
    body
}

/// A complete tool-use response whose input arrives in `fragments`
pub fn sample_tool_use_stream(fragments: &[&str]) -> String {
    let mut body = sample_message_start_event();
    body.push_str(&sample_text_block_start_event(0));
    body.push_str(&sample_content_block_delta_event(0, "Checking."));
    body.push_str(&sample_content_block_stop_event(0));
    body.push_str(&sample_tool_block_start_event(1, "toolu_01", "get_weather"));
    for fragment in fragments {
        body.push_str(&sample_input_json_delta_event(1, fragment));
    }
    body.push_str(&sample_content_block_stop_event(1));
    body.push_str(&sample_message_delta_event());
    body.push_str(&sample_message_stop_event());
    body
}

/// Split `body` into chunks of `size` bytes, ignoring character boundaries
pub fn chunked(body: &str, size: usize) -> Vec<Vec<u8>> {
    body.as_bytes().chunks(size).map(<[u8]>::to_vec).collect()
}

/// Create a sample batch results JSONL response
pub fn sample_batch_results_jsonl() -> String {
    r#"{"custom_id":"req1","result":{"type":"succeeded","message":{"id":"msg_01XFDUDYJgAACzvnptvVoYEL","type":"message","role":"assistant","content":[{"type":"text","text":"Hello! How can I assist you today?"}],"model":"claude-3-5-sonnet-20241022","stop_reason":"end_turn","usage":{"input_tokens":10,"output_tokens":20}}}}
{"custom_id":"req2","result":{"type":"succeeded","message":{"id":"msg_02ABCdefGHI123jklMNO456","type":"message","role":"assistant","content":[{"type":"text","text":"Hi there!"}],"model":"claude-3-5-sonnet-20241022","stop_reason":"end_turn","usage":{"input_tokens":8,"output_tokens":5}}}}
{"custom_id":"req3","result":{"type":"errored","error":{"type":"error","error":{"type":"invalid_request_error","message":"Invalid request parameters"}}}}
{"custom_id":"req4","result":{"type":"expired"}}"#.to_string()
}

/// Typed events for driving the accumulator directly
pub mod events {
    use super::TEST_MODEL;
    use crate::services::messages::{
        ContentBlock, ContentDelta, MessageDelta, PartialMessage, Role, StreamEvent,
    };
    use crate::types::{StopReason, Usage, UsageDelta};
    use serde_json::json;

    /// `message_start` with 10 input tokens and no content
    pub fn message_start(id: &str) -> StreamEvent {
        StreamEvent::MessageStart {
            message: PartialMessage {
                id: id.to_string(),
                message_type: "message".to_string(),
                role: Role::Assistant,
                model: TEST_MODEL.to_string(),
                content: Vec::new(),
                stop_reason: None,
                stop_sequence: None,
                usage: Usage::new(10, 1),
            },
        }
    }

    /// Empty text block start
    pub fn text_block_start(index: usize) -> StreamEvent {
        StreamEvent::ContentBlockStart {
            index,
            content_block: ContentBlock::Text {
                text: String::new(),
            },
        }
    }

    /// Tool-use block start with an empty input object
    pub fn tool_block_start(index: usize, id: &str, name: &str) -> StreamEvent {
        StreamEvent::ContentBlockStart {
            index,
            content_block: ContentBlock::ToolUse {
                id: id.to_string(),
                name: name.to_string(),
                input: json!({}),
            },
        }
    }

    /// Empty thinking block start
    pub fn thinking_block_start(index: usize) -> StreamEvent {
        StreamEvent::ContentBlockStart {
            index,
            content_block: ContentBlock::Thinking {
                thinking: String::new(),
                signature: String::new(),
            },
        }
    }

    fn delta(index: usize, delta: ContentDelta) -> StreamEvent {
        StreamEvent::ContentBlockDelta { index, delta }
    }

    /// `text_delta`
    pub fn text_delta(index: usize, text: &str) -> StreamEvent {
        delta(index, ContentDelta::TextDelta { text: text.to_string() })
    }

    /// `input_json_delta`
    pub fn input_json_delta(index: usize, partial_json: &str) -> StreamEvent {
        delta(
            index,
            ContentDelta::InputJsonDelta {
                partial_json: partial_json.to_string(),
            },
        )
    }

    /// `thinking_delta`
    pub fn thinking_delta(index: usize, thinking: &str) -> StreamEvent {
        delta(
            index,
            ContentDelta::ThinkingDelta {
                thinking: thinking.to_string(),
            },
        )
    }

    /// `signature_delta`
    pub fn signature_delta(index: usize, signature: &str) -> StreamEvent {
        delta(
            index,
            ContentDelta::SignatureDelta {
                signature: signature.to_string(),
            },
        )
    }

    /// `content_block_stop`
    pub fn block_stop(index: usize) -> StreamEvent {
        StreamEvent::ContentBlockStop { index }
    }

    /// `message_delta` carrying an optional stop reason and output count
    pub fn message_delta(stop_reason: Option<StopReason>, output_tokens: Option<u32>) -> StreamEvent {
        StreamEvent::MessageDelta {
            delta: MessageDelta {
                stop_reason,
                stop_sequence: None,
            },
            usage: UsageDelta {
                output_tokens,
                ..UsageDelta::default()
            },
        }
    }

    /// `message_stop`
    pub fn message_stop() -> StreamEvent {
        StreamEvent::MessageStop
    }

    /// `ping`
    pub fn ping() -> StreamEvent {
        StreamEvent::Ping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_usage() {
        let usage = sample_usage();
        assert_eq!(usage.input_tokens, 10);
        assert_eq!(usage.output_tokens, 20);
        assert_eq!(usage.total_tokens(), 30);
    }

    #[test]
    fn test_sample_sse_event() {
        let event = sample_sse_event("test", json!({"key": "value"}));
        assert!(event.starts_with("event: test\n"));
        assert!(event.ends_with("\n\n"));
    }

    #[test]
    fn test_chunked_covers_body() {
        let body = sample_text_stream(&["a", "b"]);
        let joined: Vec<u8> = chunked(&body, 7).concat();
        assert_eq!(joined, body.as_bytes());
    }
}
