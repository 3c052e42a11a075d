//! Error types for the Anthropic streaming decoders.

use thiserror::Error;

/// Result type alias for streaming operations
pub type AnthropicResult<T> = Result<T, AnthropicError>;

/// Main error type for the streaming decoders.
///
/// Decode, protocol and API errors are fatal for the stream that produced
/// them: the stream is fused afterwards and yields no further items.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnthropicError {
    /// Configuration error (invalid settings, malformed environment values)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue
        message: String,
    },

    /// Network error raised by the byte source while reading the body
    #[error("Network error: {message}")]
    Network {
        /// Error message describing the network issue
        message: String,
    },

    /// Payload decode error (invalid JSON in an SSE data buffer, a JSONL
    /// line, a typed event payload or an accumulated tool input)
    #[error("Decode error: {message}")]
    Decode {
        /// Error message from the JSON parser
        message: String,
        /// The offending record, truncated for display
        record: Option<String>,
    },

    /// Event ordering violation detected by the message accumulator
    #[error("Protocol error: {message}")]
    Protocol {
        /// Error message describing the violated transition
        message: String,
    },

    /// Error event sent by the server in the middle of a stream
    #[error("API error ({error_type}): {message}")]
    Api {
        /// Error type reported by the server (e.g. `overloaded_error`)
        error_type: String,
        /// Error message reported by the server
        message: String,
    },

    /// Streaming error (framing limits exceeded, use after close)
    #[error("Stream error: {message}")]
    StreamError {
        /// Error message describing the stream issue
        message: String,
    },
}

/// Longest record excerpt kept on a [`AnthropicError::Decode`].
const RECORD_EXCERPT_LEN: usize = 256;

impl AnthropicError {
    /// Builds a decode error carrying an excerpt of the offending record.
    pub fn decode(err: serde_json::Error, record: &str) -> Self {
        AnthropicError::Decode {
            message: err.to_string(),
            record: Some(excerpt(record)),
        }
    }

    /// Builds a decode error for a record that is not valid UTF-8.
    pub fn invalid_utf8(err: std::str::Utf8Error, raw: &[u8]) -> Self {
        AnthropicError::Decode {
            message: format!("invalid UTF-8: {}", err),
            record: Some(excerpt(&String::from_utf8_lossy(raw))),
        }
    }

    /// Builds a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        AnthropicError::Protocol {
            message: message.into(),
        }
    }

    /// Returns true if this error terminates the stream that produced it.
    pub fn is_fatal_for_stream(&self) -> bool {
        !matches!(self, AnthropicError::Configuration { .. })
    }

    /// Returns true if re-issuing the request may succeed.
    ///
    /// Retrying is the transport layer's job; this only classifies.
    pub fn is_retryable(&self) -> bool {
        match self {
            AnthropicError::Network { .. } => true,
            AnthropicError::Api { error_type, .. } => {
                matches!(error_type.as_str(), "overloaded_error" | "api_error" | "rate_limit_error")
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for AnthropicError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AnthropicError::Network {
                message: format!("Request timed out: {}", err),
            }
        } else if err.is_connect() {
            AnthropicError::Network {
                message: format!("Connection failed: {}", err),
            }
        } else {
            AnthropicError::Network {
                message: format!("Body read failed: {}", err),
            }
        }
    }
}

impl From<serde_json::Error> for AnthropicError {
    fn from(err: serde_json::Error) -> Self {
        AnthropicError::Decode {
            message: err.to_string(),
            record: None,
        }
    }
}

fn excerpt(record: &str) -> String {
    if record.len() <= RECORD_EXCERPT_LEN {
        return record.to_string();
    }

    let mut end = RECORD_EXCERPT_LEN;
    while !record.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &record[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_retryable() {
        let network = AnthropicError::Network {
            message: "connection reset".to_string(),
        };
        assert!(network.is_retryable());

        let overloaded = AnthropicError::Api {
            error_type: "overloaded_error".to_string(),
            message: "Overloaded".to_string(),
        };
        assert!(overloaded.is_retryable());

        let protocol = AnthropicError::protocol("delta before start");
        assert!(!protocol.is_retryable());
        assert!(protocol.is_fatal_for_stream());
    }

    #[test]
    fn test_decode_error_keeps_excerpt() {
        let err = serde_json::from_str::<serde_json::Value>("{bad json}").unwrap_err();
        let decode = AnthropicError::decode(err, "{bad json}");
        match decode {
            AnthropicError::Decode { record, .. } => {
                assert_eq!(record.as_deref(), Some("{bad json}"));
            }
            other => panic!("Expected decode error, got: {:?}", other),
        }
    }

    #[test]
    fn test_decode_error_truncates_on_char_boundary() {
        let long = "é".repeat(300);
        let err = serde_json::from_str::<serde_json::Value>(&long).unwrap_err();
        match AnthropicError::decode(err, &long) {
            AnthropicError::Decode { record: Some(record), .. } => {
                assert!(record.ends_with("..."));
                assert!(record.len() <= RECORD_EXCERPT_LEN + 3);
            }
            other => panic!("Expected decode error, got: {:?}", other),
        }
    }

    #[test]
    fn test_configuration_error_is_not_fatal_for_stream() {
        let err = AnthropicError::Configuration {
            message: "bad".to_string(),
        };
        assert!(!err.is_fatal_for_stream());
        assert_eq!(err.to_string(), "Configuration error: bad");
    }

    #[test]
    fn test_invalid_utf8_error_keeps_lossy_excerpt() {
        let raw: &[u8] = b"{\"id\":\"a\xFFb\"}";
        let err = std::str::from_utf8(raw).unwrap_err();
        match AnthropicError::invalid_utf8(err, raw) {
            AnthropicError::Decode { message, record } => {
                assert!(message.starts_with("invalid UTF-8"));
                assert_eq!(record.as_deref(), Some("{\"id\":\"a\u{FFFD}b\"}"));
            }
            other => panic!("Expected decode error, got: {:?}", other),
        }
    }
}
