//! Transport boundary.
//!
//! The decoders never perform HTTP themselves. They receive an
//! already-open [`StreamingResponse`]: status, headers and a chunked body.

use crate::config::StreamConfig;
use crate::errors::{AnthropicError, AnthropicResult};
use crate::services::messages::{ApiErrorDetail, MessageStream};
use crate::streaming::StreamHandle;
use bytes::{Bytes, BytesMut};
use futures::stream::{self, Stream};
use futures::StreamExt;
use http::{HeaderMap, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::pin::Pin;

#[cfg(feature = "batches")]
use crate::services::batches::BatchResultsStream;

/// Chunked response body
pub type ByteStream = Pin<Box<dyn Stream<Item = AnthropicResult<Bytes>> + Send>>;

/// Header carrying the server-assigned request identifier
pub const REQUEST_ID_HEADER: &str = "request-id";

/// An open streaming HTTP response.
pub struct StreamingResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body, not yet read
    pub body: ByteStream,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ApiErrorDetail,
}

impl StreamingResponse {
    /// Create a response from its parts
    pub fn new(status: StatusCode, headers: HeaderMap, body: ByteStream) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Adapt a live `reqwest` response. Body read failures surface as
    /// [`AnthropicError::Network`] items.
    pub fn from_reqwest(response: reqwest::Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(AnthropicError::from));

        Self::new(status, headers, Box::pin(body))
    }

    /// A `200 OK` response whose body yields `chunks` (useful for testing)
    pub fn from_chunks<C>(chunks: impl IntoIterator<Item = C>) -> Self
    where
        C: Into<Bytes>,
    {
        let chunks: Vec<AnthropicResult<Bytes>> = chunks.into_iter().map(|c| Ok(c.into())).collect();
        Self::new(StatusCode::OK, HeaderMap::new(), Box::pin(stream::iter(chunks)))
    }

    /// Value of the `request-id` header, if present and valid UTF-8
    pub fn request_id(&self) -> Option<&str> {
        self.headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
    }

    /// Returns true for a 2xx status
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Pass a successful response through; otherwise read the body and turn
    /// it into an error.
    ///
    /// An Anthropic error body becomes [`AnthropicError::Api`]; anything else
    /// becomes [`AnthropicError::Network`] carrying the status and body text.
    pub async fn error_for_status(self) -> AnthropicResult<Self> {
        if self.is_success() {
            return Ok(self);
        }

        let status = self.status;
        let mut body = self.body;
        let mut collected = BytesMut::new();
        while let Some(chunk) = body.next().await {
            collected.extend_from_slice(&chunk?);
        }

        Err(match serde_json::from_slice::<ErrorBody>(&collected) {
            Ok(parsed) => AnthropicError::Api {
                error_type: parsed.error.error_type,
                message: parsed.error.message,
            },
            Err(_) => AnthropicError::Network {
                message: format!("HTTP {}: {}", status, String::from_utf8_lossy(&collected)),
            },
        })
    }

    /// Hand the body to a lifetime guard
    pub fn into_handle(self) -> StreamHandle {
        StreamHandle::new(self.body)
    }

    /// Decode the body as a Messages API event stream
    pub fn into_message_stream(self, config: &StreamConfig) -> MessageStream {
        MessageStream::with_config(self.into_handle(), config.clone())
    }

    /// Decode the body as JSONL batch results
    #[cfg(feature = "batches")]
    pub fn into_batch_results(self, config: &StreamConfig) -> BatchResultsStream {
        BatchResultsStream::batch_results(self.into_handle())
            .with_max_buffer_bytes(config.max_buffer_bytes)
    }
}

impl fmt::Debug for StreamingResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
