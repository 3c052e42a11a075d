//! Streaming support for batch results
//!
//! A results file is JSONL: one [`BatchResult`] per line. Lines are decoded
//! one at a time, so large files never have to fit in memory.

use super::types::{BatchResult, BatchResults};
use crate::errors::AnthropicResult;
use crate::services::messages::Message;
use crate::streaming::{JsonlRecord, JsonlStream, StreamHandle};
use futures::{future, Stream, StreamExt};

/// JSONL stream of batch results.
///
/// Lines that are valid JSON but do not match [`BatchResult`] come through
/// as [`JsonlRecord::Raw`].
///
/// # Example
///
/// ```rust,no_run
/// use futures::StreamExt;
/// use integrations_anthropic_streaming::{BatchResultsStream, StreamConfig, StreamingResponse};
///
/// # async fn run(response: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
/// let response = StreamingResponse::from_reqwest(response).error_for_status().await?;
/// let mut stream = response.into_batch_results(&StreamConfig::default());
/// while let Some(record) = stream.next().await {
///     if let Some(result) = record?.typed() {
///         println!("{}: {}", result.custom_id, result.result_type());
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub type BatchResultsStream = JsonlStream<BatchResult>;

impl JsonlStream<BatchResult> {
    /// Decode batch results from a byte source
    pub fn batch_results(source: StreamHandle) -> Self {
        Self::typed(source)
    }

    /// Gather every line, stopping at the first error
    pub async fn collect_results(self) -> AnthropicResult<BatchResults> {
        let mut gathered = BatchResults::default();

        for record in self.collect().await? {
            match record {
                JsonlRecord::Typed(result) => gathered.results.push(result),
                JsonlRecord::Raw(value) => gathered.unrecognized.push(value),
            }
        }

        Ok(gathered)
    }

    /// Only the messages of succeeded requests, in file order
    pub fn succeeded_messages(self) -> impl Stream<Item = AnthropicResult<Message>> + Send {
        self.filter_map(|record| {
            future::ready(match record {
                Ok(record) => record.typed().and_then(BatchResult::into_message).map(Ok),
                Err(e) => Some(Err(e)),
            })
        })
    }
}
