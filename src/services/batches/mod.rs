//! Message Batches results
//!
//! Decoding of the JSONL results file returned for a finished batch.

mod stream;
mod types;


pub use stream::BatchResultsStream;
pub use types::{BatchError, BatchResult, BatchResultType, BatchResults};
