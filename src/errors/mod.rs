//! Error types for the streaming decoders.
//!
//! Every fatal condition surfaces as an [`AnthropicError`] at the point in
//! the pull sequence where the offending record is reached.

mod error;

pub use error::{AnthropicError, AnthropicResult};
