//! Response decoders for the Anthropic API services

pub mod messages;

#[cfg(feature = "batches")]
pub mod batches;
