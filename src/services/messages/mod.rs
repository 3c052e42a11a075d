//! Messages API streaming
//!
//! Turns a `text/event-stream` response body into typed [`StreamEvent`]s and
//! aggregates them into the final [`Message`].

mod accumulator;
mod stream;
mod types;


pub use accumulator::{AccumulatorState, MessageAccumulator};
pub use stream::MessageStream;
pub use types::{
    ApiErrorDetail, ContentBlock, ContentDelta, Message, MessageDelta, PartialMessage, Role,
    StopReason, StreamEvent, Usage, UsageDelta, KNOWN_EVENT_TYPES,
};
