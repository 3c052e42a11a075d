//! Aggregation of stream events into a single [`Message`]

use super::types::{ContentBlock, ContentDelta, Message, StreamEvent};
use crate::errors::{AnthropicError, AnthropicResult};
use serde_json::Value;

/// Lifecycle of a streamed message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccumulatorState {
    /// No `message_start` seen yet
    Empty,
    /// Between `message_start` and `message_stop`
    Open,
    /// `message_stop` applied; the message is final
    Closed,
}

/// Builds a [`Message`] from the ordered events of one stream.
///
/// Ordering violations are errors: a partially built message is never
/// handed out as if it were complete.
#[derive(Debug, Clone)]
pub struct MessageAccumulator {
    state: AccumulatorState,
    message: Option<Message>,
    // Raw `input_json_delta` fragments, one buffer per content block.
    tool_inputs: Vec<String>,
}

impl Default for MessageAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self {
            state: AccumulatorState::Empty,
            message: None,
            tool_inputs: Vec::new(),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> AccumulatorState {
        self.state
    }

    /// The message as built so far. Tool inputs stay unparsed until
    /// `message_stop`.
    pub fn snapshot(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    /// The final message, once `message_stop` has been applied
    pub fn finish(&self) -> AnthropicResult<Message> {
        match (self.state, &self.message) {
            (AccumulatorState::Closed, Some(message)) => Ok(message.clone()),
            (AccumulatorState::Open, _) => Err(AnthropicError::protocol(
                "stream ended before message_stop",
            )),
            _ => Err(AnthropicError::protocol("no message_start received")),
        }
    }

    /// Apply one event
    pub fn apply(&mut self, event: &StreamEvent) -> AnthropicResult<()> {
        match event {
            StreamEvent::ContentBlockStop { .. }
            | StreamEvent::Ping
            | StreamEvent::Unknown { .. } => Ok(()),
            StreamEvent::MessageStart { message } => {
                if self.state != AccumulatorState::Empty {
                    return Err(AnthropicError::protocol(
                        "message_start received after the message was started",
                    ));
                }
                let message: Message = message.clone().into();
                self.tool_inputs = vec![String::new(); message.content.len()];
                self.message = Some(message);
                self.state = AccumulatorState::Open;
                Ok(())
            }
            StreamEvent::ContentBlockStart {
                index,
                content_block,
            } => {
                let message = open_message(self.state, &mut self.message, event)?;
                if *index != message.content.len() {
                    return Err(AnthropicError::protocol(format!(
                        "content_block_start index {} out of order, expected {}",
                        index,
                        message.content.len()
                    )));
                }
                message.content.push(content_block.clone());
                self.tool_inputs.push(String::new());
                Ok(())
            }
            StreamEvent::ContentBlockDelta { index, delta } => {
                let message = open_message(self.state, &mut self.message, event)?;
                let block = message.content.get_mut(*index).ok_or_else(|| {
                    AnthropicError::protocol(format!(
                        "content_block_delta for unknown block {}",
                        index
                    ))
                })?;
                apply_delta(block, delta, &mut self.tool_inputs[*index], *index)
            }
            StreamEvent::MessageDelta { delta, usage } => {
                let message = open_message(self.state, &mut self.message, event)?;
                if let Some(reason) = delta.stop_reason {
                    message.stop_reason = Some(reason);
                }
                if let Some(sequence) = &delta.stop_sequence {
                    message.stop_sequence = Some(sequence.clone());
                }
                message.usage.apply_delta(usage);
                Ok(())
            }
            StreamEvent::MessageStop => {
                let message = open_message(self.state, &mut self.message, event)?;
                for (block, buffer) in message.content.iter_mut().zip(&self.tool_inputs) {
                    if let ContentBlock::ToolUse { input, .. } = block {
                        if !buffer.is_empty() {
                            *input = serde_json::from_str::<Value>(buffer)
                                .map_err(|e| AnthropicError::decode(e, buffer))?;
                        }
                    }
                }
                self.tool_inputs.clear();
                self.state = AccumulatorState::Closed;
                Ok(())
            }
        }
    }
}

fn open_message<'a>(
    state: AccumulatorState,
    message: &'a mut Option<Message>,
    event: &StreamEvent,
) -> AnthropicResult<&'a mut Message> {
    let position = match (state, message.as_mut()) {
        (AccumulatorState::Open, Some(message)) => return Ok(message),
        (AccumulatorState::Closed, _) => "after message_stop",
        _ => "before message_start",
    };
    Err(AnthropicError::protocol(format!(
        "{} received {}",
        event.event_type(),
        position
    )))
}

fn apply_delta(
    block: &mut ContentBlock,
    delta: &ContentDelta,
    tool_input: &mut String,
    index: usize,
) -> AnthropicResult<()> {
    match (block, delta) {
        (_, ContentDelta::Unsupported) | (ContentBlock::Unsupported, _) => {}
        (ContentBlock::Text { text }, ContentDelta::TextDelta { text: fragment }) => {
            text.push_str(fragment);
        }
        (ContentBlock::ToolUse { .. }, ContentDelta::InputJsonDelta { partial_json }) => {
            tool_input.push_str(partial_json);
        }
        (ContentBlock::Thinking { thinking, .. }, ContentDelta::ThinkingDelta { thinking: fragment }) => {
            thinking.push_str(fragment);
        }
        (ContentBlock::Thinking { signature, .. }, ContentDelta::SignatureDelta { signature: value }) => {
            *signature = value.clone();
        }
        (block, delta) => {
            return Err(AnthropicError::protocol(format!(
                "{} does not apply to {} block {}",
                delta_kind(delta),
                block.kind(),
                index
            )));
        }
    }
    Ok(())
}

fn delta_kind(delta: &ContentDelta) -> &'static str {
    match delta {
        ContentDelta::TextDelta { .. } => "text_delta",
        ContentDelta::InputJsonDelta { .. } => "input_json_delta",
        ContentDelta::ThinkingDelta { .. } => "thinking_delta",
        ContentDelta::SignatureDelta { .. } => "signature_delta",
        ContentDelta::Unsupported => "unsupported",
    }
}
