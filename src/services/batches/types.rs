//! Type definitions for Message Batches results

use crate::services::messages::{ApiErrorDetail, Message};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One line of a batch results file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchResult {
    /// The custom_id from the request
    pub custom_id: String,
    /// Outcome of the request
    pub result: BatchResultType,
}

/// Outcome of a single batch request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BatchResultType {
    /// The request produced a message
    Succeeded {
        /// The completed message
        message: Message,
    },
    /// The request failed
    Errored {
        /// Error envelope
        error: BatchError,
    },
    /// The batch was canceled before the request ran
    Canceled,
    /// The batch expired before the request ran
    Expired,
}

/// Error envelope of an errored batch request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchError {
    /// Envelope type, normally `error`
    #[serde(rename = "type", default)]
    pub envelope_type: String,
    /// Error details
    pub error: ApiErrorDetail,
}

impl BatchResult {
    /// Wire name of the outcome
    pub fn result_type(&self) -> &'static str {
        match self.result {
            BatchResultType::Succeeded { .. } => "succeeded",
            BatchResultType::Errored { .. } => "errored",
            BatchResultType::Canceled => "canceled",
            BatchResultType::Expired => "expired",
        }
    }

    /// Returns true if the request succeeded
    pub fn is_succeeded(&self) -> bool {
        matches!(self.result, BatchResultType::Succeeded { .. })
    }

    /// The message, for a succeeded request
    pub fn message(&self) -> Option<&Message> {
        match &self.result {
            BatchResultType::Succeeded { message } => Some(message),
            _ => None,
        }
    }

    /// Consume the result, keeping only a succeeded message
    pub fn into_message(self) -> Option<Message> {
        match self.result {
            BatchResultType::Succeeded { message } => Some(message),
            _ => None,
        }
    }

    /// The error details, for an errored request
    pub fn error(&self) -> Option<&ApiErrorDetail> {
        match &self.result {
            BatchResultType::Errored { error } => Some(&error.error),
            _ => None,
        }
    }
}

/// Every line of a results file, gathered
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResults {
    /// Lines that decoded as [`BatchResult`]
    pub results: Vec<BatchResult>,
    /// Lines that were valid JSON but not a recognised result
    pub unrecognized: Vec<Value>,
}

impl BatchResults {
    /// Get results that succeeded
    pub fn succeeded(&self) -> Vec<&BatchResult> {
        self.results.iter().filter(|r| r.is_succeeded()).collect()
    }

    /// Get results that errored
    pub fn errored(&self) -> Vec<&BatchResult> {
        self.results.iter().filter(|r| r.error().is_some()).collect()
    }
}
