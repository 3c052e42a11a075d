//! Observability for the streaming decoders.
//!
//! Everything is emitted through `tracing` under the [`LOG_TARGET`] target:
//! source releases at debug, decode and protocol failures at warn, and every
//! decoded event at trace when `StreamConfig::trace_events` is set.
//!
//! ```rust,no_run
//! use integrations_anthropic_streaming::observability::{LogFormat, LogLevel, LoggingConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! LoggingConfig::new()
//!     .with_level(LogLevel::Info)
//!     .with_format(LogFormat::Json)
//!     .init()?;
//! # Ok(())
//! # }
//! ```

mod logging;

pub use logging::*;
