//! Logging configuration and utilities.
//!
//! Decoders log through `tracing`; installing a subscriber is left to the
//! application, with [`LoggingConfig::init`] as a ready-made option.

use crate::errors::{AnthropicError, AnthropicResult};
use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Target used by every event this crate emits
pub const LOG_TARGET: &str = "anthropic_streaming";

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// The minimum log level to capture
    pub level: LogLevel,
    /// The output format for log messages
    pub format: LogFormat,
    /// Whether to include the event target in log output
    pub include_target: bool,
    /// Whether to include file and line number in log output
    pub include_file_line: bool,
    /// Extra `EnvFilter` directive, e.g. `anthropic_streaming=trace`
    pub directive: Option<String>,
}

/// Log level enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Trace-level logging (every decoded event when tracing is enabled)
    Trace,
    /// Debug-level logging (source releases)
    Debug,
    /// Info-level logging
    Info,
    /// Warning-level logging (decode and protocol failures)
    Warn,
    /// Error-level logging
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl From<LogLevel> for tracing::level_filters::LevelFilter {
    fn from(level: LogLevel) -> Self {
        Level::from(level).into()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors (for development)
    Pretty,
    /// JSON format (for structured logging in production)
    Json,
    /// Compact single-line format
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            include_target: true,
            include_file_line: false,
            directive: None,
        }
    }
}

impl LoggingConfig {
    /// Creates a new logging configuration with default settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use integrations_anthropic_streaming::observability::{LogFormat, LogLevel, LoggingConfig};
    ///
    /// let config = LoggingConfig::new();
    /// assert_eq!(config.level, LogLevel::Info);
    /// assert_eq!(config.format, LogFormat::Pretty);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the log level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the log format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets whether to include the event target.
    pub fn with_target(mut self, include: bool) -> Self {
        self.include_target = include;
        self
    }

    /// Sets whether to include file and line number.
    pub fn with_file_line(mut self, include: bool) -> Self {
        self.include_file_line = include;
        self
    }

    /// Adds an `EnvFilter` directive on top of `RUST_LOG`.
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directive = Some(directive.into());
        self
    }

    fn env_filter(&self) -> AnthropicResult<EnvFilter> {
        let level: Directive = Level::from(self.level).into();
        let mut filter = EnvFilter::from_default_env().add_directive(level);
        if let Some(directive) = &self.directive {
            let parsed: Directive = directive.parse().map_err(|e| AnthropicError::Configuration {
                message: format!("Invalid log directive '{}': {}", directive, e),
            })?;
            filter = filter.add_directive(parsed);
        }
        Ok(filter)
    }

    /// Install a global subscriber with this configuration.
    ///
    /// This should be called once at application startup.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use integrations_anthropic_streaming::observability::{LogLevel, LoggingConfig};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// LoggingConfig::new()
    ///     .with_level(LogLevel::Debug)
    ///     .with_directive("anthropic_streaming=trace")
    ///     .init()?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid directive or when a
    /// global subscriber is already installed.
    pub fn init(self) -> AnthropicResult<()> {
        let filter = self.env_filter()?;
        let registry = tracing_subscriber::registry().with(filter);

        let installed = match self.format {
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .with_ansi(true)
                        .with_target(self.include_target)
                        .with_file(self.include_file_line)
                        .with_line_number(self.include_file_line),
                )
                .try_init(),
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(self.include_target)
                        .with_file(self.include_file_line)
                        .with_line_number(self.include_file_line),
                )
                .try_init(),
            LogFormat::Compact => registry
                .with(fmt::layer().compact().with_target(self.include_target))
                .try_init(),
        };

        installed.map_err(|e| AnthropicError::Configuration {
            message: format!("Failed to install log subscriber: {}", e),
        })
    }
}

/// Log a decoded stream event at trace level.
pub fn log_stream_event(event_type: &str, index: Option<usize>) {
    tracing::trace!(
        target: LOG_TARGET,
        event_type = event_type,
        index = index,
        "Stream event"
    );
}

/// Log the release of a byte source.
///
/// # Examples
///
/// ```
/// use integrations_anthropic_streaming::observability::log_release;
///
/// log_release("exhausted");
/// ```
pub fn log_release(reason: &str) {
    tracing::debug!(target: LOG_TARGET, reason = reason, "Byte source released");
}

/// Log a record that failed to decode, or a stream that failed mid-way.
pub fn log_decode_error(error: &AnthropicError, context: &str) {
    tracing::warn!(
        target: LOG_TARGET,
        error = %error,
        context = context,
        "Stream decode failed"
    );
}
