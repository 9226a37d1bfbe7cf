//! Log record structure

use super::log_level::LogLevel;
use chrono::{DateTime, Local};

/// A single logging call, created by a producer and consumed once by the dispatch loop.
///
/// The message is kept verbatim; embedded newlines are not escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    level: LogLevel,
    message: String,
    timestamp: DateTime<Local>,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self::with_timestamp(level, message, Local::now())
    }

    pub fn with_timestamp(
        level: LogLevel,
        message: impl Into<String>,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp,
        }
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        self.level
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn timestamp(&self) -> &DateTime<Local> {
        &self.timestamp
    }
}
