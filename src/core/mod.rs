//! Core logger types and traits

pub mod clock;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod format;
pub mod log_level;
pub mod log_record;
pub mod metrics;
pub mod provider;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{FileConfig, LoggingConfig};
pub use dispatcher::{Dispatcher, DispatcherBuilder, WORKER_THREAD_NAME};
pub use error::{LoggerError, Result};
pub use format::{format_line, format_record, format_timestamp, TIMESTAMP_PATTERN};
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use metrics::DispatcherMetrics;
pub use provider::Provider;
