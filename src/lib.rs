//! # Dispatch Logger
//!
//! Asynchronous, multi-destination logging with time-rotated log files.
//!
//! ## Features
//!
//! - **Single dispatch worker**: every provider runs on one background thread
//! - **Backpressure**: a logging call returns once the worker has taken the record
//! - **Ordered delivery**: records reach providers in the order they were issued
//! - **Rotating files**: one file per hour or per day, named `<base>.<window>.log`
//! - **Explicit lifecycle**: `start`, `flush` and `stop` with blocking completion

pub mod core;
mod lifecycle;
pub mod macros;
pub mod providers;

pub mod prelude {
    pub use crate::core::{
        Clock, Dispatcher, DispatcherBuilder, DispatcherMetrics, FileConfig, LogLevel, LogRecord,
        LoggerError, LoggingConfig, ManualClock, Provider, Result, SystemClock,
    };
    pub use crate::providers::{ConsoleProvider, FileProvider, SplitBy};
}

pub use crate::core::{
    Clock, Dispatcher, DispatcherBuilder, DispatcherMetrics, FileConfig, LogLevel, LogRecord,
    LoggerError, LoggingConfig, ManualClock, Provider, Result, SystemClock,
};
pub use lifecycle::{build_providers, init, shutdown};
pub use providers::{ConsoleProvider, FileProvider, SplitBy};
