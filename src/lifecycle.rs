//! Process wiring: the two calls a host program makes
//!
//! ```no_run
//! use dispatch_logger::{core::LoggingConfig, infof, errorf};
//! use std::sync::Arc;
//!
//! fn main() -> dispatch_logger::Result<()> {
//!     let logger = Arc::new(dispatch_logger::init(&LoggingConfig::with_base_path("/www/log/blog"))?);
//!
//!     infof!(logger, "Hello, key is {:?}", "abc");
//!     errorf!(logger, "server error, err: {}", "address in use");
//!
//!     dispatch_logger::shutdown(&logger)
//! }
//! ```

use crate::core::{Dispatcher, LoggingConfig, Provider, Result};
use crate::providers::{ConsoleProvider, FileProvider};

/// Providers described by `config`, file first then console
pub fn build_providers(config: &LoggingConfig) -> Vec<Box<dyn Provider>> {
    let mut providers: Vec<Box<dyn Provider>> = Vec::new();
    if let Some(file) = &config.file {
        providers.push(Box::new(
            FileProvider::new(&file.base_path)
                .with_split(file.split)
                .with_buffer_limit(file.buffer_limit),
        ));
    }
    if config.console {
        providers.push(Box::new(ConsoleProvider::new()));
    }
    providers
}

/// Build a dispatcher from `config` and start it
///
/// Fails when the initial log file cannot be opened, before any record is
/// accepted.
pub fn init(config: &LoggingConfig) -> Result<Dispatcher> {
    config.validate()?;
    let dispatcher = Dispatcher::new(config.level, build_providers(config));
    dispatcher.start()?;
    Ok(dispatcher)
}

/// Flush and stop everything `init` started
pub fn shutdown(dispatcher: &Dispatcher) -> Result<()> {
    dispatcher.stop()
}
