//! Basic dispatcher usage
//!
//! Demonstrates console output and the level threshold.
//!
//! Run with: cargo run --example basic_usage

use dispatch_logger::prelude::*;
use dispatch_logger::{debugf, errorf, infof, warnf};

fn main() -> Result<()> {
    println!("=== Dispatch Logger - Basic Usage Example ===\n");

    println!("1. Threshold Debug, everything is printed:");
    let logger = Dispatcher::builder()
        .level(LogLevel::Debug)
        .provider(ConsoleProvider::new())
        .start()?;
    debugf!(logger, "This is a debug message");
    infof!(logger, "This is an info message");
    warnf!(logger, "This is a warning message");
    errorf!(logger, "This is an error message");
    logger.stop()?;

    println!("\n2. Threshold Warn, debug and info are filtered:");
    let logger = Dispatcher::builder()
        .level(LogLevel::Warn)
        .provider(ConsoleProvider::new().with_colors(true))
        .start()?;
    debugf!(logger, "Debug message (hidden)");
    infof!(logger, "Info message (hidden)");
    warnf!(logger, "Warning message (visible)");
    errorf!(logger, "Error code: {}", 500);
    logger.stop()?;

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
