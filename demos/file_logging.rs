//! File logging example
//!
//! Wires a rotating file provider and the console the way a server process
//! would: `init` at startup, the logging macros while serving, `shutdown` on
//! exit.
//!
//! Run with: cargo run --example file_logging

use dispatch_logger::prelude::*;
use dispatch_logger::{errorf, infof, warnf};
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Dispatch Logger - File Logging Example ===\n");

    let config = LoggingConfig::with_base_path("logs/blog");
    let logger = Arc::new(dispatch_logger::init(&config)?);

    println!("1. Logging to both file and console:");
    infof!(logger, "Application started");
    infof!(logger, "Listening on :{}", 8080);

    println!("\n2. Logging from request threads:");
    let workers: Vec<_> = ["alpha", "beta", "gamma"]
        .into_iter()
        .map(|key| {
            let logger = Arc::clone(&logger);
            std::thread::spawn(move || {
                infof!(logger, "Hello, key is {:?}", key);
                if key == "beta" {
                    warnf!(logger, "Request for {:?} took longer than expected", key);
                }
            })
        })
        .collect();
    for worker in workers {
        if worker.join().is_err() {
            errorf!(logger, "request thread panicked");
        }
    }

    dispatch_logger::shutdown(&logger)?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'logs/blog.<yyyy-mm-dd-hh>.log' for the file output");

    Ok(())
}
