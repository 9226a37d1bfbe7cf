//! Logging macros with `format!`-style arguments.
//!
//! Each macro formats its arguments and hands the result to the dispatcher,
//! blocking until the dispatch loop accepts it. Records below the threshold
//! are discarded before anything is sent.
//!
//! # Examples
//!
//! ```
//! use dispatch_logger::prelude::*;
//! use dispatch_logger::infof;
//!
//! let logger = Dispatcher::builder().start()?;
//!
//! infof!(logger, "Server started");
//! let port = 8080;
//! infof!(logger, "Server listening on port {}", port);
//!
//! logger.stop()?;
//! # Ok::<(), dispatch_logger::LoggerError>(())
//! ```

/// Log at an explicit level.
///
/// # Examples
///
/// ```
/// # use dispatch_logger::prelude::*;
/// # let logger = Dispatcher::builder().start().unwrap();
/// use dispatch_logger::logf;
/// logf!(logger, LogLevel::Info, "Simple message");
/// logf!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! logf {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use dispatch_logger::prelude::*;
/// # let logger = Dispatcher::builder().start().unwrap();
/// use dispatch_logger::debugf;
/// debugf!(logger, "test{}", 1);
/// ```
#[macro_export]
macro_rules! debugf {
    ($logger:expr, $($arg:tt)+) => {
        $crate::logf!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use dispatch_logger::prelude::*;
/// # let logger = Dispatcher::builder().start().unwrap();
/// use dispatch_logger::infof;
/// infof!(logger, "hello {}", 1);
/// ```
#[macro_export]
macro_rules! infof {
    ($logger:expr, $($arg:tt)+) => {
        $crate::logf!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warnf {
    ($logger:expr, $($arg:tt)+) => {
        $crate::logf!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use dispatch_logger::prelude::*;
/// # let logger = Dispatcher::builder().start().unwrap();
/// use dispatch_logger::errorf;
/// errorf!(logger, "server error, err: {}", "address in use");
/// ```
#[macro_export]
macro_rules! errorf {
    ($logger:expr, $($arg:tt)+) => {
        $crate::logf!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}
