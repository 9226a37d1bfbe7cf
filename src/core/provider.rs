//! Provider trait for log output destinations

use super::{error::Result, log_record::LogRecord};

/// A log sink driven by the dispatch loop.
///
/// Every hook runs on the single dispatch thread, in registration order, so
/// implementations need no internal locking. Returning `Err` from any hook is
/// a fatal fault: the dispatch loop halts and reports it.
pub trait Provider: Send {
    /// Called once on the dispatch thread before the first event.
    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    fn write(&mut self, record: &LogRecord) -> Result<()>;

    /// Make everything written so far durable (or visible).
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called once when the dispatcher stops; no further hooks follow.
    fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
