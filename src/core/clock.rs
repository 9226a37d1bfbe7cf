//! Wall-clock sources used for rotation decisions

use chrono::{DateTime, Duration, Local};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Source of the current local time
pub trait Clock: Send + fmt::Debug {
    fn now(&self) -> DateTime<Local>;
}

/// The system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to
///
/// Clones share the same instant, so a test can keep one handle and give
/// another to a provider running on the dispatch thread.
///
/// # Example
///
/// ```
/// use dispatch_logger::core::{Clock, ManualClock};
/// use chrono::{Duration, Local, TimeZone};
///
/// let start = Local.with_ymd_and_hms(2024, 5, 1, 13, 59, 59).unwrap();
/// let clock = ManualClock::new(start);
/// clock.advance(Duration::seconds(1));
/// assert_eq!(clock.now(), start + Duration::seconds(1));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Local>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, instant: DateTime<Local>) {
        *self.now.lock() = instant;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock()
    }
}
