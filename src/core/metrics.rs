//! Dispatcher metrics for observability
//!
//! Counters are updated from producer threads (accepted, filtered) and from
//! the dispatch thread (delivered, flushes).

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing what a dispatcher has done so far
///
/// # Example
///
/// ```
/// use dispatch_logger::DispatcherMetrics;
///
/// let metrics = DispatcherMetrics::new();
/// metrics.record_accepted();
/// metrics.record_filtered();
///
/// assert_eq!(metrics.accepted_count(), 1);
/// assert_eq!(metrics.filtered_count(), 1);
/// ```
#[derive(Debug)]
pub struct DispatcherMetrics {
    /// Records handed to the dispatch loop
    accepted: AtomicU64,

    /// Records discarded by the level threshold
    filtered: AtomicU64,

    /// Records written to every provider
    delivered: AtomicU64,

    /// Completed flush requests
    flushes: AtomicU64,
}

impl DispatcherMetrics {
    pub const fn new() -> Self {
        Self {
            accepted: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            flushes: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn accepted_count(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered_count(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delivered_count(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flush_count(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_accepted(&self) -> u64 {
        self.accepted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_flush(&self) -> u64 {
        self.flushes.fetch_add(1, Ordering::Relaxed)
    }

    /// Records accepted but not yet written to every provider
    pub fn in_flight(&self) -> u64 {
        self.accepted_count().saturating_sub(self.delivered_count())
    }
}

impl Default for DispatcherMetrics {
    fn default() -> Self {
        Self::new()
    }
}
