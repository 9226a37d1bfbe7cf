//! Dispatcher implementation
//!
//! Producers hand records to a single worker thread over a zero-capacity
//! channel, so a logging call returns only once the worker has taken the
//! record. Flush and stop requests travel on their own channels and carry a
//! one-shot reply channel the caller blocks on. The worker waits on all three
//! with `select!` and handles exactly one event per iteration.

use super::{
    error::{LoggerError, Result},
    log_level::LogLevel,
    log_record::LogRecord,
    metrics::DispatcherMetrics,
    provider::Provider,
};
use crossbeam_channel::{bounded, select, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

/// Name of the dispatch worker thread
pub const WORKER_THREAD_NAME: &str = "log-dispatch";

type Reply = Sender<Result<()>>;

struct Channels {
    records: Sender<LogRecord>,
    flush: Sender<Reply>,
    stop: Sender<Reply>,
}

enum Lifecycle {
    Idle,
    Running(Channels),
    Stopped,
}

/// Fans leveled records out to an ordered list of providers on one worker thread.
///
/// # Example
///
/// ```
/// use dispatch_logger::prelude::*;
/// use dispatch_logger::providers::MemoryProvider;
///
/// let memory = MemoryProvider::new("memory");
/// let captured = memory.log();
///
/// let dispatcher = Dispatcher::builder()
///     .level(LogLevel::Info)
///     .provider(memory)
///     .build();
/// dispatcher.start()?;
///
/// dispatcher.debug("dropped by the threshold");
/// dispatcher.info("delivered");
/// dispatcher.stop()?;
///
/// assert_eq!(captured.messages(), vec!["delivered".to_string()]);
/// # Ok::<(), dispatch_logger::LoggerError>(())
/// ```
pub struct Dispatcher {
    level: LogLevel,
    providers: Mutex<Vec<Box<dyn Provider>>>,
    lifecycle: RwLock<Lifecycle>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    /// Description of the provider fault that halted the worker, if any
    fault: Arc<Mutex<Option<String>>>,
    metrics: Arc<DispatcherMetrics>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(level: LogLevel, providers: Vec<Box<dyn Provider>>) -> Self {
        Self {
            level,
            providers: Mutex::new(providers),
            lifecycle: RwLock::new(Lifecycle::Idle),
            worker: Mutex::new(None),
            fault: Arc::new(Mutex::new(None)),
            metrics: Arc::new(DispatcherMetrics::new()),
        }
    }

    /// Append a provider; only allowed before `start`
    pub fn add_provider(&mut self, provider: Box<dyn Provider>) -> Result<()> {
        match self.lifecycle.get_mut() {
            Lifecycle::Idle => {
                self.providers.get_mut().push(provider);
                Ok(())
            }
            Lifecycle::Running(_) => Err(LoggerError::AlreadyStarted),
            Lifecycle::Stopped => Err(LoggerError::Stopped),
        }
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// True between a successful `start` and `stop`, unless a provider fault
    /// has halted the worker
    pub fn is_running(&self) -> bool {
        matches!(*self.lifecycle.read(), Lifecycle::Running(_)) && self.fault.lock().is_none()
    }

    pub fn metrics(&self) -> &DispatcherMetrics {
        &self.metrics
    }

    /// Spawn the dispatch worker
    ///
    /// The worker calls `start` on every provider, in registration order,
    /// before it handles any record. This call returns once those hooks have
    /// completed.
    ///
    /// # Errors
    ///
    /// `AlreadyStarted` or `Stopped` when called more than once, an IO error
    /// if the worker thread cannot be spawned, or the first error returned by
    /// a provider's `start` hook. A failed start leaves the dispatcher stopped.
    pub fn start(&self) -> Result<()> {
        let mut lifecycle = self.lifecycle.write();
        match *lifecycle {
            Lifecycle::Idle => {}
            Lifecycle::Running(_) => return Err(LoggerError::AlreadyStarted),
            Lifecycle::Stopped => return Err(LoggerError::Stopped),
        }

        let (records_tx, records_rx) = bounded(0);
        let (flush_tx, flush_rx) = bounded(0);
        let (stop_tx, stop_rx) = bounded(0);

        let receivers = Receivers {
            records: records_rx,
            flush: flush_rx,
            stop: stop_rx,
        };
        let providers = ProviderSet {
            providers: std::mem::take(&mut *self.providers.lock()),
            fault: Arc::clone(&self.fault),
            metrics: Arc::clone(&self.metrics),
        };

        let (ready_tx, ready_rx) = bounded(1);

        let spawned = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_loop(receivers, providers, ready_tx));

        match spawned {
            Ok(handle) => {
                let started = ready_rx.recv().unwrap_or_else(|_| {
                    Err(LoggerError::worker("dispatch worker exited during start"))
                });
                if let Err(e) = started {
                    *lifecycle = Lifecycle::Stopped;
                    if handle.join().is_err() {
                        eprintln!("[LOGGER ERROR] Dispatch worker panicked during start");
                    }
                    return Err(e);
                }

                *self.worker.lock() = Some(handle);
                *lifecycle = Lifecycle::Running(Channels {
                    records: records_tx,
                    flush: flush_tx,
                    stop: stop_tx,
                });
                Ok(())
            }
            Err(e) => {
                *lifecycle = Lifecycle::Stopped;
                Err(LoggerError::io_operation(
                    "starting dispatcher",
                    "failed to spawn dispatch worker",
                    e,
                ))
            }
        }
    }

    /// Hand a record to the dispatch loop, blocking until it is accepted
    ///
    /// Records below the threshold return `Ok(())` without touching the loop.
    pub fn try_log(&self, level: LogLevel, message: impl Into<String>) -> Result<()> {
        if level < self.level {
            self.metrics.record_filtered();
            return Ok(());
        }

        let records = self.channel(|c| c.records.clone())?;
        records
            .send(LogRecord::new(level, message))
            .map_err(|_| self.disconnected())?;
        self.metrics.record_accepted();
        Ok(())
    }

    /// Like [`try_log`](Self::try_log), reporting failures on stderr
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if let Err(e) = self.try_log(level, message) {
            eprintln!("[LOGGER ERROR] {} record not delivered: {}", level, e);
        }
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Block until every provider has flushed
    ///
    /// Every record accepted before this call is delivered before the flush
    /// hooks run.
    pub fn flush(&self) -> Result<()> {
        let flush = self.channel(|c| c.flush.clone())?;
        self.request(&flush)
    }

    /// Flush, stop every provider, and join the worker
    ///
    /// The dispatcher rejects all further use afterwards.
    pub fn stop(&self) -> Result<()> {
        let stop = self.channel(|c| c.stop.clone())?;

        let flushed = self.flush();
        // A failed flush has already halted the worker.
        let stopped = if flushed.is_ok() {
            self.request(&stop)
        } else {
            Ok(())
        };
        drop(stop);

        *self.lifecycle.write() = Lifecycle::Stopped;
        let joined = self.join_worker();

        flushed.and(stopped).and(joined)
    }

    fn channel<T>(&self, pick: impl FnOnce(&Channels) -> T) -> Result<T> {
        match &*self.lifecycle.read() {
            Lifecycle::Running(channels) => Ok(pick(channels)),
            Lifecycle::Idle => Err(LoggerError::NotStarted),
            Lifecycle::Stopped => Err(self.disconnected()),
        }
    }

    fn request(&self, control: &Sender<Reply>) -> Result<()> {
        let (reply_tx, reply_rx) = bounded(1);
        control.send(reply_tx).map_err(|_| self.disconnected())?;
        reply_rx.recv().map_err(|_| self.disconnected())?
    }

    /// Error for a worker that is no longer listening
    fn disconnected(&self) -> LoggerError {
        match self.fault.lock().as_ref() {
            Some(reason) => LoggerError::halted(reason.clone()),
            None => LoggerError::Stopped,
        }
    }

    fn join_worker(&self) -> Result<()> {
        if let Some(handle) = self.worker.lock().take() {
            handle
                .join()
                .map_err(|_| LoggerError::worker("dispatch worker panicked"))?;
        }
        Ok(())
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        if !matches!(self.lifecycle.get_mut(), Lifecycle::Running(_)) {
            return;
        }
        if let Err(e) = self.stop() {
            eprintln!("[LOGGER ERROR] Failed to stop dispatcher on drop: {}", e);
        }
    }
}

struct Receivers {
    records: Receiver<LogRecord>,
    flush: Receiver<Reply>,
    stop: Receiver<Reply>,
}

/// The providers as owned by the worker thread
struct ProviderSet {
    providers: Vec<Box<dyn Provider>>,
    fault: Arc<Mutex<Option<String>>>,
    metrics: Arc<DispatcherMetrics>,
}

impl ProviderSet {
    /// Run one hook on every provider in order, stopping at the first failure
    fn each(
        &mut self,
        hook: &str,
        mut call: impl FnMut(&mut dyn Provider) -> Result<()>,
    ) -> Result<()> {
        for provider in self.providers.iter_mut() {
            if let Err(e) = guarded(provider.as_mut(), &mut call) {
                record_fault(&self.fault, provider.name(), hook, &e);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Run `stop` on every provider even if one fails; the first error wins
    fn stop_all(&mut self) -> Result<()> {
        let mut first_error = None;
        for provider in self.providers.iter_mut() {
            if let Err(e) = guarded(provider.as_mut(), &mut |p: &mut dyn Provider| p.stop()) {
                record_fault(&self.fault, provider.name(), "stop", &e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

fn record_fault(fault: &Mutex<Option<String>>, name: &str, hook: &str, error: &LoggerError) {
    let reason = format!("provider '{}' failed during {}: {}", name, hook, error);
    eprintln!("[LOGGER CRITICAL] {}. Dispatch loop halted.", reason);
    fault.lock().get_or_insert(reason);
}

/// Call a provider hook, turning a panic into an error
fn guarded(
    provider: &mut dyn Provider,
    call: &mut impl FnMut(&mut dyn Provider) -> Result<()>,
) -> Result<()> {
    match catch_unwind(AssertUnwindSafe(|| call(&mut *provider))) {
        Ok(result) => result,
        Err(payload) => Err(LoggerError::worker(format!(
            "provider panicked: {}",
            panic_message(payload.as_ref())
        ))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn run_loop(receivers: Receivers, mut providers: ProviderSet, ready: Reply) {
    let started = providers.each("start", |p| p.start());
    let failed = started.is_err();
    let _ = ready.send(started);
    if failed {
        return;
    }

    loop {
        select! {
            recv(receivers.records) -> msg => match msg {
                Ok(record) => {
                    if providers.each("write", |p| p.write(&record)).is_err() {
                        return;
                    }
                    providers.metrics.record_delivered();
                }
                Err(_) => break,
            },
            recv(receivers.flush) -> msg => match msg {
                Ok(reply) => {
                    let result = providers.each("flush", |p| p.flush());
                    let halted = result.is_err();
                    if !halted {
                        providers.metrics.record_flush();
                    }
                    let _ = reply.send(result);
                    if halted {
                        return;
                    }
                }
                Err(_) => break,
            },
            recv(receivers.stop) -> msg => match msg {
                Ok(reply) => {
                    let _ = reply.send(providers.stop_all());
                    return;
                }
                Err(_) => break,
            },
        }
    }

    // Every sender is gone without a stop request.
    if let Err(e) = providers.each("flush", |p| p.flush()) {
        eprintln!("[LOGGER WARNING] Flush on dispatcher teardown failed: {}", e);
    }
    let _ = providers.stop_all();
}

/// Builder for constructing a [`Dispatcher`] with a fluent API
///
/// # Example
/// ```
/// use dispatch_logger::prelude::*;
///
/// let dispatcher = Dispatcher::builder()
///     .level(LogLevel::Warn)
///     .provider(ConsoleProvider::new())
///     .build();
/// assert_eq!(dispatcher.level(), LogLevel::Warn);
/// ```
pub struct DispatcherBuilder {
    level: LogLevel,
    providers: Vec<Box<dyn Provider>>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            level: LogLevel::default(),
            providers: Vec::new(),
        }
    }

    /// Set the level threshold
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Append a provider; providers receive records in the order added
    #[must_use = "builder methods return a new value"]
    pub fn provider<P: Provider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn boxed_provider(mut self, provider: Box<dyn Provider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn build(self) -> Dispatcher {
        Dispatcher::new(self.level, self.providers)
    }

    /// Build and start in one step
    pub fn start(self) -> Result<Dispatcher> {
        let dispatcher = self.build();
        dispatcher.start()?;
        Ok(dispatcher)
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Create a builder for Dispatcher
    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::memory::{MemoryProvider, ProviderEvent};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingProvider {
        fail_on_write: usize,
        writes: Arc<AtomicUsize>,
    }

    impl Provider for FailingProvider {
        fn write(&mut self, _record: &LogRecord) -> Result<()> {
            let n = self.writes.fetch_add(1, Ordering::SeqCst) + 1;
            if n >= self.fail_on_write {
                return Err(LoggerError::file_provider("/dev/full", "No space left on device"));
            }
            Ok(())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct UnopenableProvider;

    impl Provider for UnopenableProvider {
        fn start(&mut self) -> Result<()> {
            Err(LoggerError::file_provider("/www/log/blog", "Permission denied"))
        }

        fn write(&mut self, _record: &LogRecord) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "unopenable"
        }
    }

    struct PanickingProvider;

    impl Provider for PanickingProvider {
        fn write(&mut self, _record: &LogRecord) -> Result<()> {
            panic!("no open file handle");
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    #[test]
    fn test_threshold_filters_below_level() {
        let memory = MemoryProvider::new("memory");
        let captured = memory.log();
        let dispatcher = Dispatcher::builder()
            .level(LogLevel::Info)
            .provider(memory)
            .start()
            .unwrap();

        dispatcher.debug("x");
        dispatcher.info("y");
        dispatcher.flush().unwrap();

        assert_eq!(captured.messages(), vec!["y".to_string()]);
        assert_eq!(dispatcher.metrics().filtered_count(), 1);
        assert_eq!(dispatcher.metrics().accepted_count(), 1);
        dispatcher.stop().unwrap();
    }

    #[test]
    fn test_lifecycle_hooks_in_order() {
        let memory = MemoryProvider::new("memory");
        let captured = memory.log();
        let dispatcher = Dispatcher::new(LogLevel::Debug, vec![Box::new(memory)]);

        dispatcher.start().unwrap();
        dispatcher.warn("w");
        dispatcher.stop().unwrap();

        let events = captured.events();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], ProviderEvent::Start);
        assert!(matches!(&events[1], ProviderEvent::Write(r) if r.message() == "w"));
        assert_eq!(events[2], ProviderEvent::Flush);
        assert_eq!(events[3], ProviderEvent::Stop);
    }

    #[test]
    fn test_use_before_start() {
        let dispatcher = Dispatcher::builder().build();
        assert!(matches!(
            dispatcher.try_log(LogLevel::Error, "early"),
            Err(LoggerError::NotStarted)
        ));
        assert!(matches!(dispatcher.flush(), Err(LoggerError::NotStarted)));
        assert!(matches!(dispatcher.stop(), Err(LoggerError::NotStarted)));
    }

    #[test]
    fn test_use_after_stop() {
        let dispatcher = Dispatcher::builder().start().unwrap();
        dispatcher.stop().unwrap();

        assert!(!dispatcher.is_running());
        assert!(matches!(
            dispatcher.try_log(LogLevel::Info, "late"),
            Err(LoggerError::Stopped)
        ));
        assert!(matches!(dispatcher.flush(), Err(LoggerError::Stopped)));
        assert!(matches!(dispatcher.start(), Err(LoggerError::Stopped)));
    }

    #[test]
    fn test_double_start_rejected() {
        let dispatcher = Dispatcher::builder().start().unwrap();
        assert!(matches!(dispatcher.start(), Err(LoggerError::AlreadyStarted)));
        dispatcher.stop().unwrap();
    }

    #[test]
    fn test_add_provider_after_start_rejected() {
        let mut dispatcher = Dispatcher::builder().build();
        dispatcher
            .add_provider(Box::new(MemoryProvider::new("before")))
            .unwrap();
        dispatcher.start().unwrap();

        let result = dispatcher.add_provider(Box::new(MemoryProvider::new("after")));
        assert!(matches!(result, Err(LoggerError::AlreadyStarted)));
        dispatcher.stop().unwrap();
    }

    #[test]
    fn test_provider_fault_halts_pipeline() {
        let memory = MemoryProvider::new("memory");
        let captured = memory.log();
        let writes = Arc::new(AtomicUsize::new(0));
        let dispatcher = Dispatcher::builder()
            .provider(FailingProvider {
                fail_on_write: 2,
                writes: Arc::clone(&writes),
            })
            .provider(memory)
            .start()
            .unwrap();

        dispatcher.try_log(LogLevel::Info, "first").unwrap();
        // The second record is accepted, then the first provider fails on it.
        dispatcher.try_log(LogLevel::Info, "second").unwrap();

        let err = dispatcher.flush().unwrap_err();
        assert!(matches!(err, LoggerError::Halted { .. }));
        assert!(err.to_string().contains("failing"));
        assert!(!dispatcher.is_running());

        // The second provider never saw the record that failed.
        assert_eq!(captured.messages(), vec!["first".to_string()]);

        assert!(matches!(
            dispatcher.try_log(LogLevel::Info, "third"),
            Err(LoggerError::Halted { .. })
        ));
        assert!(dispatcher.stop().is_err());
        assert_eq!(writes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_start_fault_returned_by_start() {
        let memory = MemoryProvider::new("memory");
        let captured = memory.log();
        let dispatcher = Dispatcher::builder()
            .provider(UnopenableProvider)
            .provider(memory)
            .build();

        let err = dispatcher.start().unwrap_err();
        assert!(matches!(err, LoggerError::FileProviderError { .. }));
        assert!(err.to_string().contains("Permission denied"));
        assert!(!dispatcher.is_running());

        // The provider after the failing one was never started.
        assert!(captured.events().is_empty());
        assert!(matches!(
            dispatcher.try_log(LogLevel::Info, "lost"),
            Err(LoggerError::Halted { .. })
        ));
        assert!(matches!(dispatcher.start(), Err(LoggerError::Stopped)));
        assert!(matches!(dispatcher.stop(), Err(LoggerError::Halted { .. })));
    }

    #[test]
    fn test_provider_panic_reported_as_fault() {
        let dispatcher = Dispatcher::builder()
            .provider(PanickingProvider)
            .start()
            .unwrap();

        dispatcher.try_log(LogLevel::Info, "boom").unwrap();
        let err = dispatcher.flush().unwrap_err();
        assert!(err.to_string().contains("no open file handle"));
    }

    #[test]
    fn test_drop_stops_providers() {
        let memory = MemoryProvider::new("memory");
        let captured = memory.log();
        {
            let dispatcher = Dispatcher::builder().provider(memory).start().unwrap();
            dispatcher.info("kept");
        }
        let events = captured.events();
        assert_eq!(events.last(), Some(&ProviderEvent::Stop));
        assert_eq!(captured.messages(), vec!["kept".to_string()]);
    }
}
