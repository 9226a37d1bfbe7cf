//! In-memory provider that captures every hook call

use crate::core::{format_record, LogRecord, Provider, Result};
use parking_lot::Mutex;
use std::sync::Arc;

/// One hook invocation observed by a [`MemoryProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    Start,
    Write(LogRecord),
    Flush,
    Stop,
}

/// Shared view of what a [`MemoryProvider`] has captured
///
/// The provider itself moves onto the dispatch thread; keep a `MemoryLog`
/// to inspect it from elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    events: Arc<Mutex<Vec<ProviderEvent>>>,
}

impl MemoryLog {
    pub fn events(&self) -> Vec<ProviderEvent> {
        self.events.lock().clone()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                ProviderEvent::Write(record) => Some(record.clone()),
                _ => None,
            })
            .collect()
    }

    /// Raw messages of every written record, in delivery order
    pub fn messages(&self) -> Vec<String> {
        self.records()
            .iter()
            .map(|record| record.message().to_string())
            .collect()
    }

    /// Formatted lines, newline included
    pub fn lines(&self) -> Vec<String> {
        self.records().iter().map(format_record).collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    fn push(&self, event: ProviderEvent) {
        self.events.lock().push(event);
    }
}

pub struct MemoryProvider {
    name: String,
    log: MemoryLog,
}

impl MemoryProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            log: MemoryLog::default(),
        }
    }

    pub fn log(&self) -> MemoryLog {
        self.log.clone()
    }
}

impl Provider for MemoryProvider {
    fn start(&mut self) -> Result<()> {
        self.log.push(ProviderEvent::Start);
        Ok(())
    }

    fn write(&mut self, record: &LogRecord) -> Result<()> {
        self.log.push(ProviderEvent::Write(record.clone()));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.log.push(ProviderEvent::Flush);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.log.push(ProviderEvent::Stop);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;

    #[test]
    fn test_capture_and_clear() {
        let mut provider = MemoryProvider::new("capture");
        let log = provider.log();

        provider.write(&LogRecord::new(LogLevel::Info, "a")).unwrap();
        provider.write(&LogRecord::new(LogLevel::Warn, "b")).unwrap();
        provider.flush().unwrap();

        assert_eq!(log.messages(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(log.events().last(), Some(&ProviderEvent::Flush));
        assert!(log.lines()[1].starts_with("[Warn]["));

        log.clear();
        assert!(log.events().is_empty());
    }
}
