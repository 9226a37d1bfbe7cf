//! Console provider implementation

use crate::core::{format_record, LogRecord, Provider, Result};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::Write;

/// Writes each record to stdout as soon as it arrives.
///
/// Console output is best-effort: write failures are ignored and never halt
/// the dispatch loop.
pub struct ConsoleProvider {
    #[cfg_attr(not(feature = "console"), allow(dead_code))]
    use_colors: bool,
}

impl ConsoleProvider {
    pub fn new() -> Self {
        Self { use_colors: false }
    }

    /// Colour the level tag with ANSI escapes
    ///
    /// # Example
    ///
    /// ```
    /// use dispatch_logger::providers::ConsoleProvider;
    ///
    /// let provider = ConsoleProvider::new().with_colors(true);
    /// ```
    #[cfg(feature = "console")]
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn render(&self, record: &LogRecord) -> String {
        let line = format_record(record);
        #[cfg(feature = "console")]
        {
            if self.use_colors {
                let tag = format!("[{}]", record.level());
                let colored_tag = tag.color(record.level().color_code()).to_string();
                return line.replacen(&tag, &colored_tag, 1);
            }
        }
        line
    }
}

impl Default for ConsoleProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for ConsoleProvider {
    fn write(&mut self, record: &LogRecord) -> Result<()> {
        let line = self.render(record);
        let _ = std::io::stdout().lock().write_all(line.as_bytes());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let _ = std::io::stdout().flush();
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
