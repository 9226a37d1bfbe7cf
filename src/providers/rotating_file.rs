//! Rotating file provider
//!
//! Records are buffered in memory and written to
//! `<base_path>.<rotation key>.log`, where the rotation key is the local time
//! truncated to an hour or a day. The key is recomputed on every write, so a
//! new file is opened by the first record of each window; windows with no
//! records never get a file.

use crate::core::{format_record, Clock, LogRecord, LoggerError, Provider, Result, SystemClock};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default buffer limit in bytes
pub const DEFAULT_BUFFER_LIMIT: usize = 1024;

/// Granularity of the rotation window
///
/// # Examples
///
/// ```
/// use dispatch_logger::providers::SplitBy;
/// use chrono::{FixedOffset, TimeZone};
///
/// let at = FixedOffset::east_opt(0).unwrap()
///     .with_ymd_and_hms(2024, 5, 1, 14, 3, 5).unwrap();
/// assert_eq!(SplitBy::Hourly.key_for(&at), "2024-05-01-14");
/// assert_eq!(SplitBy::Daily.key_for(&at), "2024-05-01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitBy {
    #[default]
    Hourly,
    Daily,
}

impl SplitBy {
    /// strftime pattern of the rotation key (24-hour clock)
    #[must_use]
    pub fn key_pattern(&self) -> &'static str {
        match self {
            SplitBy::Hourly => "%Y-%m-%d-%H",
            SplitBy::Daily => "%Y-%m-%d",
        }
    }

    #[must_use]
    pub fn key_for<Tz>(&self, datetime: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        datetime.format(self.key_pattern()).to_string()
    }
}

/// File provider with time-window rotation and an in-memory buffer
///
/// # Examples
///
/// ```no_run
/// use dispatch_logger::providers::{FileProvider, SplitBy};
///
/// // Writes /var/log/blog.2024-05-01-14.log and so on
/// let provider = FileProvider::new("/var/log/blog")
///     .with_split(SplitBy::Hourly)
///     .with_buffer_limit(4096);
/// ```
pub struct FileProvider {
    base_path: PathBuf,
    split: SplitBy,
    buffer_limit: usize,
    /// Formatted lines not yet written to the file
    buffer: String,
    file: Option<File>,
    last_split_key: String,
    clock: Box<dyn Clock>,
}

impl FileProvider {
    /// Create a provider rooted at `base_path`; no file is opened until `start`
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            split: SplitBy::default(),
            buffer_limit: DEFAULT_BUFFER_LIMIT,
            buffer: String::new(),
            file: None,
            last_split_key: String::new(),
            clock: Box::new(SystemClock),
        }
    }

    #[must_use]
    pub fn with_split(mut self, split: SplitBy) -> Self {
        self.split = split;
        self
    }

    /// Set the line length (bytes) at which the buffer is written out
    #[must_use]
    pub fn with_buffer_limit(mut self, limit: usize) -> Self {
        self.buffer_limit = limit;
        self
    }

    /// Use another time source for rotation decisions
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn split(&self) -> SplitBy {
        self.split
    }

    #[must_use]
    pub fn buffer_limit(&self) -> usize {
        self.buffer_limit
    }

    /// Bytes buffered and not yet written to the file
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Key of the window currently receiving writes; empty before `start`
    #[must_use]
    pub fn last_split_key(&self) -> &str {
        &self.last_split_key
    }

    /// File name for a rotation key: `<base_path>.<key>.log`
    #[must_use]
    pub fn path_for_key(&self, key: &str) -> PathBuf {
        let mut name = OsString::from(self.base_path.as_os_str());
        name.push(".");
        name.push(key);
        name.push(".log");
        PathBuf::from(name)
    }

    /// Path of the open file, if any
    #[must_use]
    pub fn current_path(&self) -> Option<PathBuf> {
        self.file
            .as_ref()
            .map(|_| self.path_for_key(&self.last_split_key))
    }

    fn current_key(&self) -> String {
        self.split.key_for(&self.clock.now())
    }

    fn open_target(&mut self) -> Result<()> {
        let path = self.path_for_key(&self.last_split_key);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::file_provider(
                    path.display().to_string(),
                    format!("Failed to open: {}", e),
                )
            })?;

        self.file = Some(file);
        Ok(())
    }

    fn write_buffer(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let path = self.path_for_key(&self.last_split_key);
        let file = self.file.as_mut().ok_or_else(|| {
            LoggerError::file_provider(path.display().to_string(), "No open log file")
        })?;
        file.write_all(self.buffer.as_bytes()).map_err(|e| {
            LoggerError::file_provider(
                path.display().to_string(),
                format!("Failed to write log buffer: {}", e),
            )
        })?;
        self.buffer.clear();
        Ok(())
    }

    fn sync(&self) -> Result<()> {
        if let Some(ref file) = self.file {
            file.sync_all().map_err(|e| {
                LoggerError::io_operation(
                    "syncing log file",
                    format!(
                        "Failed to sync '{}'",
                        self.path_for_key(&self.last_split_key).display()
                    ),
                    e,
                )
            })?;
        }
        Ok(())
    }

    /// Move to the window `key`: flush and close the current file, open the next
    fn rotate(&mut self, key: String) -> Result<()> {
        let old_path = self.path_for_key(&self.last_split_key);
        self.write_buffer()
            .and_then(|()| self.sync())
            .map_err(|e| {
                LoggerError::file_rotation(
                    old_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        // Dropping the handle closes the old window's file.
        self.file = None;

        self.last_split_key = key;
        self.open_target()
    }
}

impl Provider for FileProvider {
    fn start(&mut self) -> Result<()> {
        self.last_split_key = self.current_key();
        self.open_target()
    }

    fn write(&mut self, record: &LogRecord) -> Result<()> {
        if self.file.is_none() {
            return Err(LoggerError::file_provider(
                self.base_path.display().to_string(),
                "No open log file (provider not started)",
            ));
        }

        let key = self.current_key();
        if key != self.last_split_key {
            self.rotate(key)?;
        }

        let line = format_record(record);
        self.buffer.push_str(&line);

        // The trigger is the incoming line's own length, not the buffer's.
        if line.len() >= self.buffer_limit {
            self.write_buffer()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if self.file.is_none() {
            return Ok(());
        }
        self.write_buffer()?;
        self.sync()
    }

    fn stop(&mut self) -> Result<()> {
        if self.file.is_none() {
            return Ok(());
        }
        self.flush()?;
        self.file = None;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileProvider {
    fn drop(&mut self) {
        // Best effort for providers dropped without `stop`
        if self.file.is_some() {
            if let Err(e) = self.write_buffer() {
                eprintln!(
                    "[LOGGER WARNING] {} buffered bytes lost on drop: {}",
                    self.buffer.len(),
                    e
                );
            }
        }
    }
}
