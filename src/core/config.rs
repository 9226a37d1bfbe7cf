//! Logging configuration
//!
//! Describes the provider set that [`init`](crate::init) wires up. Every field
//! has a default, so a partial JSON document is enough:
//!
//! ```
//! use dispatch_logger::core::LoggingConfig;
//! use dispatch_logger::{LogLevel, providers::SplitBy};
//!
//! let config = LoggingConfig::from_json_str(
//!     r#"{ "level": "info", "file": { "base_path": "/www/log/blog", "split": "daily" } }"#,
//! )?;
//! assert_eq!(config.level, LogLevel::Info);
//! assert_eq!(config.file.as_ref().unwrap().split, SplitBy::Daily);
//! assert!(config.console);
//! # Ok::<(), dispatch_logger::LoggerError>(())
//! ```

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use crate::providers::rotating_file::{SplitBy, DEFAULT_BUFFER_LIMIT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base path used when none is configured
pub const DEFAULT_BASE_PATH: &str = "logs/app";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level threshold of the dispatcher
    pub level: LogLevel,
    /// Rotating file output; `None` disables it
    pub file: Option<FileConfig>,
    /// Whether to also print to stdout
    pub console: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub base_path: PathBuf,
    pub split: SplitBy,
    pub buffer_limit: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Debug,
            file: Some(FileConfig::default()),
            console: true,
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from(DEFAULT_BASE_PATH),
            split: SplitBy::default(),
            buffer_limit: DEFAULT_BUFFER_LIMIT,
        }
    }
}

impl LoggingConfig {
    /// Default configuration with the file provider rooted at `base_path`
    #[must_use]
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(FileConfig {
                base_path: base_path.into(),
                ..FileConfig::default()
            }),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading logging configuration",
                format!("Failed to read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json_str(&json)
    }

    /// Reject settings no provider could work with
    pub fn validate(&self) -> Result<()> {
        if let Some(file) = &self.file {
            if file.base_path.as_os_str().is_empty() {
                return Err(LoggerError::config("FileProvider", "base_path is empty"));
            }
            if file.buffer_limit == 0 {
                return Err(LoggerError::config(
                    "FileProvider",
                    "buffer_limit must be greater than zero",
                ));
            }
        }
        Ok(())
    }
}
