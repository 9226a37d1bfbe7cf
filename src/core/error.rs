//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration could not be parsed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Dispatcher used before `start`
    #[error("Dispatcher not started")]
    NotStarted,

    /// `start` called on a dispatcher that is already running or stopped
    #[error("Dispatcher already started")]
    AlreadyStarted,

    /// Dispatcher used after `stop` completed
    #[error("Dispatcher already stopped")]
    Stopped,

    /// Dispatch loop terminated because a provider failed
    #[error("Dispatch loop halted: {reason}")]
    Halted { reason: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File provider error with path
    #[error("File provider error for '{path}': {message}")]
    FileProviderError { path: String, message: String },

    /// File rotation error
    #[error("File rotation failed for '{path}': {message}")]
    FileRotationError { path: String, message: String },

    /// Worker thread could not be spawned or joined
    #[error("Dispatch worker error: {0}")]
    WorkerError(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a halted error carrying the provider fault
    pub fn halted(reason: impl Into<String>) -> Self {
        LoggerError::Halted {
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file provider error
    pub fn file_provider(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileProviderError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn file_rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileRotationError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn worker<S: Into<String>>(msg: S) -> Self {
        LoggerError::WorkerError(msg.into())
    }

    /// Whether the error comes from misuse of the dispatcher lifecycle
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            LoggerError::NotStarted | LoggerError::AlreadyStarted | LoggerError::Stopped
        )
    }
}
