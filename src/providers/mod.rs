//! Provider implementations

pub mod console;
pub mod memory;
pub mod rotating_file;

pub use console::ConsoleProvider;
pub use memory::{MemoryLog, MemoryProvider, ProviderEvent};
pub use rotating_file::{FileProvider, SplitBy, DEFAULT_BUFFER_LIMIT};

pub use crate::core::Provider;
