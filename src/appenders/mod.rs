//! Appender implementations

pub mod console;
pub mod factory;
pub mod file;
pub mod memory;

pub use console::ConsoleAppender;
pub use factory::{AppenderBuilder, AppenderFactory};
pub use file::{FileAppender, REOPEN_INTERVAL_SECS};
pub use memory::MemoryAppender;

pub use crate::core::Appender;
