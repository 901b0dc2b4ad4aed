//! Core logger types and traits

pub mod appender;
pub mod error;
pub mod formatter;
pub mod log_event;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod registry;

pub use appender::{Appender, AppenderSettings};
pub use error::{LoggerError, Result};
pub use formatter::{Field, FormatItem, LogFormatter, DEFAULT_DATETIME_FORMAT, DEFAULT_PATTERN};
pub use log_event::LogEvent;
pub use log_level::LogLevel;
pub use logger::Logger;
pub use metrics::{AppenderMetrics, LoggerMetrics};
pub use registry::{LoggerRegistry, ROOT_LOGGER_NAME};
