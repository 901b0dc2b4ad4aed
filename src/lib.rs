//! # Rust Config Logger
//!
//! A config-driven logging framework: named, leveled loggers with pluggable
//! appenders and a pattern formatter, plus a typed configuration registry
//! that hot-reloads the logger topology from JSON or TOML documents.
//!
//! ## Features
//!
//! - **Typed config cells**: any `serde` type, change listeners, document loading
//! - **Hot reload**: the `logs` cell drives loggers and appenders at runtime
//! - **Pattern formatter**: `%d{%Y-%m-%d} [%p] %c %m%n` style patterns
//! - **Thread Safe**: reload may run while other threads keep logging
//!
//! ## Example
//!
//! ```no_run
//! use rust_config_logger::{info, logger, ConfigRegistry};
//!
//! rust_config_logger::init().unwrap();
//! ConfigRegistry::global()
//!     .load_from_str(r#"{"logs": [{"name": "app", "level": "INFO",
//!         "appenders": [{"type": "file", "file": "/var/log/app.log"}]}]}"#)
//!     .unwrap();
//!
//! let app = logger!("app");
//! info!(app, "configured from document");
//! ```

pub mod appenders;
pub mod config;
pub mod core;
pub mod macros;
pub mod reload;

pub mod prelude {
    pub use crate::appenders::{AppenderFactory, ConsoleAppender, FileAppender, MemoryAppender};
    pub use crate::config::{ConfigCell, ConfigRegistry, ConfigValue, ConfigVar};
    pub use crate::core::{
        Appender, LogEvent, LogFormatter, LogLevel, Logger, LoggerError, LoggerRegistry, Result,
    };
    pub use crate::reload::{AppenderConfig, LoggerConfig, LoggerConfigSet, ReloadReconciler};
}

pub use appenders::{AppenderFactory, ConsoleAppender, FileAppender, MemoryAppender};
pub use config::{ConfigCell, ConfigRegistry, ConfigValue, ConfigVar};
pub use core::{
    Appender, AppenderMetrics, AppenderSettings, Field, FormatItem, LogEvent, LogFormatter,
    LogLevel, Logger, LoggerError, LoggerMetrics, LoggerRegistry, Result, DEFAULT_PATTERN,
    ROOT_LOGGER_NAME,
};
pub use reload::{
    init, AppenderConfig, LoggerConfig, LoggerConfigSet, ReloadReconciler, LOGS_CONFIG_KEY,
};
