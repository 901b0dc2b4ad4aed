//! Logging macros for ergonomic log message formatting.
//!
//! Every macro captures the call site (`file!()`/`line!()`) and builds the
//! event before the logger's level check runs.
//!
//! # Examples
//!
//! ```
//! use rust_config_logger::prelude::*;
//! use rust_config_logger::info;
//!
//! let logger = Logger::new("server");
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_config_logger::prelude::*;
/// # let logger = Logger::new("svc");
/// use rust_config_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level: $crate::LogLevel = $level;
        let event = $crate::LogEvent::new(logger.name_arc(), level)
            .with_location(file!(), line!())
            .with_message(format!($($arg)+));
        logger.log(&event, level);
    }};
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_config_logger::prelude::*;
/// # let logger = Logger::new("svc");
/// use rust_config_logger::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_config_logger::prelude::*;
/// # let logger = Logger::new("svc");
/// use rust_config_logger::error;
/// error!(logger, "Failed to connect: {}", "timeout");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

/// Fetch (or create) a named logger from the global registry.
///
/// # Examples
///
/// ```
/// use rust_config_logger::{info, logger};
///
/// let db = logger!("app.db");
/// info!(db, "pool ready");
/// assert_eq!(db.name(), "app.db");
/// ```
#[macro_export]
macro_rules! logger {
    ($name:expr) => {
        $crate::LoggerRegistry::global().get_logger($name)
    };
}

/// Log through the global root logger at debug level.
#[macro_export]
macro_rules! root_debug {
    ($($arg:tt)+) => {
        $crate::log!($crate::LoggerRegistry::global().root(), $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log through the global root logger at info level.
///
/// # Examples
///
/// ```
/// use rust_config_logger::root_info;
/// root_info!("booted in {} ms", 12);
/// ```
#[macro_export]
macro_rules! root_info {
    ($($arg:tt)+) => {
        $crate::log!($crate::LoggerRegistry::global().root(), $crate::LogLevel::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! root_warn {
    ($($arg:tt)+) => {
        $crate::log!($crate::LoggerRegistry::global().root(), $crate::LogLevel::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! root_error {
    ($($arg:tt)+) => {
        $crate::log!($crate::LoggerRegistry::global().root(), $crate::LogLevel::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! root_fatal {
    ($($arg:tt)+) => {
        $crate::log!($crate::LoggerRegistry::global().root(), $crate::LogLevel::Fatal, $($arg)+)
    };
}
