//! Named logger implementation

use super::{
    appender::Appender,
    error::{LoggerError, Result},
    formatter::LogFormatter,
    log_event::LogEvent,
    log_level::LogLevel,
    metrics::LoggerMetrics,
};
use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use std::panic::Location;
use std::sync::{Arc, Weak};

struct LoggerInner {
    formatter: Arc<LogFormatter>,
    appenders: Vec<Arc<dyn Appender>>,
}

/// A named, leveled logger owning an ordered list of appenders.
///
/// A logger without appenders forwards every call to the root logger it was
/// created with. Root itself has no parent, so forwarding is at most one hop.
pub struct Logger {
    name: Arc<str>,
    level: RwLock<LogLevel>,
    inner: Mutex<LoggerInner>,
    root: Option<Weak<Logger>>,
    metrics: LoggerMetrics,
}

impl Logger {
    /// Create a standalone logger with no parent
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self::build(name.into(), None)
    }

    /// Create a logger that falls back to `root` while it has no appenders
    #[must_use]
    pub fn with_root(name: impl Into<Arc<str>>, root: &Arc<Logger>) -> Self {
        Self::build(name.into(), Some(Arc::downgrade(root)))
    }

    fn build(name: Arc<str>, root: Option<Weak<Logger>>) -> Self {
        Self {
            name,
            level: RwLock::new(LogLevel::Debug),
            inner: Mutex::new(LoggerInner {
                formatter: LogFormatter::default_shared(),
                appenders: Vec::new(),
            }),
            root,
            metrics: LoggerMetrics::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_arc(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    pub fn level(&self) -> LogLevel {
        *self.level.read()
    }

    pub fn set_level(&self, level: LogLevel) {
        *self.level.write() = level;
    }

    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.level()
    }

    /// Dispatch `event` to every appender, or to root when there are none
    pub fn log(&self, event: &LogEvent, level: LogLevel) {
        if !self.is_enabled(level) {
            self.metrics.record_filtered();
            return;
        }

        let appenders = self.inner.lock().appenders.clone();
        if appenders.is_empty() {
            if let Some(root) = self.root.as_ref().and_then(Weak::upgrade) {
                root.log(event, level);
            }
            return;
        }

        self.dispatch(&appenders, event);
    }

    /// Write to each appender with per-appender panic isolation, so one
    /// failing sink never keeps the event from the others
    fn dispatch(&self, appenders: &[Arc<dyn Appender>], event: &LogEvent) {
        let mut has_error = false;

        for (idx, appender) in appenders.iter().enumerate() {
            let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.append(event)
            }));

            match append_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Appender #{} ({}) of logger '{}' failed: {}",
                        idx,
                        appender.kind(),
                        self.name,
                        e
                    );
                    has_error = true;
                }
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    eprintln!(
                        "[LOGGER CRITICAL] Appender #{} of logger '{}' panicked: {}. \
                         Other appenders continue to function.",
                        idx, self.name, panic_msg
                    );
                    has_error = true;
                }
            }
        }

        if has_error {
            self.metrics.record_dropped();
        } else {
            self.metrics.record_logged();
        }
    }

    /// Append an appender; one without an explicit formatter inherits the
    /// logger's current formatter
    pub fn add_appender(&self, appender: Arc<dyn Appender>) {
        let mut inner = self.inner.lock();
        appender
            .settings()
            .inherit_formatter(Arc::clone(&inner.formatter));
        inner.appenders.push(appender);
    }

    /// Swap the whole appender list in one step, so concurrent `log` calls
    /// see either the old list or the new one and never an empty logger
    pub fn replace_appenders(&self, appenders: Vec<Arc<dyn Appender>>) {
        let mut inner = self.inner.lock();
        for appender in &appenders {
            appender
                .settings()
                .inherit_formatter(Arc::clone(&inner.formatter));
        }
        let replaced = std::mem::replace(&mut inner.appenders, appenders);
        drop(inner);
        // dropped sinks may flush to disk
        drop(replaced);
    }

    /// Remove one appender by identity
    pub fn del_appender(&self, appender: &Arc<dyn Appender>) -> bool {
        let target = Arc::as_ptr(appender).cast::<()>();
        let mut inner = self.inner.lock();
        let before = inner.appenders.len();
        inner
            .appenders
            .retain(|a| Arc::as_ptr(a).cast::<()>() != target);
        inner.appenders.len() != before
    }

    pub fn clear_appenders(&self) {
        self.inner.lock().appenders.clear();
    }

    pub fn appenders(&self) -> Vec<Arc<dyn Appender>> {
        self.inner.lock().appenders.clone()
    }

    pub fn formatter(&self) -> Arc<LogFormatter> {
        Arc::clone(&self.inner.lock().formatter)
    }

    /// Compile `pattern` and install it; a flagged pattern is rejected and
    /// nothing changes
    pub fn set_formatter(&self, pattern: &str) -> Result<()> {
        self.set_formatter_arc(Arc::new(LogFormatter::new(pattern)))
    }

    /// Install a compiled formatter and hand it to every appender that has
    /// no explicit formatter of its own
    pub fn set_formatter_arc(&self, formatter: Arc<LogFormatter>) -> Result<()> {
        if formatter.is_error() {
            return Err(LoggerError::invalid_pattern(formatter.pattern()));
        }

        let mut inner = self.inner.lock();
        for appender in &inner.appenders {
            appender.settings().inherit_formatter(Arc::clone(&formatter));
        }
        inner.formatter = formatter;
        Ok(())
    }

    pub fn flush(&self) -> Result<()> {
        for appender in self.appenders() {
            appender.flush()?;
        }
        Ok(())
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Live configuration as a logger descriptor document
    pub fn to_document(&self) -> Value {
        let (formatter, appenders) = {
            let inner = self.inner.lock();
            (Arc::clone(&inner.formatter), inner.appenders.clone())
        };

        let mut node = Map::new();
        node.insert("name".to_string(), Value::String(self.name.to_string()));
        node.insert(
            "level".to_string(),
            Value::String(self.level().to_str().to_string()),
        );
        node.insert(
            "formatter".to_string(),
            Value::String(formatter.pattern().to_string()),
        );
        if !appenders.is_empty() {
            node.insert(
                "appenders".to_string(),
                Value::Array(appenders.iter().map(|a| a.to_document()).collect()),
            );
        }
        Value::Object(node)
    }

    fn emit(&self, level: LogLevel, message: String, location: &'static Location<'static>) {
        let event = LogEvent::new(self.name_arc(), level)
            .with_location(location.file(), location.line())
            .with_message(message);
        self.log(&event, level);
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.emit(LogLevel::Debug, message.into(), Location::caller());
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.emit(LogLevel::Info, message.into(), Location::caller());
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.emit(LogLevel::Warn, message.into(), Location::caller());
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.emit(LogLevel::Error, message.into(), Location::caller());
    }

    #[inline]
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) {
        self.emit(LogLevel::Fatal, message.into(), Location::caller());
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("appenders", &self.inner.lock().appenders.len())
            .finish()
    }
}
