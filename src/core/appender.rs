//! Appender trait for log output destinations

use super::{
    error::Result, formatter::LogFormatter, log_event::LogEvent, log_level::LogLevel,
    metrics::AppenderMetrics,
};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::sync::Arc;

/// A sink consuming rendered events.
///
/// Implementations guard their own state; every method takes `&self` so the
/// same appender can be shared by a logger and by whoever configured it.
pub trait Appender: Send + Sync {
    /// Render and write `event` if it passes the appender's level
    fn append(&self, event: &LogEvent) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Kind name matching the `type` key of appender descriptors
    fn kind(&self) -> &str;

    fn settings(&self) -> &AppenderSettings;

    fn metrics(&self) -> &AppenderMetrics;

    /// Live configuration as a descriptor document
    fn to_document(&self) -> Value {
        self.settings().to_document(self.kind())
    }
}

#[derive(Debug)]
struct SettingsState {
    level: LogLevel,
    formatter: Option<Arc<LogFormatter>>,
    explicit_formatter: bool,
}

/// Level threshold and formatter of one appender.
///
/// A formatter set with [`AppenderSettings::set_formatter`] is explicit and
/// sticky: later [`AppenderSettings::inherit_formatter`] calls from the owning
/// logger leave it alone.
#[derive(Debug)]
pub struct AppenderSettings {
    state: RwLock<SettingsState>,
}

impl AppenderSettings {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SettingsState {
                level: LogLevel::Debug,
                formatter: None,
                explicit_formatter: false,
            }),
        }
    }

    pub fn level(&self) -> LogLevel {
        self.state.read().level
    }

    pub fn set_level(&self, level: LogLevel) {
        self.state.write().level = level;
    }

    pub fn formatter(&self) -> Option<Arc<LogFormatter>> {
        self.state.read().formatter.clone()
    }

    /// Install an explicit formatter
    pub fn set_formatter(&self, formatter: Arc<LogFormatter>) {
        let mut state = self.state.write();
        state.formatter = Some(formatter);
        state.explicit_formatter = true;
    }

    /// Install a formatter handed down by the owning logger.
    ///
    /// Returns `false` without changes when an explicit formatter is set.
    pub fn inherit_formatter(&self, formatter: Arc<LogFormatter>) -> bool {
        let mut state = self.state.write();
        if state.explicit_formatter {
            return false;
        }
        state.formatter = Some(formatter);
        true
    }

    /// Back to the initial state: lowest level, no formatter
    pub fn reset(&self) {
        let mut state = self.state.write();
        state.level = LogLevel::Debug;
        state.formatter = None;
        state.explicit_formatter = false;
    }

    pub fn has_explicit_formatter(&self) -> bool {
        self.state.read().explicit_formatter
    }

    /// Threshold and formatter to render with, falling back to the default pattern
    pub fn snapshot(&self) -> (LogLevel, Arc<LogFormatter>) {
        let state = self.state.read();
        let formatter = state
            .formatter
            .clone()
            .unwrap_or_else(LogFormatter::default_shared);
        (state.level, formatter)
    }

    pub fn to_document(&self, kind: &str) -> Value {
        let state = self.state.read();
        let mut node = Map::new();
        node.insert("type".to_string(), Value::String(kind.to_string()));
        node.insert(
            "level".to_string(),
            Value::String(state.level.to_str().to_string()),
        );
        if state.explicit_formatter {
            if let Some(ref formatter) = state.formatter {
                node.insert(
                    "formatter".to_string(),
                    Value::String(formatter.pattern().to_string()),
                );
            }
        }
        Value::Object(node)
    }
}

impl Default for AppenderSettings {
    fn default() -> Self {
        Self::new()
    }
}
