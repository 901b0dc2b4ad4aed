//! Name to logger registry

use super::{appender::Appender, formatter::LogFormatter, log_level::LogLevel, logger::Logger};
use crate::appenders::ConsoleAppender;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Reserved name of the root logger
pub const ROOT_LOGGER_NAME: &str = "root";

static GLOBAL_REGISTRY: Lazy<Arc<LoggerRegistry>> = Lazy::new(|| Arc::new(LoggerRegistry::new()));

/// Owns every named logger plus the root logger.
///
/// Root is created with one console appender, lives as long as the registry
/// and cannot be removed. Named loggers only hold a weak handle to it.
pub struct LoggerRegistry {
    root: Arc<Logger>,
    root_console: Arc<dyn Appender>,
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
}

impl LoggerRegistry {
    pub fn new() -> Self {
        let root = Arc::new(Logger::new(ROOT_LOGGER_NAME));
        let root_console: Arc<dyn Appender> = Arc::new(ConsoleAppender::new());
        root.add_appender(Arc::clone(&root_console));

        Self {
            root,
            root_console,
            loggers: Mutex::new(HashMap::new()),
        }
    }

    /// Process-wide registry, created on first use
    pub fn global() -> Arc<LoggerRegistry> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    pub fn root(&self) -> Arc<Logger> {
        Arc::clone(&self.root)
    }

    /// The console appender root was created with
    pub fn root_console(&self) -> Arc<dyn Appender> {
        Arc::clone(&self.root_console)
    }

    /// Fetch `name`, creating it on first request
    pub fn get_logger(&self, name: &str) -> Arc<Logger> {
        if name == ROOT_LOGGER_NAME {
            return self.root();
        }
        let mut loggers = self.loggers.lock();
        let logger = loggers
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Logger::with_root(name, &self.root)));
        Arc::clone(logger)
    }

    /// Lookup without creating
    pub fn find(&self, name: &str) -> Option<Arc<Logger>> {
        if name == ROOT_LOGGER_NAME {
            return Some(self.root());
        }
        self.loggers.lock().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        name == ROOT_LOGGER_NAME || self.loggers.lock().contains_key(name)
    }

    /// Drop `name` from the registry; root is never removed
    pub fn del_logger(&self, name: &str) -> Option<Arc<Logger>> {
        if name == ROOT_LOGGER_NAME {
            return None;
        }
        self.loggers.lock().remove(name)
    }

    /// Names of all loggers, root included, sorted
    pub fn logger_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.lock().keys().cloned().collect();
        names.push(ROOT_LOGGER_NAME.to_string());
        names.sort();
        names
    }

    /// Live configuration of every logger, sorted by name
    pub fn to_document(&self) -> Value {
        let mut loggers: Vec<Arc<Logger>> = self.loggers.lock().values().cloned().collect();
        loggers.push(self.root());
        loggers.sort_by(|a, b| a.name().cmp(b.name()));
        Value::Array(loggers.iter().map(|l| l.to_document()).collect())
    }

    /// Teardown hook: forget named loggers and restore root's initial state
    pub fn reset(&self) {
        self.loggers.lock().clear();
        self.root.clear_appenders();
        self.root.set_level(LogLevel::Debug);
        // the default pattern is always valid
        let _ = self.root.set_formatter_arc(LogFormatter::default_shared());
        self.root_console.settings().reset();
        self.root.add_appender(Arc::clone(&self.root_console));
    }
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_always_present() {
        let registry = LoggerRegistry::new();
        assert!(registry.contains(ROOT_LOGGER_NAME));
        assert!(registry.del_logger(ROOT_LOGGER_NAME).is_none());
        assert!(Arc::ptr_eq(&registry.root(), &registry.get_logger("root")));
        assert_eq!(registry.root().appenders().len(), 1);
        assert_eq!(registry.root().appenders()[0].kind(), "console");
    }

    #[test]
    fn test_get_logger_is_idempotent() {
        let registry = LoggerRegistry::new();
        let a = registry.get_logger("svc");
        let b = registry.get_logger("svc");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.logger_names(), vec!["root", "svc"]);
    }

    #[test]
    fn test_fresh_logger_writes_through_root_console() {
        let registry = LoggerRegistry::new();
        let console = registry.root_console();
        let svc = registry.get_logger("svc");
        assert!(svc.appenders().is_empty());

        svc.info("hello from svc");

        assert_eq!(console.metrics().written(), 1);
    }

    #[test]
    fn test_del_logger() {
        let registry = LoggerRegistry::new();
        let svc = registry.get_logger("svc");
        let removed = registry.del_logger("svc").unwrap();
        assert!(Arc::ptr_eq(&svc, &removed));
        assert!(!registry.contains("svc"));
        assert!(registry.find("svc").is_none());
    }

    #[test]
    fn test_to_document_lists_all_loggers() {
        let registry = LoggerRegistry::new();
        registry.get_logger("b.svc");
        registry.get_logger("a.svc");

        let doc = registry.to_document();
        let names: Vec<&str> = doc
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.svc", "b.svc", "root"]);
        assert_eq!(doc[2]["appenders"][0]["type"], "console");
    }

    #[test]
    fn test_reset_restores_root() {
        let registry = LoggerRegistry::new();
        registry.get_logger("svc");
        registry.root().set_level(LogLevel::Error);
        registry.root().clear_appenders();

        registry.reset();

        assert_eq!(registry.logger_names(), vec!["root"]);
        assert_eq!(registry.root().level(), LogLevel::Debug);
        assert_eq!(registry.root().appenders().len(), 1);
    }
}
