//! Applies `logs` config changes to live loggers

use super::snapshot::{AppenderConfig, LoggerConfig, LoggerConfigSet};
use crate::appenders::AppenderFactory;
use crate::config::{ConfigCell, ConfigRegistry};
use crate::core::{
    Appender, LogFormatter, Logger, LoggerError, LoggerRegistry, Result, ROOT_LOGGER_NAME,
};
use parking_lot::{const_mutex, Mutex};
use std::sync::Arc;

/// Config key holding the logger topology
pub const LOGS_CONFIG_KEY: &str = "logs";

static GLOBAL_INSTALL: Mutex<Option<Arc<ConfigCell<LoggerConfigSet>>>> = const_mutex(None);

/// Install a reconciler on the global config and logger registries.
///
/// Idempotent while the installed `logs` cell is still the one registered
/// globally. After [`ConfigRegistry::reset`] drops it, the next call
/// subscribes to the fresh cell.
pub fn init() -> Result<Arc<ConfigCell<LoggerConfigSet>>> {
    let config = ConfigRegistry::global();
    let mut installed = GLOBAL_INSTALL.lock();

    if let Some(ref cell) = *installed {
        let current = config.find::<LoggerConfigSet>(LOGS_CONFIG_KEY)?;
        if current.is_some_and(|current| Arc::ptr_eq(&current, cell)) {
            return Ok(Arc::clone(cell));
        }
    }

    let reconciler = ReloadReconciler::new(
        LoggerRegistry::global(),
        Arc::new(AppenderFactory::with_defaults()),
    );
    let (cell, _key) = reconciler.install(&config)?;
    *installed = Some(Arc::clone(&cell));
    Ok(cell)
}

/// Diffs two logger config sets and mutates the logger registry to match
/// the new one.
///
/// A snapshot identical to its previous version is skipped entirely. Any
/// other snapshot rebuilds its logger: appenders are recreated from the
/// descriptors and swapped in as one list. Loggers that disappear from the set are removed,
/// except root.
#[derive(Clone)]
pub struct ReloadReconciler {
    loggers: Arc<LoggerRegistry>,
    factory: Arc<AppenderFactory>,
}

/// Descriptor with its patterns already compiled
struct PreparedAppender<'a> {
    config: &'a AppenderConfig,
    formatter: Option<Arc<LogFormatter>>,
}

impl ReloadReconciler {
    pub fn new(loggers: Arc<LoggerRegistry>, factory: Arc<AppenderFactory>) -> Self {
        Self { loggers, factory }
    }

    pub fn loggers(&self) -> &Arc<LoggerRegistry> {
        &self.loggers
    }

    pub fn factory(&self) -> &Arc<AppenderFactory> {
        &self.factory
    }

    /// Look up the `logs` cell in `config` and subscribe to it.
    ///
    /// Returns the cell and the listener key.
    pub fn install(&self, config: &ConfigRegistry) -> Result<(Arc<ConfigCell<LoggerConfigSet>>, u64)> {
        let cell = config.lookup(
            LOGS_CONFIG_KEY,
            LoggerConfigSet::new(),
            "logger topology",
        )?;
        let reconciler = self.clone();
        let key = cell.add_listener(move |old: &LoggerConfigSet, new: &LoggerConfigSet| {
            reconciler.apply(old, new)
        });
        Ok((cell, key))
    }

    /// Bring the registry from `old` to `new`.
    ///
    /// Every entry is attempted; the first error is returned at the end.
    pub fn apply(&self, old: &LoggerConfigSet, new: &LoggerConfigSet) -> Result<()> {
        let mut first_error = None;

        for config in new.iter() {
            let logger = self.loggers.get_logger(&config.name);
            if old.get(&config.name) == Some(config) {
                continue;
            }
            if let Err(e) = self.rebuild(&logger, config) {
                eprintln!(
                    "[LOGGER ERROR] Failed to apply config of logger '{}': {}",
                    config.name, e
                );
                first_error.get_or_insert(e);
            }
        }

        for config in old.iter() {
            if !new.contains(&config.name) && config.name != ROOT_LOGGER_NAME {
                self.loggers.del_logger(&config.name);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn rebuild(&self, logger: &Arc<Logger>, config: &LoggerConfig) -> Result<()> {
        let is_root = config.name == ROOT_LOGGER_NAME;

        // nothing is touched unless every pattern and kind checks out
        let logger_formatter = match config.formatter {
            Some(ref pattern) => Some(compile(pattern)?),
            None => None,
        };
        let mut prepared = Vec::with_capacity(config.appenders.len());
        for descriptor in &config.appenders {
            if !self.factory.contains(&descriptor.kind) {
                return Err(LoggerError::appender_config(
                    descriptor.kind.clone(),
                    "unknown appender type",
                ));
            }
            let formatter = match descriptor.formatter {
                Some(ref pattern) => Some(compile(pattern)?),
                None => None,
            };
            prepared.push(PreparedAppender {
                config: descriptor,
                formatter,
            });
        }

        let mut first_error = None;
        let mut root_console_config = None;
        let mut built: Vec<Arc<dyn Appender>> = Vec::with_capacity(prepared.len());
        for item in prepared {
            if is_root && item.config.kind.eq_ignore_ascii_case("console") {
                // root owns its console appender; only the first descriptor tunes it
                root_console_config.get_or_insert(item);
                continue;
            }
            match self.factory.create(item.config) {
                Ok(appender) => {
                    apply_settings(appender.as_ref(), &item);
                    built.push(appender);
                }
                Err(e) => {
                    eprintln!(
                        "[LOGGER ERROR] Skipping {} appender of logger '{}': {}",
                        item.config.kind, config.name, e
                    );
                    first_error.get_or_insert(e);
                }
            }
        }

        if is_root {
            let console = self.loggers.root_console();
            console.settings().reset();
            if let Some(ref item) = root_console_config {
                apply_settings(console.as_ref(), item);
            }
            built.insert(0, console);
        }

        logger.set_level(config.level);
        if let Some(formatter) = logger_formatter {
            if formatter.pattern() != logger.formatter().pattern() {
                logger.set_formatter_arc(formatter)?;
            }
        }
        logger.replace_appenders(built);

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn compile(pattern: &str) -> Result<Arc<LogFormatter>> {
    let formatter = LogFormatter::new(pattern);
    if formatter.is_error() {
        return Err(LoggerError::invalid_pattern(pattern));
    }
    Ok(Arc::new(formatter))
}

fn apply_settings(appender: &dyn Appender, item: &PreparedAppender<'_>) {
    let settings = appender.settings();
    if let Some(level) = item.config.level {
        settings.set_level(level);
    }
    if let Some(ref formatter) = item.formatter {
        settings.set_formatter(Arc::clone(formatter));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemoryAppender;
    use crate::core::LogLevel;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// Reconciler whose `memory` kind hands out appenders the test can inspect
    fn fixture() -> (ReloadReconciler, Arc<Mutex<HashMap<String, Arc<MemoryAppender>>>>) {
        let created = Arc::new(Mutex::new(HashMap::new()));
        let factory = AppenderFactory::with_defaults();
        let sink = Arc::clone(&created);
        factory.register("memory", move |config: &AppenderConfig| {
            let appender = Arc::new(MemoryAppender::new());
            let tag = config
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            sink.lock().insert(tag, Arc::clone(&appender));
            Ok(appender as Arc<dyn Appender>)
        });
        let reconciler = ReloadReconciler::new(Arc::new(LoggerRegistry::new()), Arc::new(factory));
        (reconciler, created)
    }

    fn memory(tag: &str) -> AppenderConfig {
        AppenderConfig {
            kind: "memory".to_string(),
            file: Some(tag.into()),
            ..AppenderConfig::default()
        }
    }

    fn set(configs: Vec<LoggerConfig>) -> LoggerConfigSet {
        configs.into()
    }

    #[test]
    fn test_creates_logger_with_appenders() {
        let (reconciler, created) = fixture();
        let new = set(vec![LoggerConfig::new("svc", LogLevel::Info)
            .with_formatter("%p %m")
            .with_appender(memory("a"))
            .with_appender(memory("b").with_level(LogLevel::Error).with_formatter("B:%m"))]);

        reconciler.apply(&LoggerConfigSet::new(), &new).unwrap();

        let svc = reconciler.loggers().find("svc").unwrap();
        assert_eq!(svc.level(), LogLevel::Info);
        assert_eq!(svc.formatter().pattern(), "%p %m");
        assert_eq!(svc.appenders().len(), 2);

        svc.info("hello");
        svc.error("boom");
        let created = created.lock();
        assert_eq!(created["a"].lines(), vec!["INFO hello", "ERROR boom"]);
        assert_eq!(created["b"].lines(), vec!["B:boom"]);
    }

    #[test]
    fn test_identical_snapshot_keeps_appenders() {
        let (reconciler, _) = fixture();
        let config = set(vec![LoggerConfig::new("svc", LogLevel::Info).with_appender(memory("a"))]);

        reconciler.apply(&LoggerConfigSet::new(), &config).unwrap();
        let before = reconciler.loggers().find("svc").unwrap().appenders();

        reconciler.apply(&config, &config.clone()).unwrap();
        let after = reconciler.loggers().find("svc").unwrap().appenders();

        assert!(Arc::ptr_eq(&before[0], &after[0]));
    }

    #[test]
    fn test_changed_snapshot_rebuilds() {
        let (reconciler, _) = fixture();
        let old = set(vec![LoggerConfig::new("svc", LogLevel::Info).with_appender(memory("a"))]);
        let new = set(vec![LoggerConfig::new("svc", LogLevel::Warn)
            .with_appender(memory("a"))
            .with_appender(memory("b"))]);

        reconciler.apply(&LoggerConfigSet::new(), &old).unwrap();
        let before = reconciler.loggers().find("svc").unwrap().appenders();
        reconciler.apply(&old, &new).unwrap();
        let svc = reconciler.loggers().find("svc").unwrap();

        assert_eq!(svc.level(), LogLevel::Warn);
        assert_eq!(svc.appenders().len(), 2);
        assert!(!Arc::ptr_eq(&before[0], &svc.appenders()[0]));
    }

    #[test]
    fn test_removed_logger_is_deleted() {
        let (reconciler, _) = fixture();
        let old = set(vec![
            LoggerConfig::new("svc", LogLevel::Info),
            LoggerConfig::new("root", LogLevel::Warn),
        ]);

        reconciler.apply(&LoggerConfigSet::new(), &old).unwrap();
        assert!(reconciler.loggers().contains("svc"));

        reconciler.apply(&old, &LoggerConfigSet::new()).unwrap();
        assert!(!reconciler.loggers().contains("svc"));
        assert!(reconciler.loggers().contains("root"));
    }

    #[test]
    fn test_invalid_pattern_leaves_logger_untouched() {
        let (reconciler, _) = fixture();
        let good = set(vec![LoggerConfig::new("svc", LogLevel::Info).with_appender(memory("a"))]);
        reconciler.apply(&LoggerConfigSet::new(), &good).unwrap();

        let bad = set(vec![LoggerConfig::new("svc", LogLevel::Error)
            .with_appender(memory("b").with_formatter("%d{%Y"))]);
        let result = reconciler.apply(&good, &bad);

        assert!(matches!(result, Err(LoggerError::InvalidPattern { .. })));
        let svc = reconciler.loggers().find("svc").unwrap();
        assert_eq!(svc.level(), LogLevel::Info);
        assert_eq!(svc.appenders().len(), 1);
    }

    #[test]
    fn test_unknown_kind_is_rejected_but_others_apply() {
        let (reconciler, _) = fixture();
        let new = set(vec![
            LoggerConfig::new("a.svc", LogLevel::Info).with_appender(AppenderConfig {
                kind: "syslog".to_string(),
                ..AppenderConfig::default()
            }),
            LoggerConfig::new("b.svc", LogLevel::Error),
        ]);

        let result = reconciler.apply(&LoggerConfigSet::new(), &new);
        assert!(matches!(result, Err(LoggerError::AppenderConfig { .. })));
        assert_eq!(reconciler.loggers().find("b.svc").unwrap().level(), LogLevel::Error);
    }

    #[test]
    fn test_unopenable_file_is_skipped() {
        let (reconciler, created) = fixture();
        let dir = TempDir::new().unwrap();
        let new = set(vec![LoggerConfig::new("svc", LogLevel::Info)
            .with_appender(AppenderConfig::file(dir.path().join("missing").join("x.log")))
            .with_appender(memory("a"))]);

        let result = reconciler.apply(&LoggerConfigSet::new(), &new);
        assert!(matches!(result, Err(LoggerError::IoOperation { .. })));

        let svc = reconciler.loggers().find("svc").unwrap();
        assert_eq!(svc.appenders().len(), 1);
        svc.info("delivered");
        assert_eq!(created.lock()["a"].len(), 1);
    }

    #[test]
    fn test_root_console_is_tuned_not_duplicated() {
        let (reconciler, created) = fixture();
        let console = reconciler.loggers().root_console();
        let new = set(vec![LoggerConfig::new("root", LogLevel::Warn)
            .with_appender(AppenderConfig::console().with_level(LogLevel::Error).with_formatter("%m%n"))
            .with_appender(memory("r"))]);

        reconciler.apply(&LoggerConfigSet::new(), &new).unwrap();

        let root = reconciler.loggers().root();
        let appenders = root.appenders();
        assert_eq!(appenders.len(), 2);
        assert!(Arc::ptr_eq(&appenders[0], &console));
        assert_eq!(console.settings().level(), LogLevel::Error);
        assert!(console.settings().has_explicit_formatter());
        assert_eq!(root.level(), LogLevel::Warn);
        assert!(created.lock().contains_key("r"));

        // dropping the descriptor restores the console defaults
        let plain = set(vec![LoggerConfig::new("root", LogLevel::Info)]);
        reconciler.apply(&new, &plain).unwrap();
        assert_eq!(root.appenders().len(), 1);
        assert_eq!(console.settings().level(), LogLevel::Debug);
        assert!(!console.settings().has_explicit_formatter());
    }

    #[test]
    fn test_formatter_kept_when_not_declared() {
        let (reconciler, _) = fixture();
        let first = set(vec![LoggerConfig::new("svc", LogLevel::Info).with_formatter("%m")]);
        let second = set(vec![LoggerConfig::new("svc", LogLevel::Warn)]);

        reconciler.apply(&LoggerConfigSet::new(), &first).unwrap();
        reconciler.apply(&first, &second).unwrap();

        assert_eq!(reconciler.loggers().find("svc").unwrap().formatter().pattern(), "%m");
    }

    #[test]
    fn test_install_reacts_to_document_load() {
        let (reconciler, created) = fixture();
        let config = ConfigRegistry::new();
        let (cell, key) = reconciler.install(&config).unwrap();
        assert!(cell.get_listener(key).is_some());

        config
            .load_from_str(
                r#"{"logs": [{"name": "svc", "level": "ERROR",
                    "appenders": [{"type": "memory", "file": "m"}]}]}"#,
            )
            .unwrap();

        let svc = reconciler.loggers().find("svc").unwrap();
        assert_eq!(svc.level(), LogLevel::Error);
        svc.error("seen");
        assert_eq!(created.lock()["m"].len(), 1);

        config.load_from_str(r#"{"logs": []}"#).unwrap();
        assert!(!reconciler.loggers().contains("svc"));
    }
}
