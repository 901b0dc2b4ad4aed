//! Declarative logger configuration, as carried by the `logs` config cell

use crate::core::LogLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One appender descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppenderConfig {
    /// Kind registered in the appender factory, e.g. `console` or `file`
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<LogLevel>,

    /// Explicit pattern for this appender only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,

    /// Target path; required by `file` appenders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl AppenderConfig {
    pub fn console() -> Self {
        Self {
            kind: "console".to_string(),
            ..Self::default()
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: "file".to_string(),
            file: Some(path.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, pattern: impl Into<String>) -> Self {
        self.formatter = Some(pattern.into());
        self
    }
}

/// Desired state of one named logger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub name: String,

    pub level: LogLevel,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub appenders: Vec<AppenderConfig>,
}

impl LoggerConfig {
    pub fn new(name: impl Into<String>, level: LogLevel) -> Self {
        Self {
            name: name.into(),
            level,
            formatter: None,
            appenders: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_formatter(mut self, pattern: impl Into<String>) -> Self {
        self.formatter = Some(pattern.into());
        self
    }

    #[must_use]
    pub fn with_appender(mut self, appender: AppenderConfig) -> Self {
        self.appenders.push(appender);
        self
    }
}

/// Logger snapshots keyed by name.
///
/// Serialized as a sequence; when a sequence names the same logger twice the
/// first entry wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LoggerConfig>", into = "Vec<LoggerConfig>")]
pub struct LoggerConfigSet(BTreeMap<String, LoggerConfig>);

impl LoggerConfigSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `config` unless a logger of the same name is already present
    pub fn insert(&mut self, config: LoggerConfig) -> bool {
        if self.0.contains_key(&config.name) {
            return false;
        }
        self.0.insert(config.name.clone(), config);
        true
    }

    pub fn get(&self, name: &str) -> Option<&LoggerConfig> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Snapshots in name order
    pub fn iter(&self) -> impl Iterator<Item = &LoggerConfig> {
        self.0.values()
    }
}

impl From<Vec<LoggerConfig>> for LoggerConfigSet {
    fn from(configs: Vec<LoggerConfig>) -> Self {
        let mut set = Self::new();
        for config in configs {
            set.insert(config);
        }
        set
    }
}

impl From<LoggerConfigSet> for Vec<LoggerConfig> {
    fn from(set: LoggerConfigSet) -> Self {
        set.0.into_values().collect()
    }
}

impl FromIterator<LoggerConfig> for LoggerConfigSet {
    fn from_iter<I: IntoIterator<Item = LoggerConfig>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}
