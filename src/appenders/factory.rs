//! String-keyed appender construction

use super::{ConsoleAppender, FileAppender};
use crate::core::{Appender, LoggerError, Result};
use crate::reload::AppenderConfig;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Builds an appender from its descriptor
pub type AppenderBuilder = Arc<dyn Fn(&AppenderConfig) -> Result<Arc<dyn Appender>> + Send + Sync>;

/// Maps the `type` discriminator of appender descriptors to builders.
///
/// New kinds are added with [`AppenderFactory::register`]. Kind names are
/// matched case-insensitively.
pub struct AppenderFactory {
    builders: RwLock<HashMap<String, AppenderBuilder>>,
}

impl AppenderFactory {
    /// Factory without any kinds
    pub fn new() -> Self {
        Self {
            builders: RwLock::new(HashMap::new()),
        }
    }

    /// Factory knowing `console` and `file`
    pub fn with_defaults() -> Self {
        let factory = Self::new();
        factory.register("console", |_config: &AppenderConfig| {
            Ok(Arc::new(ConsoleAppender::new()) as Arc<dyn Appender>)
        });
        factory.register("file", |config: &AppenderConfig| {
            let path = config
                .file
                .as_ref()
                .ok_or_else(|| LoggerError::appender_config("file", "missing 'file' path"))?;
            Ok(Arc::new(FileAppender::new(path)?) as Arc<dyn Appender>)
        });
        factory
    }

    /// Register or replace the builder for `kind`
    pub fn register<S, F>(&self, kind: S, builder: F)
    where
        S: Into<String>,
        F: Fn(&AppenderConfig) -> Result<Arc<dyn Appender>> + Send + Sync + 'static,
    {
        let kind = kind.into().to_lowercase();
        self.builders.write().insert(kind, Arc::new(builder));
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.builders.read().contains_key(&kind.to_lowercase())
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.builders.read().keys().cloned().collect();
        kinds.sort();
        kinds
    }

    /// Construct a bare appender for `config`; level and formatter are left
    /// to the caller
    pub fn create(&self, config: &AppenderConfig) -> Result<Arc<dyn Appender>> {
        let builder = self
            .builders
            .read()
            .get(&config.kind.to_lowercase())
            .cloned()
            .ok_or_else(|| {
                LoggerError::appender_config(config.kind.clone(), "unknown appender type")
            })?;
        builder(config)
    }
}

impl Default for AppenderFactory {
    fn default() -> Self {
        Self::with_defaults()
    }
}
