//! In-process capture appender

use crate::core::{Appender, AppenderMetrics, AppenderSettings, LogEvent, Result};
use parking_lot::Mutex;

/// Keeps every rendered event in memory, one entry per event.
///
/// Not part of the default factory; register it under a kind of your choice
/// when a configuration document should be able to declare it.
#[derive(Default)]
pub struct MemoryAppender {
    settings: AppenderSettings,
    metrics: AppenderMetrics,
    entries: Mutex<Vec<String>>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered entries in arrival order
    pub fn lines(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drain captured entries
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.entries.lock())
    }
}

impl Appender for MemoryAppender {
    fn append(&self, event: &LogEvent) -> Result<()> {
        let (level, formatter) = self.settings.snapshot();
        if event.level < level {
            return Ok(());
        }

        let rendered = formatter.format(event);
        self.entries.lock().push(rendered);
        self.metrics.record_written();
        Ok(())
    }

    fn kind(&self) -> &str {
        "memory"
    }

    fn settings(&self) -> &AppenderSettings {
        &self.settings
    }

    fn metrics(&self) -> &AppenderMetrics {
        &self.metrics
    }
}
