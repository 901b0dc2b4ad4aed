//! Console appender implementation

use crate::core::{Appender, AppenderMetrics, AppenderSettings, LogEvent, LoggerError, Result};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::{self, Write};

/// Writes rendered events to stdout.
///
/// The stdout lock is held for the whole write, so lines from concurrent
/// loggers never interleave.
pub struct ConsoleAppender {
    settings: AppenderSettings,
    metrics: AppenderMetrics,
    #[cfg_attr(not(feature = "console"), allow(dead_code))]
    use_colors: bool,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self::with_colors(false)
    }

    /// Colour whole lines by level; ignored without the `console` feature
    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            settings: AppenderSettings::new(),
            metrics: AppenderMetrics::new(),
            use_colors,
        }
    }

    #[cfg(feature = "console")]
    fn write_rendered(&self, event: &LogEvent, rendered: &[u8]) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if !self.use_colors {
            return out.write_all(rendered);
        }

        let text = String::from_utf8_lossy(rendered);
        let body = text.trim_end_matches('\n');
        write!(out, "{}", body.color(event.level.color_code()))?;
        out.write_all(&text.as_bytes()[body.len()..])
    }

    #[cfg(not(feature = "console"))]
    fn write_rendered(&self, _event: &LogEvent, rendered: &[u8]) -> io::Result<()> {
        io::stdout().lock().write_all(rendered)
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&self, event: &LogEvent) -> Result<()> {
        let (level, formatter) = self.settings.snapshot();
        if event.level < level {
            return Ok(());
        }

        let mut rendered = Vec::with_capacity(256);
        formatter.format_into(event, &mut rendered);

        match self.write_rendered(event, &rendered) {
            Ok(()) => {
                self.metrics.record_written();
                Ok(())
            }
            Err(e) => {
                self.metrics.record_dropped();
                Err(LoggerError::io_operation(
                    "writing to stdout",
                    e.to_string(),
                    e,
                ))
            }
        }
    }

    fn flush(&self) -> Result<()> {
        io::stdout().flush()?;
        Ok(())
    }

    fn kind(&self) -> &str {
        "console"
    }

    fn settings(&self) -> &AppenderSettings {
        &self.settings
    }

    fn metrics(&self) -> &AppenderMetrics {
        &self.metrics
    }
}
