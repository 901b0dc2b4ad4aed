//! File appender implementation

use crate::core::{Appender, AppenderMetrics, AppenderSettings, LogEvent, LoggerError, Result};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Seconds of event time between two reopens of the backing file
pub const REOPEN_INTERVAL_SECS: i64 = 3;

struct FileSink {
    file: Option<File>,
    last_reopen: Option<DateTime<Utc>>,
}

/// Appends rendered events to a file.
///
/// The file is reopened in append mode before a write whose event timestamp
/// is at least [`REOPEN_INTERVAL_SECS`] past the previous reopen, so an
/// external rotation by rename is picked up without a restart. A failed
/// reopen drops that one event and is retried on the next write.
pub struct FileAppender {
    path: PathBuf,
    settings: AppenderSettings,
    metrics: AppenderMetrics,
    sink: Mutex<FileSink>,
}

fn open_append(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl FileAppender {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = open_append(&path).map_err(|e| {
            LoggerError::io_operation(
                format!("opening log file '{}'", path.display()),
                e.to_string(),
                e,
            )
        })?;

        Ok(Self {
            path,
            settings: AppenderSettings::new(),
            metrics: AppenderMetrics::new(),
            sink: Mutex::new(FileSink {
                file: Some(file),
                last_reopen: None,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn needs_reopen(sink: &FileSink, now: DateTime<Utc>) -> bool {
        match (sink.file.as_ref(), sink.last_reopen) {
            (Some(_), Some(last)) => now >= last + Duration::seconds(REOPEN_INTERVAL_SECS),
            _ => true,
        }
    }
}

impl Appender for FileAppender {
    fn append(&self, event: &LogEvent) -> Result<()> {
        let (level, formatter) = self.settings.snapshot();
        if event.level < level {
            return Ok(());
        }

        let mut rendered = Vec::with_capacity(256);
        formatter.format_into(event, &mut rendered);

        let mut sink = self.sink.lock();
        if Self::needs_reopen(&sink, event.timestamp) {
            // close before reopening
            sink.file = None;
            match open_append(&self.path) {
                Ok(file) => {
                    sink.file = Some(file);
                    sink.last_reopen = Some(event.timestamp);
                    self.metrics.record_reopen();
                }
                Err(e) => {
                    self.metrics.record_dropped();
                    return Err(LoggerError::file_appender(
                        self.path.display().to_string(),
                        format!("reopen failed: {}", e),
                    ));
                }
            }
        }

        let file = match sink.file.as_mut() {
            Some(file) => file,
            None => {
                self.metrics.record_dropped();
                return Err(LoggerError::file_appender(
                    self.path.display().to_string(),
                    "file is not open",
                ));
            }
        };

        if let Err(e) = file.write_all(&rendered) {
            self.metrics.record_dropped();
            return Err(LoggerError::io_operation(
                format!("writing to '{}'", self.path.display()),
                e.to_string(),
                e,
            ));
        }
        self.metrics.record_written();
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let mut sink = self.sink.lock();
        if let Some(file) = sink.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }

    fn kind(&self) -> &str {
        "file"
    }

    fn settings(&self) -> &AppenderSettings {
        &self.settings
    }

    fn metrics(&self) -> &AppenderMetrics {
        &self.metrics
    }

    fn to_document(&self) -> Value {
        let mut doc = self.settings.to_document(self.kind());
        if let Value::Object(ref mut node) = doc {
            node.insert(
                "file".to_string(),
                Value::String(self.path.display().to_string()),
            );
        }
        doc
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
