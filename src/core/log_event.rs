//! Log event structure

use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

static PROCESS_START: Lazy<Instant> = Lazy::new(Instant::now);
static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
    static THREAD_NAME_CACHE: RefCell<Option<Arc<str>>> = const { RefCell::new(None) };
}

/// Numeric id of the calling thread, assigned on first use
pub fn current_thread_id() -> u64 {
    THREAD_ID_CACHE.with(|id| *id)
}

/// Name of the calling thread, `<unnamed>` when it has none
pub fn current_thread_name() -> Arc<str> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| {
                Arc::from(std::thread::current().name().unwrap_or("<unnamed>"))
            })
            .clone()
    })
}

/// Milliseconds since the process first queried the event clock
pub fn elapsed_ms() -> u64 {
    PROCESS_START.elapsed().as_millis() as u64
}

/// Immutable snapshot of one logging call.
///
/// Built by the call-site macros (or the `Logger` convenience methods) and
/// consumed synchronously by the appenders of the resolved logger.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub logger: Arc<str>,
    pub level: LogLevel,
    pub file: &'static str,
    pub line: u32,
    pub elapsed_ms: u64,
    pub thread_id: u64,
    pub task_id: u64,
    pub timestamp: DateTime<Utc>,
    pub thread_name: Arc<str>,
    pub message: String,
}

impl LogEvent {
    pub fn new(logger: Arc<str>, level: LogLevel) -> Self {
        Self {
            logger,
            level,
            file: "",
            line: 0,
            elapsed_ms: elapsed_ms(),
            thread_id: current_thread_id(),
            task_id: 0,
            timestamp: Utc::now(),
            thread_name: current_thread_name(),
            message: String::new(),
        }
    }

    pub fn with_location(mut self, file: &'static str, line: u32) -> Self {
        self.file = file;
        self.line = line;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Attach the id of the task (fiber, coroutine) the call was made from
    pub fn with_task_id(mut self, task_id: u64) -> Self {
        self.task_id = task_id;
        self
    }

    pub fn with_thread_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.thread_name = name.into();
        self
    }

    pub fn with_elapsed_ms(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }
}
