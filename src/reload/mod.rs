//! Hot reload of logger topology from configuration documents

pub mod reconciler;
pub mod snapshot;

pub use reconciler::{init, ReloadReconciler, LOGS_CONFIG_KEY};
pub use snapshot::{AppenderConfig, LoggerConfig, LoggerConfigSet};
