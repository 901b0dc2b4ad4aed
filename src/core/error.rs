//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Config key contains characters outside `[a-z0-9._]`
    #[error("Invalid config key '{key}': only [a-z0-9._] are allowed")]
    KeyInvalid { key: String },

    /// Config key already registered under another value type
    #[error("Config '{name}' is registered as {existing}, requested as {requested}")]
    TypeMismatch {
        name: String,
        existing: &'static str,
        requested: &'static str,
    },

    /// Text could not be converted into a typed config value (or back)
    #[error("Cannot convert '{value}' to {type_name}: {message}")]
    Conversion {
        type_name: &'static str,
        value: String,
        message: String,
    },

    /// A pattern with its error flag set was about to be installed
    #[error("Invalid log pattern '{pattern}'")]
    InvalidPattern { pattern: String },

    /// Appender descriptor is incomplete or names an unknown kind
    #[error("Invalid appender configuration ({kind}): {message}")]
    AppenderConfig { kind: String, message: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON document error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML document error
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// YAML document error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File appender error with path
    #[error("File appender error for '{path}': {message}")]
    FileAppenderError { path: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an invalid key error
    pub fn key_invalid(key: impl Into<String>) -> Self {
        LoggerError::KeyInvalid { key: key.into() }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(
        name: impl Into<String>,
        existing: &'static str,
        requested: &'static str,
    ) -> Self {
        LoggerError::TypeMismatch {
            name: name.into(),
            existing,
            requested,
        }
    }

    /// Create a conversion error
    pub fn conversion(
        type_name: &'static str,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LoggerError::Conversion {
            type_name,
            value: value.into(),
            message: message.into(),
        }
    }

    pub fn invalid_pattern(pattern: impl Into<String>) -> Self {
        LoggerError::InvalidPattern {
            pattern: pattern.into(),
        }
    }

    /// Create an appender configuration error
    pub fn appender_config(kind: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::AppenderConfig {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file appender error
    pub fn file_appender(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileAppenderError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}
