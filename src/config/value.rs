//! Text conversion for typed config values

use crate::core::{LoggerError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A type that can live in a [`ConfigCell`](super::ConfigCell).
///
/// Values travel as text: JSON for composites, plain or JSON text for
/// scalars. Text that deserializes as a plain string is taken verbatim.
/// Any `serde` type with equality qualifies through the blanket
/// implementation.
pub trait ConfigValue: Clone + PartialEq + Send + Sync + 'static {
    fn from_config_str(text: &str) -> Result<Self>;

    fn to_config_string(&self) -> Result<String>;
}

impl<T> ConfigValue for T
where
    T: Serialize + DeserializeOwned + Clone + PartialEq + Send + Sync + 'static,
{
    fn from_config_str(text: &str) -> Result<Self> {
        // plain text first, so string-like values keep their text verbatim
        if let Ok(value) = serde_json::from_value::<T>(Value::String(text.to_string())) {
            return Ok(value);
        }
        serde_json::from_str::<T>(text).map_err(|e| {
            LoggerError::conversion(std::any::type_name::<T>(), text, e.to_string())
        })
    }

    fn to_config_string(&self) -> Result<String> {
        let value = serde_json::to_value(self).map_err(|e| {
            LoggerError::conversion(std::any::type_name::<T>(), "<value>", e.to_string())
        })?;
        if let Value::String(text) = value {
            return Ok(text);
        }
        // serialize directly so struct fields keep declaration order
        serde_json::to_string(self).map_err(|e| {
            LoggerError::conversion(std::any::type_name::<T>(), "<value>", e.to_string())
        })
    }
}
