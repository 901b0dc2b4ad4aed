//! Typed config cells with change listeners

use super::value::ConfigValue;
use crate::core::Result;
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Change callback receiving `(old, new)`
pub type ConfigListener<T> = Arc<dyn Fn(&T, &T) -> Result<()> + Send + Sync>;

static NEXT_LISTENER_KEY: AtomicU64 = AtomicU64::new(1);

/// Type-erased view of a [`ConfigCell`], used by the document loader
pub trait ConfigVar: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Name of the value type the cell was created with
    fn type_name(&self) -> &'static str;

    fn to_config_string(&self) -> Result<String>;

    /// Parse `text` and store it through [`ConfigCell::set_value`]
    fn load_str(&self, text: &str) -> Result<()>;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

struct CellState<T> {
    value: T,
    listeners: BTreeMap<u64, ConfigListener<T>>,
}

/// A named, typed configuration value.
///
/// Writers are serialized. Listeners run on the writing thread before the
/// new value is committed, without any lock on the value held, so they may
/// read the cell (seeing the old value) or manage listeners. A listener must
/// not call [`ConfigCell::set_value`] on its own cell.
pub struct ConfigCell<T: ConfigValue> {
    name: String,
    description: String,
    update: Mutex<()>,
    state: RwLock<CellState<T>>,
}

impl<T: ConfigValue> ConfigCell<T> {
    pub fn new(name: impl Into<String>, default: T, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            update: Mutex::new(()),
            state: RwLock::new(CellState {
                value: default,
                listeners: BTreeMap::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn value(&self) -> T {
        self.state.read().value.clone()
    }

    /// Borrow the current value without cloning it
    pub fn with_value<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.state.read().value)
    }

    /// Replace the value, notifying every listener first.
    ///
    /// An equal value is a no-op. The value is committed even when a listener
    /// fails; the first listener error is returned.
    pub fn set_value(&self, value: T) -> Result<()> {
        let _update = self.update.lock();

        let (old, listeners) = {
            let state = self.state.read();
            if state.value == value {
                return Ok(());
            }
            let listeners: Vec<ConfigListener<T>> = state.listeners.values().cloned().collect();
            (state.value.clone(), listeners)
        };

        let mut first_error = None;
        for listener in listeners {
            if let Err(e) = listener(&old, &value) {
                first_error.get_or_insert(e);
            }
        }

        self.state.write().value = value;

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Subscribe to changes; the returned key removes this subscription
    pub fn add_listener<F>(&self, listener: F) -> u64
    where
        F: Fn(&T, &T) -> Result<()> + Send + Sync + 'static,
    {
        let key = NEXT_LISTENER_KEY.fetch_add(1, Ordering::Relaxed);
        self.state.write().listeners.insert(key, Arc::new(listener));
        key
    }

    pub fn del_listener(&self, key: u64) -> bool {
        self.state.write().listeners.remove(&key).is_some()
    }

    pub fn get_listener(&self, key: u64) -> Option<ConfigListener<T>> {
        self.state.read().listeners.get(&key).cloned()
    }

    pub fn clear_listeners(&self) {
        self.state.write().listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.state.read().listeners.len()
    }
}

impl<T: ConfigValue> ConfigVar for ConfigCell<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn to_config_string(&self) -> Result<String> {
        self.with_value(|value| value.to_config_string())
    }

    fn load_str(&self, text: &str) -> Result<()> {
        let value = T::from_config_str(text)?;
        self.set_value(value)
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl<T: ConfigValue + fmt::Debug> fmt::Debug for ConfigCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("ConfigCell")
            .field("name", &self.name)
            .field("value", &state.value)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}
