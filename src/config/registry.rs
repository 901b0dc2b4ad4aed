//! Process-wide registry of config cells and the document loader

use super::cell::{ConfigCell, ConfigVar};
use super::value::ConfigValue;
use crate::core::{LoggerError, Result};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

static GLOBAL_CONFIG: Lazy<Arc<ConfigRegistry>> = Lazy::new(|| Arc::new(ConfigRegistry::new()));

/// True when `name` only uses `[a-z0-9._]`
pub fn is_valid_key(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'.' || b == b'_')
}

/// Name to cell map.
///
/// A cell's value type is fixed by the first [`ConfigRegistry::lookup`];
/// looking the same name up under another type fails.
#[derive(Default)]
pub struct ConfigRegistry {
    vars: RwLock<HashMap<String, Arc<dyn ConfigVar>>>,
}

fn downcast<T: ConfigValue>(var: &Arc<dyn ConfigVar>) -> Option<Arc<ConfigCell<T>>> {
    Arc::clone(var).into_any().downcast::<ConfigCell<T>>().ok()
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry, created on first use
    pub fn global() -> Arc<ConfigRegistry> {
        Arc::clone(&GLOBAL_CONFIG)
    }

    /// Fetch the cell called `name`, creating it with `default` on first use
    pub fn lookup<T: ConfigValue>(
        &self,
        name: &str,
        default: T,
        description: &str,
    ) -> Result<Arc<ConfigCell<T>>> {
        let mut vars = self.vars.write();
        if let Some(existing) = vars.get(name) {
            return downcast::<T>(existing).ok_or_else(|| {
                LoggerError::type_mismatch(name, existing.type_name(), std::any::type_name::<T>())
            });
        }

        if !is_valid_key(name) {
            return Err(LoggerError::key_invalid(name));
        }

        let cell = Arc::new(ConfigCell::new(name, default, description));
        vars.insert(name.to_string(), Arc::clone(&cell) as Arc<dyn ConfigVar>);
        Ok(cell)
    }

    /// Typed lookup without creating
    pub fn find<T: ConfigValue>(&self, name: &str) -> Result<Option<Arc<ConfigCell<T>>>> {
        match self.vars.read().get(name) {
            None => Ok(None),
            Some(existing) => downcast::<T>(existing).map(Some).ok_or_else(|| {
                LoggerError::type_mismatch(name, existing.type_name(), std::any::type_name::<T>())
            }),
        }
    }

    pub fn lookup_base(&self, name: &str) -> Option<Arc<dyn ConfigVar>> {
        self.vars.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.read().contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.vars.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Call `f` for every cell, in name order
    pub fn visit<F: FnMut(&dyn ConfigVar)>(&self, mut f: F) {
        let mut vars: Vec<Arc<dyn ConfigVar>> = self.vars.read().values().cloned().collect();
        vars.sort_by(|a, b| a.name().cmp(b.name()));
        for var in vars {
            f(var.as_ref());
        }
    }

    /// Apply every path of `doc` that names a registered cell.
    ///
    /// Paths are lowercased. Unknown paths are ignored and paths with
    /// characters outside the key charset are skipped. A failing path does not
    /// stop the load; the first error is returned once all paths were tried.
    pub fn load_from_document(&self, doc: &Value) -> Result<()> {
        let mut nodes = Vec::new();
        flatten(String::new(), doc, &mut nodes);

        let mut first_error = None;
        for (path, node) in nodes {
            if path.is_empty() {
                continue;
            }
            let key = path.to_lowercase();
            if !is_valid_key(&key) {
                eprintln!(
                    "[LOGGER WARNING] Skipping config path '{}': only [a-z0-9._] are allowed",
                    key
                );
                continue;
            }

            let var = match self.lookup_base(&key) {
                Some(var) => var,
                None => continue,
            };

            let result = node_text(node).and_then(|text| var.load_str(&text));
            if let Err(e) = result {
                eprintln!("[LOGGER ERROR] Failed to load config '{}': {}", key, e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Load a JSON document
    pub fn load_from_str(&self, text: &str) -> Result<()> {
        let doc: Value = serde_json::from_str(text)?;
        self.load_from_document(&doc)
    }

    /// Load a TOML document
    pub fn load_from_toml_str(&self, text: &str) -> Result<()> {
        let table: toml::Table = toml::from_str(text)?;
        let doc = serde_json::to_value(table)?;
        self.load_from_document(&doc)
    }

    /// Load a YAML document
    pub fn load_from_yaml_str(&self, text: &str) -> Result<()> {
        let doc: Value = serde_yaml::from_str(text)?;
        self.load_from_document(&doc)
    }

    /// Load a document file by extension: `.toml` as TOML, `.yaml`/`.yml` as
    /// YAML, anything else as JSON
    pub fn load_from_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                format!("reading config file '{}'", path.display()),
                e.to_string(),
                e,
            )
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "toml" => self.load_from_toml_str(&text),
            "yaml" | "yml" => self.load_from_yaml_str(&text),
            _ => self.load_from_str(&text),
        }
    }

    /// Current values of every cell as a flat name to text map
    pub fn to_document(&self) -> Value {
        let mut node = Map::new();
        self.visit(|var| match var.to_config_string() {
            Ok(text) => {
                node.insert(var.name().to_string(), Value::String(text));
            }
            Err(e) => {
                eprintln!("[LOGGER ERROR] Cannot render config '{}': {}", var.name(), e);
            }
        });
        Value::Object(node)
    }

    /// Teardown hook: forget every cell.
    ///
    /// Listeners stay on the dropped cells; `crate::init()` subscribes again
    /// to a fresh `logs` cell on its next call.
    pub fn reset(&self) {
        self.vars.write().clear();
    }
}

/// Pre-order walk emitting every node with its dotted path; only maps are
/// descended into
fn flatten<'a>(path: String, node: &'a Value, out: &mut Vec<(String, &'a Value)>) {
    if let Value::Object(map) = node {
        out.push((path.clone(), node));
        for (key, child) in map {
            let child_path = if path.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", path, key)
            };
            flatten(child_path, child, out);
        }
    } else {
        out.push((path, node));
    }
}

/// Scalars as their plain text, composites as JSON text
fn node_text(node: &Value) -> Result<String> {
    match node {
        Value::String(text) => Ok(text.clone()),
        Value::Null | Value::Bool(_) | Value::Number(_) => Ok(node.to_string()),
        Value::Array(_) | Value::Object(_) => Ok(serde_json::to_string(node)?),
    }
}
