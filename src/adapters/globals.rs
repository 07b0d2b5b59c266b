// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared in-process globals and their reader.

use crate::domain::{ConfigValue, Mapping, Result};
use crate::ports::Reader;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A shared, mutable key/value store standing in for process-wide globals.
///
/// Clones share the same storage, so a value set through one handle is seen by every
/// [`GlobalsReader`] built from another.
///
/// # Examples
///
/// ```rust
/// use dircfg::adapters::{Globals, GlobalsReader};
/// use dircfg::domain::ConfigValue;
/// use dircfg::ports::Reader;
///
/// let globals = Globals::new();
/// globals.set("foo", "bar");
///
/// let reader = GlobalsReader::new(globals.clone());
/// assert_eq!(reader.read().unwrap().lookup("foo"), Some(&ConfigValue::from("bar")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Globals {
    values: Arc<RwLock<Mapping>>,
}

impl Globals {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, returning the previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Option<ConfigValue> {
        self.write().insert(key.into(), value.into())
    }

    /// Returns a copy of the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<ConfigValue> {
        self.read().get(key).cloned()
    }

    /// Removes `key`, returning its value.
    pub fn remove(&self, key: &str) -> Option<ConfigValue> {
        self.write().remove(key)
    }

    /// Removes every value.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Returns a copy of the whole store.
    pub fn snapshot(&self) -> Mapping {
        self.read().clone()
    }

    // A writer that panicked cannot leave a half-inserted map behind.
    fn read(&self) -> RwLockReadGuard<'_, Mapping> {
        self.values.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Mapping> {
        self.values.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<Mapping> for Globals {
    fn from(values: Mapping) -> Self {
        Self {
            values: Arc::new(RwLock::new(values)),
        }
    }
}

/// Reader returning a snapshot of a [`Globals`] store.
#[derive(Debug, Clone, Default)]
pub struct GlobalsReader {
    globals: Globals,
}

impl GlobalsReader {
    /// Creates a reader over `globals`.
    pub fn new(globals: Globals) -> Self {
        Self { globals }
    }

    /// Returns the store this reader snapshots.
    pub fn globals(&self) -> &Globals {
        &self.globals
    }
}

impl Reader for GlobalsReader {
    fn name(&self) -> &str {
        "globals"
    }

    fn read(&self) -> Result<ConfigValue> {
        let snapshot = self.globals.snapshot();
        tracing::trace!("Read {} globals", snapshot.len());
        Ok(ConfigValue::Mapping(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_globals_set_get_remove() {
        let globals = Globals::new();
        assert_eq!(globals.set("first", "foo"), None);
        assert_eq!(globals.set("first", "bar"), Some(ConfigValue::from("foo")));
        assert_eq!(globals.get("first"), Some(ConfigValue::from("bar")));
        assert_eq!(globals.remove("first"), Some(ConfigValue::from("bar")));
        assert_eq!(globals.get("first"), None);
    }

    #[test]
    fn test_globals_clones_share_storage() {
        let globals = Globals::new();
        let other = globals.clone();
        other.set("second", 42);
        assert_eq!(globals.get("second"), Some(ConfigValue::Integer(42)));

        globals.clear();
        assert!(other.snapshot().is_empty());
    }

    #[test]
    fn test_globals_reader_snapshot() {
        let globals = Globals::new();
        globals.set("foo", "bar");
        globals.set(
            "app",
            ConfigValue::from(json!({"name": "Themosis", "debug": true, "version": 1.0})),
        );

        let reader = GlobalsReader::new(globals.clone());
        assert_eq!(reader.name(), "globals");

        let values = reader.read().unwrap();
        assert_eq!(values.lookup("app.name"), Some(&ConfigValue::from("Themosis")));
        assert_eq!(values.lookup("app.version"), Some(&ConfigValue::Float(1.0)));

        globals.set("foo", "baz");
        assert_eq!(values.lookup("foo"), Some(&ConfigValue::from("bar")));
        assert_eq!(
            reader.read().unwrap().lookup("foo"),
            Some(&ConfigValue::from("baz"))
        );
    }

    #[test]
    fn test_globals_reader_empty() {
        let reader = GlobalsReader::default();
        assert_eq!(reader.read().unwrap(), ConfigValue::mapping());
    }

    #[test]
    fn test_globals_from_mapping() {
        let mut mapping = Mapping::new();
        mapping.insert("a".to_string(), ConfigValue::from(1));
        let reader = GlobalsReader::new(Globals::from(mapping));
        assert_eq!(reader.read().unwrap(), ConfigValue::from(json!({"a": 1})));
    }
}
