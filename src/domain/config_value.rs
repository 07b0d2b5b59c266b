// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration value tree.
//!
//! This module provides the `ConfigValue` type, the universal representation every
//! reader produces: a scalar, a sequence, or a mapping of further values. It also
//! holds the two merge strategies used by the crate and the dotted-path walk used by
//! the accessor.

use crate::domain::errors::{ConfigError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A mapping from string keys to configuration values, ordered by key.
pub type Mapping = BTreeMap<String, ConfigValue>;

/// A recursively defined configuration value.
///
/// Values carry only the types the source format natively has; nothing is coerced.
/// Sequence items can be addressed by their index as a string, so `servers.0` walks
/// into the first element of a `servers` sequence exactly like a mapping key.
///
/// # Examples
///
/// ```
/// use dircfg::domain::ConfigValue;
/// use serde_json::json;
///
/// let value = ConfigValue::from(json!({"wp": {"home": "http://themosis.com"}}));
/// assert_eq!(
///     value.lookup("wp.home").and_then(ConfigValue::as_str),
///     Some("http://themosis.com")
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// An absent value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    String(String),
    /// An ordered list of values.
    Sequence(Vec<ConfigValue>),
    /// A keyed collection of values.
    Mapping(Mapping),
}

impl ConfigValue {
    /// Creates an empty mapping.
    pub fn mapping() -> Self {
        ConfigValue::Mapping(Mapping::new())
    }

    /// Returns `true` for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Returns `true` for mappings and sequences, the values a path can walk into.
    pub fn is_traversable(&self) -> bool {
        matches!(self, ConfigValue::Mapping(_) | ConfigValue::Sequence(_))
    }

    /// Returns the string if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean if this value is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this value is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the float if this value is a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the items if this value is a sequence.
    pub fn as_sequence(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries if this value is a mapping.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            ConfigValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns a short name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "bool",
            ConfigValue::Integer(_) => "integer",
            ConfigValue::Float(_) => "float",
            ConfigValue::String(_) => "string",
            ConfigValue::Sequence(_) => "sequence",
            ConfigValue::Mapping(_) => "mapping",
        }
    }

    /// Returns the direct child addressed by `segment`.
    ///
    /// Mappings are indexed by key. Sequences are indexed by the canonical decimal
    /// form of the position (`"0"`, `"12"`, not `"01"`). Scalars have no children.
    pub fn child(&self, segment: &str) -> Option<&ConfigValue> {
        match self {
            ConfigValue::Mapping(map) => map.get(segment),
            ConfigValue::Sequence(items) => segment
                .parse::<usize>()
                .ok()
                .filter(|index| index.to_string() == segment)
                .and_then(|index| items.get(index)),
            _ => None,
        }
    }

    /// Walks a dot-separated path and returns the value it reaches.
    ///
    /// Returns `None` as soon as a segment is missing or a scalar blocks the walk.
    ///
    /// # Examples
    ///
    /// ```
    /// use dircfg::domain::ConfigValue;
    /// use serde_json::json;
    ///
    /// let value = ConfigValue::from(json!({"colors": [{"slug": "primary"}]}));
    /// assert_eq!(value.lookup("colors.0.slug"), Some(&ConfigValue::from("primary")));
    /// assert_eq!(value.lookup("colors.0.slug.more"), None);
    /// ```
    pub fn lookup(&self, path: &str) -> Option<&ConfigValue> {
        path.split('.')
            .try_fold(self, |current, segment| current.child(segment))
    }

    /// Merges `other` into `self` without overwriting anything.
    ///
    /// Mappings merge key by key, recursively. Where the two sides are not both
    /// mappings, both values are kept: sequences are concatenated, scalars are
    /// collected into a sequence, and non-mapping values merged into a mapping are
    /// appended after the largest integer key already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use dircfg::domain::ConfigValue;
    /// use serde_json::json;
    ///
    /// let left = ConfigValue::from(json!({"global": {"styles": {"a": 1}}}));
    /// let right = ConfigValue::from(json!({"global": {"themes": {"b": 2}, "styles": {"a": 3}}}));
    ///
    /// let merged = left.merge_recursive(right);
    /// assert_eq!(merged, ConfigValue::from(json!({
    ///     "global": {"styles": {"a": [1, 3]}, "themes": {"b": 2}}
    /// })));
    /// ```
    pub fn merge_recursive(self, other: ConfigValue) -> ConfigValue {
        match (self, other) {
            (ConfigValue::Mapping(mut left), ConfigValue::Mapping(right)) => {
                for (key, value) in right {
                    let merged = match left.remove(&key) {
                        Some(existing) => existing.merge_recursive(value),
                        None => value,
                    };
                    left.insert(key, merged);
                }
                ConfigValue::Mapping(left)
            }
            (ConfigValue::Mapping(mut left), other) => {
                for item in other.into_items() {
                    push_indexed(&mut left, item);
                }
                ConfigValue::Mapping(left)
            }
            (this, ConfigValue::Mapping(right)) => {
                let mut left = Mapping::new();
                for item in this.into_items() {
                    push_indexed(&mut left, item);
                }
                ConfigValue::Mapping(left).merge_recursive(ConfigValue::Mapping(right))
            }
            (this, other) => {
                let mut items = this.into_items();
                items.extend(other.into_items());
                ConfigValue::Sequence(items)
            }
        }
    }

    /// Merges `other` over `self`, letting `other` win every non-mapping collision.
    ///
    /// Mappings merge key by key, recursively; anything else is replaced.
    pub fn overlay(self, other: ConfigValue) -> ConfigValue {
        match (self, other) {
            (ConfigValue::Mapping(mut base), ConfigValue::Mapping(overlay)) => {
                for (key, value) in overlay {
                    let merged = match base.remove(&key) {
                        Some(existing) => existing.overlay(value),
                        None => value,
                    };
                    base.insert(key, merged);
                }
                ConfigValue::Mapping(base)
            }
            (_, overlay) => overlay,
        }
    }

    /// Deserializes this value into any `DeserializeOwned` type.
    ///
    /// Only the value's native types are used; a string holding `"42"` does not
    /// become an integer.
    ///
    /// # Examples
    ///
    /// ```
    /// use dircfg::domain::ConfigValue;
    /// use serde::Deserialize;
    /// use serde_json::json;
    ///
    /// #[derive(Deserialize)]
    /// struct Database {
    ///     default: String,
    /// }
    ///
    /// let value = ConfigValue::from(json!({"default": "sqlite"}));
    /// let database: Database = value.deserialize_into().unwrap();
    /// assert_eq!(database.default, "sqlite");
    /// ```
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T> {
        let json = serde_json::to_value(self).map_err(|e| type_conversion::<T>(e))?;
        serde_json::from_value(json).map_err(|e| type_conversion::<T>(e))
    }

    fn into_items(self) -> Vec<ConfigValue> {
        match self {
            ConfigValue::Sequence(items) => items,
            other => vec![other],
        }
    }
}

fn type_conversion<T>(err: serde_json::Error) -> ConfigError {
    ConfigError::TypeConversionError {
        target_type: std::any::type_name::<T>().to_string(),
        source: Box::new(err),
    }
}

/// Stores `value` under one past the largest integer key in `map`, or `"0"` if none.
fn push_indexed(map: &mut Mapping, value: ConfigValue) {
    let next = map
        .keys()
        .filter_map(|key| key.parse::<i64>().ok().filter(|n| n.to_string() == *key))
        .max()
        .map_or(0, |max| max.saturating_add(1));
    map.insert(next.to_string(), value);
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ConfigValue::Null,
            serde_json::Value::Bool(b) => ConfigValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ConfigValue::Integer(i),
                None => ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => ConfigValue::String(s),
            serde_json::Value::Array(items) => {
                ConfigValue::Sequence(items.into_iter().map(ConfigValue::from).collect())
            }
            serde_json::Value::Object(map) => ConfigValue::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, ConfigValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i32> for ConfigValue {
    fn from(n: i32) -> Self {
        ConfigValue::Integer(n.into())
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        ConfigValue::Integer(n)
    }
}

impl From<u32> for ConfigValue {
    fn from(n: u32) -> Self {
        ConfigValue::Integer(n.into())
    }
}

impl From<f64> for ConfigValue {
    fn from(n: f64) -> Self {
        ConfigValue::Float(n)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(items: Vec<T>) -> Self {
        ConfigValue::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl From<Mapping> for ConfigValue {
    fn from(map: Mapping) -> Self {
        ConfigValue::Mapping(map)
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ConfigValue::Null, Into::into)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Null => write!(f, "null"),
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Integer(n) => write!(f, "{}", n),
            ConfigValue::Float(n) => write!(f, "{}", n),
            ConfigValue::String(s) => write!(f, "{}", s),
            compound => {
                let json = serde_json::to_string(compound).map_err(|_| fmt::Error)?;
                write!(f, "{}", json)
            }
        }
    }
}
