// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration accessor trait definition.
//!
//! This module defines the `Configuration` trait, the interface callers use to look
//! values up by dotted path once a reader has been wired behind it.

use crate::domain::{ConfigValue, Result};

/// The main configuration accessor trait.
///
/// Lookups never fail because a path is missing: an unresolved path yields the
/// fallback. Errors only come from the underlying reader.
///
/// # Examples
///
/// ```rust
/// use dircfg::domain::{ConfigValue, Configuration, Result};
///
/// struct Fixed(ConfigValue);
///
/// impl Configuration for Fixed {
///     fn all(&self) -> Result<ConfigValue> {
///         Ok(self.0.clone())
///     }
///
///     fn find(&self, path: &str) -> Result<Option<ConfigValue>> {
///         Ok(self.0.lookup(path).cloned())
///     }
///
///     fn refresh(&mut self) -> &mut Self {
///         self
///     }
/// }
///
/// let config = Fixed(ConfigValue::from(serde_json::json!({"app": {"name": "Themosis"}})));
/// assert_eq!(config.value("app.name").unwrap(), ConfigValue::from("Themosis"));
/// assert_eq!(config.get_or("app.missing", "bar").unwrap(), ConfigValue::from("bar"));
/// ```
pub trait Configuration {
    /// Returns the whole configuration tree.
    fn all(&self) -> Result<ConfigValue>;

    /// Resolves `path` against the tree.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(ConfigValue))` - The path resolved
    /// * `Ok(None)` - The path does not resolve
    /// * `Err(ConfigError)` - The underlying reader failed
    fn find(&self, path: &str) -> Result<Option<ConfigValue>>;

    /// Discards any cached values so the next lookup reads the source again.
    fn refresh(&mut self) -> &mut Self
    where
        Self: Sized;

    /// Retrieves the value at `path`, or `fallback` when the path does not resolve.
    ///
    /// A `None` path returns the whole tree.
    ///
    /// # Arguments
    ///
    /// * `path` - A top-level key or a dot-separated path
    /// * `fallback` - The value returned when `path` does not resolve
    fn get(&self, path: Option<&str>, fallback: ConfigValue) -> Result<ConfigValue> {
        match path {
            None => self.all(),
            Some(path) => Ok(self.find(path)?.unwrap_or(fallback)),
        }
    }

    /// Retrieves the value at `path`, or `fallback` when the path does not resolve.
    fn get_or(&self, path: &str, fallback: impl Into<ConfigValue>) -> Result<ConfigValue>
    where
        Self: Sized,
    {
        self.get(Some(path), fallback.into())
    }

    /// Retrieves the value at `path`, or `Null` when the path does not resolve.
    fn value(&self, path: &str) -> Result<ConfigValue> {
        self.get(Some(path), ConfigValue::Null)
    }

    /// Checks whether `path` resolves. A present `null` counts as resolved.
    fn has(&self, path: &str) -> Result<bool> {
        Ok(self.find(path)?.is_some())
    }
}
