// SPDX-License-Identifier: MIT OR Apache-2.0

//! Priority-layered reader.
//!
//! Combines several readers into one. Layers are read from the lowest priority to
//! the highest and each result is overlaid on the previous ones, so a higher layer
//! wins every scalar collision while mappings still merge key by key.
//!
//! # Priority
//!
//! The conventional priorities are [`FILE_PRIORITY`] for configuration directories,
//! [`ENV_PRIORITY`] for environment variables and [`CLI_PRIORITY`] for command-line
//! arguments.

use crate::adapters::{AggregateReader, InMemoryReaders, LocalFilesystem};
use crate::domain::{ConfigValue, Result};
use crate::ports::{Filesystem, Reader};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Priority of configuration files.
pub const FILE_PRIORITY: u8 = 1;

/// Priority of environment variables.
pub const ENV_PRIORITY: u8 = 2;

/// Priority of command-line arguments.
pub const CLI_PRIORITY: u8 = 3;

struct Layer {
    priority: u8,
    reader: Box<dyn Reader>,
}

/// Reader overlaying several readers by priority.
///
/// # Examples
///
/// ```rust
/// use dircfg::adapters::{Globals, GlobalsReader, LayeredReader};
/// use dircfg::domain::ConfigValue;
/// use dircfg::ports::Reader;
///
/// let defaults = Globals::new();
/// defaults.set("port", 80);
/// defaults.set("host", "localhost");
///
/// let overrides = Globals::new();
/// overrides.set("port", 8080);
///
/// let reader = LayeredReader::new()
///     .with_layer(1, GlobalsReader::new(defaults))
///     .with_layer(2, GlobalsReader::new(overrides));
///
/// let values = reader.read().unwrap();
/// assert_eq!(values.lookup("port"), Some(&ConfigValue::Integer(8080)));
/// assert_eq!(values.lookup("host"), Some(&ConfigValue::from("localhost")));
/// ```
#[derive(Default)]
pub struct LayeredReader {
    layers: Vec<Layer>,
}

impl LayeredReader {
    /// Creates a reader with no layers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a reader with the usual layers for an application.
    ///
    /// Environment variables (lowercased, `__` nesting) are always added when the
    /// `env` feature is enabled. The platform configuration directory is added when
    /// it exists.
    pub fn with_defaults(app_name: &str, qualifier: &str) -> Self {
        #[allow(unused_mut)]
        let mut reader = Self::new();

        #[cfg(feature = "env")]
        {
            reader = reader.with_env_vars();
        }

        let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
        let readers = Arc::new(InMemoryReaders::with_defaults(filesystem));
        match AggregateReader::from_default_location(app_name, qualifier, readers) {
            Ok(directory) => reader = reader.with_layer(FILE_PRIORITY, directory),
            Err(e) => tracing::debug!("No default configuration directory for '{}': {}", app_name, e),
        }

        reader
    }

    /// Adds a layer. Layers with equal priority are read in insertion order.
    pub fn add_layer(&mut self, priority: u8, reader: Box<dyn Reader>) {
        let index = self.layers.partition_point(|layer| layer.priority <= priority);
        self.layers.insert(index, Layer { priority, reader });
    }

    /// Builder form of [`add_layer`](LayeredReader::add_layer).
    pub fn with_layer(mut self, priority: u8, reader: impl Reader + 'static) -> Self {
        self.add_layer(priority, Box::new(reader));
        self
    }

    /// Adds an aggregated configuration directory at [`FILE_PRIORITY`].
    pub fn with_directory(self, path: impl AsRef<Path>) -> Result<Self> {
        let directory = AggregateReader::from_directory(path)?;
        Ok(self.with_layer(FILE_PRIORITY, directory))
    }

    /// Adds process environment variables at [`ENV_PRIORITY`].
    #[cfg(feature = "env")]
    pub fn with_env_vars(self) -> Self {
        use crate::adapters::EnvReader;
        self.with_layer(
            ENV_PRIORITY,
            EnvReader::new().lowercase_keys(true).separator("__"),
        )
    }

    /// Adds prefixed process environment variables at [`ENV_PRIORITY`].
    #[cfg(feature = "env")]
    pub fn with_env_prefix(self, prefix: impl Into<String>) -> Self {
        use crate::adapters::EnvReader;
        self.with_layer(
            ENV_PRIORITY,
            EnvReader::new()
                .prefix(prefix)
                .lowercase_keys(true)
                .separator("__"),
        )
    }

    /// Adds command-line arguments at [`CLI_PRIORITY`].
    #[cfg(feature = "cli")]
    pub fn with_cli_args<S: AsRef<str>>(self, args: Vec<S>) -> Self {
        use crate::adapters::ArgsReader;
        self.with_layer(CLI_PRIORITY, ArgsReader::from_args(args))
    }

    /// Returns the layer names, lowest priority first.
    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|layer| layer.reader.name()).collect()
    }

    /// Returns the number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if there are no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl fmt::Debug for LayeredReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.layers
                    .iter()
                    .map(|layer| (layer.priority, layer.reader.name())),
            )
            .finish()
    }
}

impl Reader for LayeredReader {
    fn name(&self) -> &str {
        "layered"
    }

    fn read(&self) -> Result<ConfigValue> {
        let mut values = ConfigValue::mapping();
        for layer in &self.layers {
            tracing::trace!(
                "Reading layer '{}' (priority {})",
                layer.reader.name(),
                layer.priority
            );
            values = values.overlay(layer.reader.read()?);
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{Globals, GlobalsReader};
    use crate::domain::ConfigError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn globals(value: serde_json::Value) -> GlobalsReader {
        let globals = Globals::new();
        if let ConfigValue::Mapping(mapping) = ConfigValue::from(value) {
            for (key, value) in mapping {
                globals.set(key, value);
            }
        }
        GlobalsReader::new(globals)
    }

    struct FailingReader;

    impl Reader for FailingReader {
        fn name(&self) -> &str {
            "failing"
        }

        fn read(&self) -> Result<ConfigValue> {
            Err(ConfigError::invalid("boom", None))
        }
    }

    #[test]
    fn test_empty_layers() {
        let reader = LayeredReader::new();
        assert!(reader.is_empty());
        assert_eq!(reader.read().unwrap(), ConfigValue::mapping());
    }

    #[test]
    fn test_higher_priority_wins() {
        let reader = LayeredReader::new()
            .with_layer(CLI_PRIORITY, globals(json!({"port": "3"})))
            .with_layer(FILE_PRIORITY, globals(json!({"port": 1, "db": {"host": "file", "name": "app"}})))
            .with_layer(ENV_PRIORITY, globals(json!({"port": 2, "db": {"host": "env"}})));

        assert_eq!(reader.len(), 3);
        assert_eq!(
            reader.read().unwrap(),
            ConfigValue::from(json!({"port": "3", "db": {"host": "env", "name": "app"}}))
        );
    }

    #[test]
    fn test_equal_priority_keeps_insertion_order() {
        let reader = LayeredReader::new()
            .with_layer(1, globals(json!({"a": "first"})))
            .with_layer(1, globals(json!({"a": "second"})));
        assert_eq!(
            reader.read().unwrap(),
            ConfigValue::from(json!({"a": "second"}))
        );
    }

    #[test]
    fn test_layer_error_propagates() {
        let reader = LayeredReader::new()
            .with_layer(1, globals(json!({"a": 1})))
            .with_layer(2, FailingReader);
        assert!(matches!(
            reader.read(),
            Err(ConfigError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_layer_names_and_debug() {
        let reader = LayeredReader::new()
            .with_layer(2, FailingReader)
            .with_layer(1, GlobalsReader::default());
        assert_eq!(reader.layer_names(), vec!["globals", "failing"]);
        assert_eq!(format!("{:?}", reader), r#"[(1, "globals"), (2, "failing")]"#);
    }

    #[test]
    fn test_with_directory_rejects_missing_path() {
        let result = LayeredReader::new().with_directory("invalid-directory");
        assert!(matches!(result, Err(ConfigError::InvalidDirectory { .. })));
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_overrides_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("app.json"), r#"{"name": "file", "debug": true}"#).unwrap();

        let reader = LayeredReader::new()
            .with_cli_args(vec!["--app.name=cli"])
            .with_directory(dir.path())
            .unwrap();

        assert_eq!(
            reader.read().unwrap(),
            ConfigValue::from(json!({"app": {"name": "cli", "debug": true}}))
        );
    }
}
