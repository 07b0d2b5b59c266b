// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML file reader.
//!
//! This module provides a reader for `.yaml` and `.yml` files. Mapping keys must be
//! scalars; numbers and booleans used as keys are turned into their string form.

use crate::domain::{ConfigError, ConfigValue, Mapping, Result};
use crate::ports::{ConfigParser, FileReader, Filesystem, Source};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Parser for YAML documents.
#[derive(Debug, Clone, Default)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a YAML parser.
    pub fn new() -> Self {
        YamlParser
    }

    fn convert(value: serde_yaml::Value) -> Result<ConfigValue> {
        Ok(match value {
            serde_yaml::Value::Null => ConfigValue::Null,
            serde_yaml::Value::Bool(b) => ConfigValue::Bool(b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => ConfigValue::Integer(i),
                None => ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_yaml::Value::String(s) => ConfigValue::String(s),
            serde_yaml::Value::Sequence(seq) => ConfigValue::Sequence(
                seq.into_iter()
                    .map(Self::convert)
                    .collect::<Result<Vec<_>>>()?,
            ),
            serde_yaml::Value::Mapping(map) => {
                let mut mapping = Mapping::new();
                for (key, val) in map {
                    mapping.insert(Self::key(key)?, Self::convert(val)?);
                }
                ConfigValue::Mapping(mapping)
            }
            serde_yaml::Value::Tagged(tagged) => Self::convert(tagged.value)?,
        })
    }

    fn key(key: serde_yaml::Value) -> Result<String> {
        match key {
            serde_yaml::Value::String(s) => Ok(s),
            serde_yaml::Value::Number(n) => Ok(n.to_string()),
            serde_yaml::Value::Bool(b) => Ok(b.to_string()),
            serde_yaml::Value::Null => Ok(String::new()),
            serde_yaml::Value::Tagged(tagged) => Self::key(tagged.value),
            _ => Err(ConfigError::invalid(
                "YAML mapping keys must be scalars",
                None,
            )),
        }
    }
}

impl ConfigParser for YamlParser {
    fn parse(&self, content: &str) -> Result<ConfigValue> {
        let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| {
            ConfigError::invalid(format!("Failed to parse YAML: {}", e), Some(Box::new(e)))
        })?;
        Self::convert(value)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

/// Reader for `.yaml` and `.yml` files.
#[derive(Debug, Clone)]
pub struct YamlReader {
    filesystem: Arc<dyn Filesystem>,
    path: Option<PathBuf>,
    parser: YamlParser,
}

impl YamlReader {
    /// Creates an unbound reader using `filesystem` for file access.
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            filesystem,
            path: None,
            parser: YamlParser::new(),
        }
    }
}

impl FileReader for YamlReader {
    fn format(&self) -> &str {
        "yaml"
    }

    fn read_file(&self, path: &Path) -> Result<ConfigValue> {
        self.filesystem.evaluate_as_data(path, &self.parser)
    }

    fn supported_extensions(&self) -> &[&str] {
        self.parser.supported_extensions()
    }
}

impl Source for YamlReader {
    fn point_at(&mut self, path: &Path) {
        self.path = Some(path.to_path_buf());
    }

    fn source_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
