// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON file reader.

use crate::domain::{ConfigError, ConfigValue, Result};
use crate::ports::{ConfigParser, FileReader, Filesystem, Source};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Parser for JSON documents.
#[derive(Debug, Clone, Default)]
pub struct JsonParser;

impl JsonParser {
    /// Creates a JSON parser.
    pub fn new() -> Self {
        JsonParser
    }
}

impl ConfigParser for JsonParser {
    fn parse(&self, content: &str) -> Result<ConfigValue> {
        let value: serde_json::Value = serde_json::from_str(content).map_err(|e| {
            ConfigError::invalid(
                format!("Failed to parse JSON: {}", e),
                Some(Box::new(e)),
            )
        })?;
        Ok(ConfigValue::from(value))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }
}

/// Reader for `.json` files.
///
/// # Examples
///
/// ```rust,no_run
/// use dircfg::adapters::{JsonReader, LocalFilesystem};
/// use dircfg::ports::{Reader, Source};
/// use std::sync::Arc;
///
/// let reader = JsonReader::new(Arc::new(LocalFilesystem::new())).pointed_at("config/theme.json");
/// let theme = reader.read().unwrap();
/// println!("{}", theme);
/// ```
#[derive(Debug, Clone)]
pub struct JsonReader {
    filesystem: Arc<dyn Filesystem>,
    path: Option<PathBuf>,
    parser: JsonParser,
}

impl JsonReader {
    /// Creates an unbound reader using `filesystem` for file access.
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            filesystem,
            path: None,
            parser: JsonParser::new(),
        }
    }
}

impl FileReader for JsonReader {
    fn format(&self) -> &str {
        "json"
    }

    fn read_file(&self, path: &Path) -> Result<ConfigValue> {
        self.filesystem.evaluate_as_data(path, &self.parser)
    }

    fn supported_extensions(&self) -> &[&str] {
        self.parser.supported_extensions()
    }
}

impl Source for JsonReader {
    fn point_at(&mut self, path: &Path) {
        self.path = Some(path.to_path_buf());
    }

    fn source_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
