// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reader trait definitions.
//!
//! This module defines the primary ports of the crate. A [`Reader`] turns one source
//! into a [`ConfigValue`] tree. A [`FileReader`] knows one file format and can read
//! any file of that format; a [`Source`] is a file reader bound to a single file,
//! which makes it a [`Reader`] as well.

use crate::domain::{ConfigError, ConfigValue, Result};
use std::path::{Path, PathBuf};

/// A configuration source that produces a value tree.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow for use in multi-threaded contexts.
///
/// # Examples
///
/// ```rust
/// use dircfg::ports::Reader;
/// use dircfg::domain::{ConfigValue, Result};
///
/// struct Static;
///
/// impl Reader for Static {
///     fn name(&self) -> &str {
///         "static"
///     }
///
///     fn read(&self) -> Result<ConfigValue> {
///         Ok(ConfigValue::from(serde_json::json!({"debug": true})))
///     }
/// }
///
/// assert_eq!(Static.read().unwrap().lookup("debug"), Some(&ConfigValue::Bool(true)));
/// ```
pub trait Reader: Send + Sync {
    /// Returns a short identifier used in logs and error messages.
    fn name(&self) -> &str;

    /// Reads the source and returns its full value tree.
    fn read(&self) -> Result<ConfigValue>;
}

/// A reader for one file format.
///
/// File readers hold no configuration data; the file to read is passed on each call.
/// This is the type stored in a reader registry.
pub trait FileReader: Send + Sync {
    /// Returns the name of the format, such as `"json"`.
    fn format(&self) -> &str;

    /// Reads and parses the file at `path`.
    ///
    /// # Returns
    ///
    /// * `Ok(ConfigValue)` - The parsed tree
    /// * `Err(ConfigError::ConfigurationNotFound)` - The file is missing or unreadable
    /// * `Err(ConfigError::InvalidConfiguration)` - The content does not parse
    fn read_file(&self, path: &Path) -> Result<ConfigValue>;

    /// Returns the file extensions (without the leading dot) this reader handles.
    fn supported_extensions(&self) -> &[&str];
}

/// A file reader that can be bound to a single file.
///
/// Every `Source` is a [`Reader`] that reads the file it points at.
pub trait Source: FileReader {
    /// Binds the reader to `path`.
    fn point_at(&mut self, path: &Path);

    /// Returns the bound path, if any.
    fn source_path(&self) -> Option<&Path>;

    /// Binds the reader to `path` and returns it.
    fn pointed_at(mut self, path: impl AsRef<Path>) -> Self
    where
        Self: Sized,
    {
        self.point_at(path.as_ref());
        self
    }
}

impl<T: Source> Reader for T {
    fn name(&self) -> &str {
        self.format()
    }

    fn read(&self) -> Result<ConfigValue> {
        let path = self
            .source_path()
            .ok_or_else(|| ConfigError::ConfigurationNotFound {
                path: PathBuf::new(),
                source: Some(format!("{} reader is not bound to a file", self.format()).into()),
            })?;
        self.read_file(path)
    }
}
