// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cached configuration accessor.
//!
//! [`Config`] wraps a single [`Reader`]. The reader is invoked on first access and
//! its tree is kept until [`refresh`](Configuration::refresh) is called, so repeated
//! lookups never touch the underlying source.

use crate::adapters::AggregateReader;
use crate::domain::{ConfigValue, Configuration, Result};
use crate::ports::Reader;
use once_cell::unsync::OnceCell;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Dotted-path accessor over a cached reader snapshot.
///
/// A path is first tried as a literal top-level key, so a key such as `"inc.php"`
/// is found without being split. Otherwise the path is split on `.` and walked
/// segment by segment; numeric segments also index sequences. A top-level key
/// holding `null` does not count as a literal match.
///
/// `Config` is not `Sync`. Callers sharing one across threads must wrap it in a lock.
///
/// # Examples
///
/// ```rust
/// use dircfg::adapters::{Globals, GlobalsReader};
/// use dircfg::prelude::*;
///
/// let globals = Globals::new();
/// globals.set("first", "foo");
///
/// let mut config = Config::new(GlobalsReader::new(globals.clone()));
/// assert_eq!(config.value("first")?, ConfigValue::from("foo"));
///
/// globals.set("first", "bar");
/// assert_eq!(config.value("first")?, ConfigValue::from("foo"));
///
/// config.refresh();
/// assert_eq!(config.value("first")?, ConfigValue::from("bar"));
/// # Ok::<(), ConfigError>(())
/// ```
#[derive(Debug)]
pub struct Config<R: Reader> {
    reader: R,
    values: OnceCell<ConfigValue>,
}

impl<R: Reader> Config<R> {
    /// Creates an accessor over `reader`. Nothing is read until the first lookup.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            values: OnceCell::new(),
        }
    }

    /// Returns the wrapped reader.
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Returns the wrapped reader mutably, dropping the cached snapshot.
    pub fn reader_mut(&mut self) -> &mut R {
        self.values.take();
        &mut self.reader
    }

    /// Consumes the accessor and returns the wrapped reader.
    pub fn into_reader(self) -> R {
        self.reader
    }

    /// Returns `true` if a snapshot is currently cached.
    pub fn is_loaded(&self) -> bool {
        self.values.get().is_some()
    }

    /// Looks up `path` and deserializes the value into `T`.
    ///
    /// Returns `Ok(None)` when the path does not resolve.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TypeConversionError`](crate::domain::ConfigError::TypeConversionError)
    /// if the value does not fit `T`, or the reader's error if the snapshot could
    /// not be loaded.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        self.find(path)?
            .map(|value| value.deserialize_into())
            .transpose()
    }

    // A failed read leaves the cell empty, so the next lookup retries.
    fn values(&self) -> Result<&ConfigValue> {
        self.values.get_or_try_init(|| {
            let values = self.reader.read()?;
            tracing::debug!("Loaded configuration snapshot from '{}' reader", self.reader.name());
            Ok(values)
        })
    }
}

impl Config<AggregateReader> {
    /// Creates an accessor over every configuration file under `directory`.
    ///
    /// Files are read from the local disk with the built-in readers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDirectory`](crate::domain::ConfigError::InvalidDirectory)
    /// if `directory` is not an existing directory.
    pub fn from_directory(directory: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(AggregateReader::from_directory(directory)?))
    }
}

impl<R: Reader> Configuration for Config<R> {
    fn all(&self) -> Result<ConfigValue> {
        Ok(self.values()?.clone())
    }

    fn find(&self, path: &str) -> Result<Option<ConfigValue>> {
        let values = self.values()?;

        if let Some(value) = values.child(path).filter(|value| !value.is_null()) {
            return Ok(Some(value.clone()));
        }

        if !path.contains('.') {
            return Ok(None);
        }

        Ok(values.lookup(path).cloned())
    }

    fn refresh(&mut self) -> &mut Self {
        if self.values.take().is_some() {
            tracing::debug!("Dropped configuration snapshot from '{}' reader", self.reader.name());
        }
        self
    }
}
