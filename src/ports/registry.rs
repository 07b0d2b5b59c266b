// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reader registry trait definition.

use crate::domain::{ReaderKey, Result};
use crate::ports::FileReader;
use std::sync::Arc;

/// A mapping from [`ReaderKey`] to the [`FileReader`] handling that extension.
///
/// A miss is reported as `ConfigError::ReaderNotFound` carrying the key, so that the
/// directory engine can decide between skipping the file and aborting.
///
/// # Examples
///
/// ```rust
/// use dircfg::adapters::{InMemoryReaders, JsonReader, LocalFilesystem};
/// use dircfg::domain::{ConfigError, ReaderKey};
/// use dircfg::ports::Readers;
/// use std::sync::Arc;
///
/// let mut readers = InMemoryReaders::new();
/// readers.add(ReaderKey::from("json"), Arc::new(JsonReader::new(Arc::new(LocalFilesystem::new()))));
///
/// assert!(readers.find(&ReaderKey::from(".json")).is_ok());
/// assert!(matches!(
///     readers.find(&ReaderKey::from("toml")),
///     Err(ConfigError::ReaderNotFound { .. })
/// ));
/// ```
pub trait Readers: Send + Sync {
    /// Stores `reader` under `key`, replacing any earlier entry.
    fn add(&mut self, key: ReaderKey, reader: Arc<dyn FileReader>);

    /// Returns the reader registered under `key`.
    fn find(&self, key: &ReaderKey) -> Result<Arc<dyn FileReader>>;

    /// Registers `reader` under every extension it reports as supported.
    fn add_all(&mut self, reader: Arc<dyn FileReader>) {
        let keys: Vec<ReaderKey> = reader
            .supported_extensions()
            .iter()
            .map(ReaderKey::new)
            .collect();
        for key in keys {
            self.add(key, Arc::clone(&reader));
        }
    }
}
