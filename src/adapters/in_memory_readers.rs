// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory reader registry.

use crate::domain::{ConfigError, ReaderKey, Result};
use crate::ports::{FileReader, Filesystem, Readers};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// [`Readers`] implementation keeping readers in a `HashMap`.
///
/// # Examples
///
/// ```rust
/// use dircfg::adapters::{InMemoryReaders, LocalFilesystem};
/// use dircfg::domain::ReaderKey;
/// use dircfg::ports::Readers;
/// use std::sync::Arc;
///
/// let readers = InMemoryReaders::with_defaults(Arc::new(LocalFilesystem::new()));
/// assert_eq!(readers.find(&ReaderKey::from("json")).unwrap().format(), "json");
/// ```
#[derive(Default)]
pub struct InMemoryReaders {
    readers: HashMap<ReaderKey, Arc<dyn FileReader>>,
}

impl InMemoryReaders {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in file reader.
    ///
    /// JSON is always registered; PHP and YAML depend on the `php` and `yaml`
    /// features.
    pub fn with_defaults(filesystem: Arc<dyn Filesystem>) -> Self {
        let mut readers = Self::new();

        readers.add_all(Arc::new(crate::adapters::JsonReader::new(Arc::clone(
            &filesystem,
        ))));

        #[cfg(feature = "php")]
        readers.add_all(Arc::new(crate::adapters::PhpReader::new(Arc::clone(
            &filesystem,
        ))));

        #[cfg(feature = "yaml")]
        readers.add_all(Arc::new(crate::adapters::YamlReader::new(Arc::clone(
            &filesystem,
        ))));

        readers
    }

    /// Registers a reader and returns the registry.
    pub fn with_reader(mut self, key: impl Into<ReaderKey>, reader: Arc<dyn FileReader>) -> Self {
        self.add(key.into(), reader);
        self
    }

    /// Returns the registered keys, sorted.
    pub fn keys(&self) -> Vec<&ReaderKey> {
        let mut keys: Vec<&ReaderKey> = self.readers.keys().collect();
        keys.sort();
        keys
    }

    /// Returns the number of registered keys.
    pub fn len(&self) -> usize {
        self.readers.len()
    }

    /// Returns `true` if no reader is registered.
    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }
}

impl fmt::Debug for InMemoryReaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryReaders")
            .field("keys", &self.keys())
            .finish()
    }
}

impl Readers for InMemoryReaders {
    fn add(&mut self, key: ReaderKey, reader: Arc<dyn FileReader>) {
        tracing::debug!("Registering '{}' reader for key '{}'", reader.format(), key);
        self.readers.insert(key, reader);
    }

    fn find(&self, key: &ReaderKey) -> Result<Arc<dyn FileReader>> {
        self.readers
            .get(key)
            .cloned()
            .ok_or_else(|| ConfigError::ReaderNotFound { key: key.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigValue;
    use std::path::Path;

    struct NamedReader(&'static str);

    impl FileReader for NamedReader {
        fn format(&self) -> &str {
            self.0
        }

        fn read_file(&self, _path: &Path) -> Result<ConfigValue> {
            Ok(ConfigValue::from(self.0))
        }

        fn supported_extensions(&self) -> &[&str] {
            &["one", "two"]
        }
    }

    #[test]
    fn test_find_registered_reader() {
        let readers =
            InMemoryReaders::new().with_reader("php", Arc::new(NamedReader("php")));
        let reader = readers.find(&ReaderKey::from(" .php")).unwrap();
        assert_eq!(reader.format(), "php");
    }

    #[test]
    fn test_find_missing_reader_carries_key() {
        let readers = InMemoryReaders::new();
        let err = match readers.find(&ReaderKey::from("license")) {
            Err(err) => err,
            Ok(_) => panic!("expected a registry miss"),
        };
        assert!(matches!(err, ConfigError::ReaderNotFound { .. }));
        assert_eq!(err.reader_key(), Some(&ReaderKey::from("license")));
    }

    #[test]
    fn test_add_overwrites_silently() {
        let mut readers = InMemoryReaders::new();
        readers.add(ReaderKey::from("json"), Arc::new(NamedReader("first")));
        readers.add(ReaderKey::from("json"), Arc::new(NamedReader("second")));

        assert_eq!(readers.len(), 1);
        let reader = readers.find(&ReaderKey::from("json")).unwrap();
        assert_eq!(reader.format(), "second");
    }

    #[test]
    fn test_add_all_uses_supported_extensions() {
        let mut readers = InMemoryReaders::new();
        readers.add_all(Arc::new(NamedReader("multi")));

        let keys: Vec<&str> = readers.keys().into_iter().map(ReaderKey::as_str).collect();
        assert_eq!(keys, vec!["one", "two"]);
    }

    #[test]
    fn test_with_defaults() {
        let readers =
            InMemoryReaders::with_defaults(Arc::new(crate::adapters::LocalFilesystem::new()));
        assert!(readers.find(&ReaderKey::from("json")).is_ok());
        #[cfg(feature = "php")]
        assert!(readers.find(&ReaderKey::from("php")).is_ok());
        #[cfg(feature = "yaml")]
        {
            assert!(readers.find(&ReaderKey::from("yaml")).is_ok());
            assert!(readers.find(&ReaderKey::from("yml")).is_ok());
        }
        assert!(readers.find(&ReaderKey::from("license")).is_err());
    }

    #[test]
    fn test_empty_registry() {
        let readers = InMemoryReaders::new();
        assert!(readers.is_empty());
        assert_eq!(format!("{:?}", readers), "InMemoryReaders { keys: [] }");
    }
}
