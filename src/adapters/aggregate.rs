// SPDX-License-Identifier: MIT OR Apache-2.0

//! Directory aggregation reader.
//!
//! [`AggregateReader`] walks a directory tree, reads every file with the reader
//! registered for its extension and merges the results into one tree. Each file's
//! values are nested under its path relative to the root: `global/styles.json` lands
//! under `global.styles`.

use crate::adapters::local_filesystem::relative_dirs;
use crate::adapters::{InMemoryReaders, LocalFilesystem};
use crate::domain::{ConfigError, ConfigValue, Mapping, ReaderKey, Result};
use crate::ports::{FileEntry, Filesystem, Reader, Readers};
use directories::ProjectDirs;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Reader aggregating every file under a directory.
///
/// Files are visited in file name order. Their trees are combined with
/// [`ConfigValue::merge_recursive`], so nothing read from one file is overwritten by
/// another. A file whose extension has no registered reader aborts the read with
/// [`ConfigError::UnsupportedReader`] unless its key was passed to
/// [`ignore`](AggregateReader::ignore).
///
/// # Examples
///
/// ```rust,no_run
/// use dircfg::adapters::{AggregateReader, InMemoryReaders, LocalFilesystem};
/// use dircfg::ports::Reader;
/// use std::sync::Arc;
///
/// let filesystem = Arc::new(LocalFilesystem::new());
/// let readers = Arc::new(InMemoryReaders::with_defaults(filesystem.clone()));
///
/// let mut reader = AggregateReader::new(filesystem, readers, "config")?;
/// reader.ignore("license");
///
/// let values = reader.read()?;
/// # Ok::<(), dircfg::domain::ConfigError>(())
/// ```
pub struct AggregateReader {
    filesystem: Arc<dyn Filesystem>,
    readers: Arc<dyn Readers>,
    root: PathBuf,
    ignored: Vec<ReaderKey>,
}

impl AggregateReader {
    /// Creates a reader rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDirectory`] if `root` is not an existing directory.
    pub fn new(
        filesystem: Arc<dyn Filesystem>,
        readers: Arc<dyn Readers>,
        root: impl AsRef<Path>,
    ) -> Result<Self> {
        let root = validate_root(filesystem.as_ref(), root.as_ref())?;
        Ok(Self {
            filesystem,
            readers,
            root,
            ignored: Vec::new(),
        })
    }

    /// Creates a reader over `directory` on the local disk with every built-in format.
    pub fn from_directory(directory: impl AsRef<Path>) -> Result<Self> {
        let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
        let readers = Arc::new(InMemoryReaders::with_defaults(Arc::clone(&filesystem)));
        Self::new(filesystem, readers, directory)
    }

    /// Creates a reader over the platform configuration directory of an application.
    ///
    /// On Linux this is `$XDG_CONFIG_HOME/<app_name>`, on macOS
    /// `~/Library/Application Support/<qualifier>.<app_name>`.
    pub fn from_default_location(
        app_name: &str,
        qualifier: &str,
        readers: Arc<dyn Readers>,
    ) -> Result<Self> {
        let proj_dirs = ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| {
            ConfigError::invalid("Failed to determine project directories", None)
        })?;

        Self::new(
            Arc::new(LocalFilesystem::new()),
            readers,
            proj_dirs.config_dir(),
        )
    }

    /// Points the reader at another directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDirectory`] if `root` is not an existing
    /// directory, leaving the current root in place.
    pub fn set_root(&mut self, root: impl AsRef<Path>) -> Result<&mut Self> {
        self.root = validate_root(self.filesystem.as_ref(), root.as_ref())?;
        Ok(self)
    }

    /// Returns the directory being aggregated.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Skips files whose extension matches `key` instead of failing on them.
    ///
    /// Only files without a registered reader are affected; a key that has a reader
    /// is still read.
    pub fn ignore(&mut self, key: impl Into<ReaderKey>) -> &mut Self {
        let key = key.into();
        if !key.equals_any(&self.ignored) {
            self.ignored.push(key);
        }
        self
    }

    /// Builder form of [`ignore`](AggregateReader::ignore).
    pub fn ignoring(mut self, key: impl Into<ReaderKey>) -> Self {
        self.ignore(key);
        self
    }

    /// Returns the ignored keys, in the order they were added.
    pub fn ignored(&self) -> &[ReaderKey] {
        &self.ignored
    }

    /// Wraps `values` under the file's directories and stem, outermost first.
    fn nest(&self, file: &FileEntry, values: ConfigValue) -> ConfigValue {
        let mut segments = relative_dirs(&self.root, &file.parent);
        segments.push(file.stem().to_string());

        segments.into_iter().rev().fold(values, |inner, segment| {
            let mut mapping = Mapping::new();
            mapping.insert(segment, inner);
            ConfigValue::Mapping(mapping)
        })
    }
}

fn validate_root(filesystem: &dyn Filesystem, root: &Path) -> Result<PathBuf> {
    if filesystem.is_directory(root) {
        Ok(root.to_path_buf())
    } else {
        Err(ConfigError::InvalidDirectory {
            path: root.to_path_buf(),
        })
    }
}

impl fmt::Debug for AggregateReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregateReader")
            .field("filesystem", &self.filesystem)
            .field("root", &self.root)
            .field("ignored", &self.ignored)
            .finish_non_exhaustive()
    }
}

impl Reader for AggregateReader {
    fn name(&self) -> &str {
        "aggregate"
    }

    fn read(&self) -> Result<ConfigValue> {
        tracing::debug!("Aggregating configuration from {}", self.root.display());

        let files = self.filesystem.files(&self.root)?;
        let mut values = ConfigValue::mapping();
        let mut count = 0usize;

        for file in &files {
            let key = ReaderKey::new(file.extension());
            let reader = match self.readers.find(&key) {
                Ok(reader) => reader,
                Err(err @ ConfigError::ReaderNotFound { .. }) => {
                    let key = err.reader_key().cloned().unwrap_or(key);
                    if key.equals_any(&self.ignored) {
                        tracing::trace!("Ignoring {} ('{}' files are ignored)", file.path.display(), key);
                        continue;
                    }
                    return Err(ConfigError::UnsupportedReader {
                        key,
                        source: Box::new(err),
                    });
                }
                Err(err) => return Err(err),
            };

            tracing::trace!("Reading {} with the {} reader", file.path.display(), reader.format());
            let file_values = reader.read_file(&file.path)?;
            values = values.merge_recursive(self.nest(file, file_values));
            count += 1;
        }

        tracing::debug!(
            "Aggregated {} of {} files from {}",
            count,
            files.len(),
            self.root.display()
        );

        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::error::Error;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn reader(root: &Path) -> AggregateReader {
        AggregateReader::from_directory(root).unwrap()
    }

    #[test]
    fn test_new_rejects_missing_directory() {
        let err = AggregateReader::from_directory("invalid-directory").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDirectory { .. }));
        assert_eq!(err.to_string(), "Invalid directory path given: invalid-directory");
    }

    #[test]
    fn test_new_rejects_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "app.json", "{}");
        let err = AggregateReader::from_directory(dir.path().join("app.json")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDirectory { .. }));
    }

    #[test]
    fn test_set_root_keeps_previous_on_error() {
        let dir = TempDir::new().unwrap();
        let mut reader = reader(dir.path());
        assert!(reader.set_root("invalid-directory").is_err());
        assert_eq!(reader.root(), dir.path());
    }

    #[test]
    fn test_empty_directory_reads_empty_mapping() {
        let dir = TempDir::new().unwrap();
        assert_eq!(reader(dir.path()).read().unwrap(), ConfigValue::mapping());
    }

    #[test]
    fn test_nests_files_by_relative_path() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "theme.json", r#"{"name": "Theme"}"#);
        write(dir.path(), "a/b/deep.json", r#"{"x": 1}"#);

        assert_eq!(
            reader(dir.path()).read().unwrap(),
            ConfigValue::from(json!({
                "theme": {"name": "Theme"},
                "a": {"b": {"deep": {"x": 1}}}
            }))
        );
    }

    #[test]
    fn test_siblings_merge_under_shared_directory() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "global/styles.json", r#"{"colors": ["primary"]}"#);
        write(dir.path(), "global/themes.json", r#"{"menu": {"primary": "Main Menu"}}"#);

        let values = reader(dir.path()).read().unwrap();
        assert_eq!(
            values.lookup("global.styles.colors.0"),
            Some(&ConfigValue::from("primary"))
        );
        assert_eq!(
            values.lookup("global.themes.menu.primary"),
            Some(&ConfigValue::from("Main Menu"))
        );
    }

    #[cfg(feature = "php")]
    #[test]
    fn test_colliding_prefixes_keep_both_values() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "app.json", r#"{"name": "from json", "tags": ["a"]}"#);
        write(dir.path(), "app.php", "<?php return ['name' => 'from php', 'tags' => ['b']];");

        let values = reader(dir.path()).read().unwrap();
        assert_eq!(
            values,
            ConfigValue::from(json!({
                "app": {"name": ["from json", "from php"], "tags": ["a", "b"]}
            }))
        );
    }

    #[test]
    fn test_unsupported_extension_aborts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "theme.json", "{}");
        write(dir.path(), "theme.license", "MIT");

        let err = reader(dir.path()).read().unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedReader { .. }));
        assert_eq!(err.reader_key(), Some(&ReaderKey::from("license")));

        let cause = err.source().unwrap();
        assert!(cause.to_string().contains("license"));
    }

    #[test]
    fn test_ignored_extension_is_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "theme.json", r#"{"name": "Theme"}"#);
        write(dir.path(), "theme.license", "MIT");
        write(dir.path(), "notes/.gitkeep", "");

        let mut reader = reader(dir.path());
        reader.ignore("license").ignore(".gitkeep");

        assert_eq!(
            reader.read().unwrap(),
            ConfigValue::from(json!({"theme": {"name": "Theme"}}))
        );
    }

    #[test]
    fn test_ignore_does_not_skip_registered_readers() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "theme.json", r#"{"name": "Theme"}"#);

        let reader = reader(dir.path()).ignoring("json");
        assert_eq!(
            reader.read().unwrap(),
            ConfigValue::from(json!({"theme": {"name": "Theme"}}))
        );
    }

    #[test]
    fn test_ignore_deduplicates() {
        let dir = TempDir::new().unwrap();
        let mut reader = reader(dir.path());
        reader.ignore("license").ignore(" .license");
        assert_eq!(reader.ignored(), &[ReaderKey::from("license")]);
    }

    #[test]
    fn test_invalid_file_aborts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "broken.json", "{");

        let err = reader(dir.path()).read().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_reads_reflect_current_directory_contents() {
        let dir = TempDir::new().unwrap();
        let reader = reader(dir.path());
        assert_eq!(reader.read().unwrap(), ConfigValue::mapping());

        write(dir.path(), "late.json", "true");
        assert_eq!(
            reader.read().unwrap(),
            ConfigValue::from(json!({"late": true}))
        );
    }

    #[test]
    fn test_debug_output() {
        let dir = TempDir::new().unwrap();
        let output = format!("{:?}", reader(dir.path()).ignoring("license"));
        assert!(output.starts_with("AggregateReader"));
        assert!(output.contains("license"));
    }
}
