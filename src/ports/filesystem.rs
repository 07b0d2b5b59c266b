// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filesystem trait definition.
//!
//! The readers and the directory engine never touch the disk directly; they go
//! through this port so that the storage can be swapped out.

use crate::domain::{ConfigValue, FilesystemError, Result};
use crate::ports::ConfigParser;
use std::fmt;
use std::path::{Path, PathBuf};

/// A regular file found while listing a directory tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileEntry {
    /// Full path of the file
    pub path: PathBuf,
    /// Directory containing the file
    pub parent: PathBuf,
    /// File name, including the extension
    pub file_name: String,
}

impl FileEntry {
    /// Creates an entry from a full file path.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            parent,
            file_name,
        }
    }

    /// Returns the text after the last dot of the file name, or `""`.
    ///
    /// ```
    /// use dircfg::ports::FileEntry;
    ///
    /// assert_eq!(FileEntry::from_path("/cfg/theme.inc.php").extension(), "php");
    /// assert_eq!(FileEntry::from_path("/cfg/.gitkeep").extension(), "gitkeep");
    /// assert_eq!(FileEntry::from_path("/cfg/LICENSE").extension(), "");
    /// ```
    pub fn extension(&self) -> &str {
        self.file_name
            .rsplit_once('.')
            .map(|(_, extension)| extension)
            .unwrap_or("")
    }

    /// Returns the file name without its last extension.
    ///
    /// ```
    /// use dircfg::ports::FileEntry;
    ///
    /// assert_eq!(FileEntry::from_path("/cfg/theme.inc.php").stem(), "theme.inc");
    /// assert_eq!(FileEntry::from_path("/cfg/LICENSE").stem(), "LICENSE");
    /// ```
    pub fn stem(&self) -> &str {
        self.file_name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&self.file_name)
    }
}

/// Storage capabilities needed by readers and the directory engine.
pub trait Filesystem: Send + Sync + fmt::Debug {
    /// Returns `true` if `path` exists and is a directory.
    fn is_directory(&self, path: &Path) -> bool;

    /// Reads the whole file at `path` as UTF-8 text.
    fn read(&self, path: &Path) -> std::result::Result<String, FilesystemError>;

    /// Lists every regular file below `root`, recursively.
    ///
    /// Directories themselves are not listed.
    fn files(&self, root: &Path) -> std::result::Result<Vec<FileEntry>, FilesystemError>;

    /// Reads the file at `path` and parses it with `parser`.
    ///
    /// A read failure becomes `ConfigurationNotFound`. Content that is not UTF-8 or
    /// fails to parse becomes `InvalidConfiguration` naming `path`.
    fn evaluate_as_data(&self, path: &Path, parser: &dyn ConfigParser) -> Result<ConfigValue> {
        let content = self.read(path).map_err(|e| e.into_config_error(path))?;
        parser.parse(&content).map_err(|e| e.at_path(path))
    }
}
