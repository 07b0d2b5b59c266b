// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local disk filesystem adapter.

use crate::domain::FilesystemError;
use crate::ports::{FileEntry, Filesystem};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Maximum allowed size for a configuration file (10MB)
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// [`Filesystem`] implementation backed by `std::fs` and `walkdir`.
///
/// Directory listings are sorted by file name so aggregation is deterministic for a
/// given directory snapshot.
///
/// # Examples
///
/// ```rust
/// use dircfg::adapters::LocalFilesystem;
/// use dircfg::ports::Filesystem;
///
/// let fs = LocalFilesystem::new();
/// assert!(fs.is_directory(std::env::temp_dir().as_path()));
/// ```
#[derive(Debug, Clone)]
pub struct LocalFilesystem {
    max_file_size: u64,
    follow_links: bool,
}

impl LocalFilesystem {
    /// Creates a filesystem with the default file size limit, following symlinks.
    pub fn new() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            follow_links: true,
        }
    }

    /// Sets the largest file, in bytes, that `read` accepts.
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Sets whether directory listings follow symbolic links.
    pub fn follow_links(mut self, enabled: bool) -> Self {
        self.follow_links = enabled;
        self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

fn read_error(path: &Path, message: impl Into<String>, source: Option<std::io::Error>) -> FilesystemError {
    FilesystemError::ReadFile {
        path: path.to_path_buf(),
        message: message.into(),
        source,
    }
}

impl Filesystem for LocalFilesystem {
    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read(&self, path: &Path) -> Result<String, FilesystemError> {
        let metadata = fs::metadata(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FilesystemError::FileDoesNotExist {
                path: path.to_path_buf(),
            },
            _ => read_error(path, "failed to read file metadata", Some(e)),
        })?;

        if !metadata.is_file() {
            return Err(read_error(path, "not a regular file", None));
        }

        if metadata.len() > self.max_file_size {
            return Err(read_error(
                path,
                format!(
                    "configuration file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    self.max_file_size
                ),
                None,
            ));
        }

        let bytes =
            fs::read(path).map_err(|e| read_error(path, "failed to read file content", Some(e)))?;
        String::from_utf8(bytes).map_err(|source| FilesystemError::InvalidEncoding {
            path: path.to_path_buf(),
            source,
        })
    }

    fn files(&self, root: &Path) -> Result<Vec<FileEntry>, FilesystemError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .min_depth(1)
            .follow_links(self.follow_links)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| FilesystemError::ListDirectory {
                path: e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf()),
                source: e.into(),
            })?;

            if entry.file_type().is_file() {
                files.push(FileEntry::from_path(entry.into_path()));
            }
        }

        tracing::trace!("Listed {} files under {}", files.len(), root.display());
        Ok(files)
    }
}

/// Returns `path` relative to `root` as a list of directory names, excluding the file.
pub(crate) fn relative_dirs(root: &Path, parent: &Path) -> Vec<String> {
    parent
        .strip_prefix(root)
        .map(PathBuf::from)
        .unwrap_or_default()
        .components()
        .filter_map(|component| match component {
            std::path::Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.json");
        fs::write(&file, "{}").unwrap();

        let fs = LocalFilesystem::new();
        assert!(fs.is_directory(dir.path()));
        assert!(!fs.is_directory(&file));
        assert!(!fs.is_directory(Path::new("invalid-directory")));
    }

    #[test]
    fn test_read_existing_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.json");
        fs::write(&file, "{\"a\": 1}").unwrap();

        assert_eq!(LocalFilesystem::new().read(&file).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_read_missing_file() {
        let result = LocalFilesystem::new().read(Path::new("/path/does/not/exist.json"));
        assert!(matches!(result, Err(FilesystemError::FileDoesNotExist { .. })));
    }

    #[test]
    fn test_read_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.json");
        fs::write(&file, b"{\"a\": \"\xff\xfe\"}").unwrap();

        let result = LocalFilesystem::new().read(&file);
        assert!(matches!(result, Err(FilesystemError::InvalidEncoding { .. })));
    }

    #[test]
    fn test_read_directory_is_rejected() {
        let dir = TempDir::new().unwrap();
        let result = LocalFilesystem::new().read(dir.path());
        assert!(matches!(result, Err(FilesystemError::ReadFile { .. })));
    }

    #[test]
    fn test_read_respects_size_limit() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("big.json");
        fs::write(&file, "[1, 2, 3, 4, 5]").unwrap();

        let result = LocalFilesystem::new().max_file_size(4).read(&file);
        match result {
            Err(FilesystemError::ReadFile { message, .. }) => {
                assert!(message.contains("too large"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_files_lists_leaves_sorted() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("global/empty")).unwrap();
        fs::write(dir.path().join("theme.json"), "{}").unwrap();
        fs::write(dir.path().join("app.php"), "").unwrap();
        fs::write(dir.path().join("global/styles.json"), "{}").unwrap();

        let files = LocalFilesystem::new().files(dir.path()).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();

        assert_eq!(names, vec!["app.php", "styles.json", "theme.json"]);
        assert_eq!(files[1].parent, dir.path().join("global"));
    }

    #[test]
    fn test_files_of_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(LocalFilesystem::new().files(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_files_of_missing_directory() {
        let result = LocalFilesystem::new().files(Path::new("/path/does/not/exist"));
        assert!(matches!(result, Err(FilesystemError::ListDirectory { .. })));
    }

    #[test]
    fn test_relative_dirs() {
        let root = Path::new("/cfg");
        assert_eq!(
            relative_dirs(root, Path::new("/cfg/a/b")),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(relative_dirs(root, Path::new("/cfg")).is_empty());
    }
}
