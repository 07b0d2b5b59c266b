// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration crate.
//!
//! This module defines the error types that can occur when locating, reading or
//! aggregating configuration sources. All errors use `thiserror`.

use crate::domain::reader_key::ReaderKey;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Boxed error used as the cause of parse and I/O failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The main error type for configuration operations.
///
/// Each variant is a distinct kind so callers can tell a missing file from a
/// malformed one. It is marked as `#[non_exhaustive]` to allow for future additions
/// without breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use dircfg::domain::{ConfigError, ReaderKey};
///
/// let err = ConfigError::ReaderNotFound { key: ReaderKey::from("toml") };
/// assert_eq!(err.reader_key(), Some(&ReaderKey::from("toml")));
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The aggregation root does not exist or is not a directory.
    #[error("Invalid directory path given: {}", .path.display())]
    InvalidDirectory {
        /// The rejected path
        path: PathBuf,
    },

    /// No reader is registered for the key.
    #[error("Reader not found for key with extension {key}")]
    ReaderNotFound {
        /// The key that has no reader
        key: ReaderKey,
    },

    /// A file with an unregistered, non-ignored extension was found while aggregating.
    #[error("Unsupported configuration file found in aggregate reader: {key}")]
    UnsupportedReader {
        /// The key that has no reader
        key: ReaderKey,
        /// The registry miss that caused the failure
        #[source]
        source: Box<ConfigError>,
    },

    /// A bound source file is missing or unreadable.
    #[error("Configuration source not found at path {}", .path.display())]
    ConfigurationNotFound {
        /// The path of the missing source
        path: PathBuf,
        /// The underlying error, if any
        #[source]
        source: Option<BoxError>,
    },

    /// A source file exists but does not follow its format's grammar.
    #[error("Invalid configuration{}: {message}", location(.path))]
    InvalidConfiguration {
        /// The file being parsed, when known
        path: Option<PathBuf>,
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<BoxError>,
    },

    /// Failed to convert a configuration value to the requested type.
    #[error("Failed to convert configuration value to type {target_type}")]
    TypeConversionError {
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        #[source]
        source: BoxError,
    },

    /// A filesystem operation failed outside of a bound source.
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

impl ConfigError {
    /// Returns the reader key carried by `ReaderNotFound` and `UnsupportedReader`.
    pub fn reader_key(&self) -> Option<&ReaderKey> {
        match self {
            ConfigError::ReaderNotFound { key } | ConfigError::UnsupportedReader { key, .. } => {
                Some(key)
            }
            _ => None,
        }
    }

    /// Attaches a file path to an `InvalidConfiguration` error that has none.
    ///
    /// Parsers work on raw content and do not know where it came from; readers call
    /// this to name the offending file. Other variants are returned unchanged.
    pub fn at_path(self, file: &Path) -> Self {
        match self {
            ConfigError::InvalidConfiguration {
                path: None,
                message,
                source,
            } => ConfigError::InvalidConfiguration {
                path: Some(file.to_path_buf()),
                message,
                source,
            },
            other => other,
        }
    }

    /// Creates an `InvalidConfiguration` error without a path.
    pub fn invalid(message: impl Into<String>, source: Option<BoxError>) -> Self {
        ConfigError::InvalidConfiguration {
            path: None,
            message: message.into(),
            source,
        }
    }
}

/// Errors raised by a [`Filesystem`](crate::ports::Filesystem) implementation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FilesystemError {
    /// The file does not exist.
    #[error("File does not exist: {}", .path.display())]
    FileDoesNotExist {
        /// The missing path
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("Failed to read file {}: {message}", .path.display())]
    ReadFile {
        /// The unreadable path
        path: PathBuf,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<std::io::Error>,
    },

    /// The file was read but its content is not valid UTF-8.
    #[error("File is not valid UTF-8: {}", .path.display())]
    InvalidEncoding {
        /// The offending path
        path: PathBuf,
        /// The decoding error
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// A directory could not be listed.
    #[error("Failed to list directory {}", .path.display())]
    ListDirectory {
        /// The directory being listed
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },
}

impl FilesystemError {
    /// Converts a read failure for a bound source into a `ConfigurationNotFound` error.
    pub fn into_not_found(self, path: &Path) -> ConfigError {
        ConfigError::ConfigurationNotFound {
            path: path.to_path_buf(),
            source: Some(Box::new(self)),
        }
    }

    /// Converts a read failure for a bound source into the matching `ConfigError`.
    ///
    /// Undecodable content is a malformed source and becomes `InvalidConfiguration`;
    /// every other failure means the source could not be read and becomes
    /// `ConfigurationNotFound`.
    pub fn into_config_error(self, path: &Path) -> ConfigError {
        match self {
            FilesystemError::InvalidEncoding { .. } => ConfigError::InvalidConfiguration {
                path: Some(path.to_path_buf()),
                message: "content is not valid UTF-8".to_string(),
                source: Some(Box::new(self)),
            },
            other => other.into_not_found(path),
        }
    }
}

fn location(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
