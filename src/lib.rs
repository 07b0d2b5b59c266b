// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hexagonal architecture configuration aggregation crate.
//!
//! This crate loads configuration from heterogeneous sources (PHP array files, JSON
//! and YAML files, environment variables, in-process globals, command-line
//! arguments) and exposes it through one accessor with dotted-path lookup and
//! fallback. Its centerpiece is the directory aggregation reader, which walks a
//! directory tree, reads every file with the reader registered for its extension
//! and merges the results into one tree namespaced by the directory layout.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types (`ConfigValue`, `ReaderKey`, errors, the `Configuration` trait)
//! - **Ports**: Trait definitions that define interfaces (`Reader`, `FileReader`, `Readers`, `Filesystem`)
//! - **Adapters**: Implementations for specific sources and the directory aggregation reader
//! - **Service**: The cached accessor that callers query
//!
//! # Aggregation
//!
//! Given this directory:
//!
//! ```text
//! config/
//! ├── app.php
//! ├── theme.json
//! ├── theme.license
//! └── global/
//!     ├── styles.json
//!     └── themes.json
//! ```
//!
//! the values of `app.php` are found under `app`, those of `global/styles.json`
//! under `global.styles`, and so on. Files sharing a prefix are merged without
//! overwriting each other. A file with no registered reader, like `theme.license`,
//! fails the read unless its extension is ignored.
//!
//! # Feature Flags
//!
//! - `php`: Enable PHP array file support (default)
//! - `yaml`: Enable YAML file support (default)
//! - `env`: Enable environment variable support (default)
//! - `cli`: Enable command-line argument support
//! - `full`: Enable all features
//!
//! JSON support and the globals reader are always available.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dircfg::adapters::{AggregateReader, InMemoryReaders, LocalFilesystem};
//! use dircfg::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let filesystem = Arc::new(LocalFilesystem::new());
//! let readers = Arc::new(InMemoryReaders::with_defaults(filesystem.clone()));
//! let reader = AggregateReader::new(filesystem, readers, "config")?.ignoring("license");
//!
//! let config = Config::new(reader);
//! let name = config.get_or("app.name", "Unnamed")?;
//! let home = config.value("app.wp.home")?;
//! println!("{} lives at {}", name, home);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::adapters::{
        AggregateReader, Globals, GlobalsReader, InMemoryReaders, JsonReader, LayeredReader,
        LocalFilesystem,
    };
    pub use crate::domain::{ConfigError, ConfigValue, Configuration, ReaderKey, Result};
    pub use crate::ports::{FileReader, Reader, Readers, Source};
    pub use crate::service::Config;

    // Re-export adapters based on feature flags
    #[cfg(feature = "cli")]
    pub use crate::adapters::ArgsReader;
    #[cfg(feature = "env")]
    pub use crate::adapters::EnvReader;
    #[cfg(feature = "php")]
    pub use crate::adapters::PhpReader;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlReader;
}
