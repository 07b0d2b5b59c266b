// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing reader, registry and filesystem implementations.
//!
//! This module contains concrete implementations of the traits defined in the ports
//! layer: file format readers, ambient-state readers, the reader registry, the local
//! filesystem and the directory aggregation reader.

pub mod aggregate;
#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "env")]
pub mod env_var;
pub mod globals;
pub mod in_memory_readers;
pub mod json_file;
pub mod layered;
pub mod local_filesystem;
#[cfg(feature = "php")]
pub mod php_file;
#[cfg(feature = "yaml")]
pub mod yaml_file;

// Re-export adapters based on feature flags
pub use aggregate::AggregateReader;
#[cfg(feature = "cli")]
pub use cli::ArgsReader;
#[cfg(feature = "env")]
pub use env_var::{EnvReader, Environment, ProcessEnvironment};
pub use globals::{Globals, GlobalsReader};
pub use in_memory_readers::InMemoryReaders;
pub use json_file::{JsonParser, JsonReader};
pub use layered::{LayeredReader, CLI_PRIORITY, ENV_PRIORITY, FILE_PRIORITY};
pub use local_filesystem::LocalFilesystem;
#[cfg(feature = "php")]
pub use php_file::{PhpArrayParser, PhpReader};
#[cfg(feature = "yaml")]
pub use yaml_file::{YamlParser, YamlReader};
