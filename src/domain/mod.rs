// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types.
//!
//! This module contains the value tree, the reader key, the error types and the
//! accessor trait. It is independent of any concrete source.

pub mod config_value;
pub mod configuration;
pub mod errors;
pub mod reader_key;

// Re-export commonly used types
pub use config_value::{ConfigValue, Mapping};
pub use configuration::Configuration;
pub use errors::{BoxError, ConfigError, FilesystemError, Result};
pub use reader_key::ReaderKey;
