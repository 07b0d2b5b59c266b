// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that define the interfaces
//! for the components of the configuration system. These traits are implemented
//! by adapters in the adapters layer.

pub mod filesystem;
pub mod parser;
pub mod reader;
pub mod registry;

// Re-export commonly used types
pub use filesystem::{FileEntry, Filesystem};
pub use parser::ConfigParser;
pub use reader::{FileReader, Reader, Source};
pub use registry::Readers;
