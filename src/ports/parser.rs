// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration parser trait definition.
//!
//! This module defines the `ConfigParser` trait, which provides an interface for
//! parsing configuration content in different formats (PHP arrays, JSON, YAML, etc.).

use crate::domain::{ConfigValue, Result};

/// A trait for parsing configuration content into a value tree.
///
/// Nested structures are kept nested; a parser never flattens keys.
///
/// # Examples
///
/// ```rust
/// use dircfg::ports::ConfigParser;
/// use dircfg::domain::{ConfigValue, Result};
///
/// struct LinesParser;
///
/// impl ConfigParser for LinesParser {
///     fn parse(&self, content: &str) -> Result<ConfigValue> {
///         Ok(ConfigValue::from(content.lines().collect::<Vec<_>>()))
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["lines"]
///     }
/// }
///
/// let value = LinesParser.parse("a\nb").unwrap();
/// assert_eq!(value.lookup("1"), Some(&ConfigValue::from("b")));
/// ```
pub trait ConfigParser: Send + Sync {
    /// Parses configuration content into a value tree.
    ///
    /// # Returns
    ///
    /// * `Ok(ConfigValue)` - The parsed tree
    /// * `Err(ConfigError::InvalidConfiguration)` - The content is malformed
    fn parse(&self, content: &str) -> Result<ConfigValue>;

    /// Returns the file extensions supported by this parser, without the leading dot.
    fn supported_extensions(&self) -> &[&str];
}
