// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line argument reader.
//!
//! This module provides a reader that turns command-line arguments into a
//! configuration tree.

use crate::domain::{ConfigValue, Mapping, Result};
use crate::ports::Reader;
use std::collections::BTreeMap;

/// Reader for command-line arguments.
///
/// Supported argument formats:
/// - `--key=value`: Long form with equals sign
/// - `--key value`: Long form with space-separated value
/// - `-k value`: Short form with space-separated value
///
/// Dotted keys nest, so `--database.host=localhost` reads as
/// `{database: {host: "localhost"}}`. Values are always strings.
///
/// # Examples
///
/// ```rust
/// use dircfg::adapters::ArgsReader;
/// use dircfg::domain::ConfigValue;
/// use dircfg::ports::Reader;
///
/// let reader = ArgsReader::from_args(vec!["--database.host=localhost", "--port", "5432"]);
/// let values = reader.read().unwrap();
/// assert_eq!(values.lookup("database.host"), Some(&ConfigValue::from("localhost")));
/// assert_eq!(values.lookup("port"), Some(&ConfigValue::from("5432")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArgsReader {
    /// Parsed key/value pairs, keys still dotted
    values: BTreeMap<String, String>,
}

impl ArgsReader {
    /// Creates a reader with no arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a reader from a list of arguments, program name excluded.
    pub fn from_args<S: AsRef<str>>(args: Vec<S>) -> Self {
        let mut reader = Self::new();
        reader.parse_args(&args);
        reader
    }

    /// Creates a reader from the process's command-line arguments.
    ///
    /// This skips the first argument (the program name) and parses the rest.
    pub fn from_env_args() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_args(args)
    }

    /// Returns the raw value given for a dotted key.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn parse_args<S: AsRef<str>>(&mut self, args: &[S]) {
        let mut i = 0;
        while i < args.len() {
            let arg = args[i].as_ref();

            let key = if let Some(long) = arg.strip_prefix("--") {
                // Handle --key=value format
                if let Some((key, value)) = long.split_once('=') {
                    self.insert(key, value);
                    i += 1;
                    continue;
                }
                long
            } else if let Some(short) = arg.strip_prefix('-').filter(|s| s.chars().count() == 1) {
                short
            } else {
                i += 1;
                continue;
            };

            // Handle --key value and -k value, unless the next argument is another flag
            match args.get(i + 1).map(|next| next.as_ref()) {
                Some(next) if !next.starts_with('-') => {
                    self.insert(key, next);
                    i += 2;
                }
                _ => i += 1,
            }
        }
    }

    fn insert(&mut self, key: &str, value: &str) {
        let key = key.trim_matches('.');
        if !key.is_empty() {
            self.values.insert(key.to_string(), value.to_string());
        }
    }
}

impl Reader for ArgsReader {
    fn name(&self) -> &str {
        "cli"
    }

    fn read(&self) -> Result<ConfigValue> {
        Ok(self
            .values
            .iter()
            .fold(ConfigValue::mapping(), |values, (key, value)| {
                let branch = key
                    .split('.')
                    .rev()
                    .fold(ConfigValue::from(value.as_str()), |inner, segment| {
                        let mut mapping = Mapping::new();
                        mapping.insert(segment.to_string(), inner);
                        ConfigValue::Mapping(mapping)
                    });
                values.overlay(branch)
            }))
    }
}
