// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable reader.
//!
//! This module provides a reader that snapshots environment variables into a
//! configuration tree. The environment is an injected [`Environment`] so tests and
//! embedders can supply their own.

use crate::domain::{ConfigValue, Mapping, Result};
use crate::ports::Reader;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Maximum length for environment variable keys (prevents DoS)
const MAX_ENV_KEY_LEN: usize = 512;

/// Maximum length for environment variable values (prevents DoS)
const MAX_ENV_VALUE_LEN: usize = 1048576; // 1MB

/// A key/value store the [`EnvReader`] snapshots.
pub trait Environment: Send + Sync + fmt::Debug {
    /// Returns every variable currently set.
    fn vars(&self) -> Vec<(String, String)>;
}

/// The environment of the running process.
///
/// Variables whose name or value is not valid UTF-8 are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }
}

impl Environment for HashMap<String, String> {
    fn vars(&self) -> Vec<(String, String)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl Environment for BTreeMap<String, String> {
    fn vars(&self) -> Vec<(String, String)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

/// Reader for environment variables.
///
/// Every `read()` takes a fresh snapshot, so a [`Config`](crate::service::Config)
/// built on this reader sees new variables after a refresh. Values are always
/// strings.
///
/// # Examples
///
/// ```rust
/// use dircfg::adapters::EnvReader;
/// use dircfg::domain::ConfigValue;
/// use dircfg::ports::Reader;
/// use std::collections::HashMap;
///
/// let vars = HashMap::from([("APP__NAME".to_string(), "Themosis".to_string())]);
/// let reader = EnvReader::with_environment(vars)
///     .lowercase_keys(true)
///     .separator("__");
///
/// let values = reader.read().unwrap();
/// assert_eq!(values.lookup("app.name"), Some(&ConfigValue::from("Themosis")));
/// ```
#[derive(Debug, Clone)]
pub struct EnvReader {
    /// Where variables come from
    environment: Arc<dyn Environment>,
    /// Optional prefix to filter environment variables
    prefix: Option<String>,
    /// Whether to convert keys to lowercase
    lowercase_keys: bool,
    /// Optional separator splitting keys into nested mappings
    separator: Option<String>,
}

impl EnvReader {
    /// Creates a reader over the process environment.
    pub fn new() -> Self {
        Self::with_environment(ProcessEnvironment)
    }

    /// Creates a reader over the given environment.
    pub fn with_environment(environment: impl Environment + 'static) -> Self {
        Self::from_shared(Arc::new(environment))
    }

    /// Creates a reader over a shared environment.
    pub fn from_shared(environment: Arc<dyn Environment>) -> Self {
        Self {
            environment,
            prefix: None,
            lowercase_keys: false,
            separator: None,
        }
    }

    /// Keeps only variables starting with `prefix`, and strips it from their keys.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Sets whether to convert keys to lowercase.
    pub fn lowercase_keys(mut self, enabled: bool) -> Self {
        self.lowercase_keys = enabled;
        self
    }

    /// Splits keys on `separator` and nests the value under each part.
    ///
    /// With `"__"`, `DATABASE__HOST` becomes `{DATABASE: {HOST: ...}}`.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into()).filter(|s: &String| !s.is_empty());
        self
    }

    fn transform_key(&self, key: String) -> Option<String> {
        let key = match &self.prefix {
            Some(prefix) => key.strip_prefix(prefix.as_str())?.to_string(),
            None => key,
        };
        if key.is_empty() {
            return None;
        }
        Some(if self.lowercase_keys {
            key.to_lowercase()
        } else {
            key
        })
    }

    fn nest(&self, key: &str, value: String) -> ConfigValue {
        let segments: Vec<&str> = match &self.separator {
            Some(separator) => key.split(separator.as_str()).collect(),
            None => vec![key],
        };
        segments
            .into_iter()
            .rev()
            .fold(ConfigValue::String(value), |inner, segment| {
                let mut mapping = Mapping::new();
                mapping.insert(segment.to_string(), inner);
                ConfigValue::Mapping(mapping)
            })
    }
}

impl Default for EnvReader {
    fn default() -> Self {
        Self::new()
    }
}

impl Reader for EnvReader {
    fn name(&self) -> &str {
        "env"
    }

    fn read(&self) -> Result<ConfigValue> {
        let mut vars = self.environment.vars();
        vars.sort();

        let mut values = ConfigValue::mapping();
        let mut count = 0usize;

        for (key, value) in vars {
            // Validate input sizes to prevent DoS
            if key.len() > MAX_ENV_KEY_LEN || value.len() > MAX_ENV_VALUE_LEN {
                tracing::debug!(
                    "Skipping oversized environment variable: key_len={}, value_len={} (max key={}, max value={})",
                    key.len(),
                    value.len(),
                    MAX_ENV_KEY_LEN,
                    MAX_ENV_VALUE_LEN
                );
                continue;
            }

            let Some(key) = self.transform_key(key) else {
                continue;
            };

            values = values.overlay(self.nest(&key, value));
            count += 1;
        }

        tracing::debug!(
            "Loaded {} environment variables (prefix={:?}, lowercase={}, separator={:?})",
            count,
            self.prefix,
            self.lowercase_keys,
            self.separator
        );

        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::env;

    // Helper to set and clean up environment variables
    struct EnvGuard {
        keys: Vec<String>,
    }

    impl EnvGuard {
        fn new() -> Self {
            EnvGuard { keys: Vec::new() }
        }

        fn set(&mut self, key: &str, value: &str) {
            env::set_var(key, value);
            self.keys.push(key.to_string());
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for key in &self.keys {
                env::remove_var(key);
            }
        }
    }

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_env_reader_name() {
        assert_eq!(EnvReader::new().name(), "env");
    }

    #[test]
    fn test_env_reader_process_environment() {
        let mut guard = EnvGuard::new();
        guard.set("DIRCFG_TEST_PROCESS_VAR", "test_value");

        let values = EnvReader::new().read().unwrap();
        assert_eq!(
            values.lookup("DIRCFG_TEST_PROCESS_VAR"),
            Some(&ConfigValue::from("test_value"))
        );
    }

    #[test]
    fn test_env_reader_flat_keys() {
        let reader = EnvReader::with_environment(vars(&[("foo", "bar"), ("MY_VAR", "value")]));
        assert_eq!(
            reader.read().unwrap(),
            ConfigValue::from(json!({"foo": "bar", "MY_VAR": "value"}))
        );
    }

    #[test]
    fn test_env_reader_with_prefix() {
        let reader = EnvReader::with_environment(vars(&[
            ("MYAPP_DATABASE_HOST", "localhost"),
            ("MYAPP_", "empty key"),
            ("OTHER_VAR", "should_not_appear"),
        ]))
        .prefix("MYAPP_");

        assert_eq!(
            reader.read().unwrap(),
            ConfigValue::from(json!({"DATABASE_HOST": "localhost"}))
        );
    }

    #[test]
    fn test_env_reader_lowercase_and_separator() {
        let reader = EnvReader::with_environment(vars(&[
            ("APP__NAME", "Themosis"),
            ("APP__DEBUG", "true"),
            ("APP__VERSION", "1.0"),
            ("FOO", "bar"),
        ]))
        .lowercase_keys(true)
        .separator("__");

        assert_eq!(
            reader.read().unwrap(),
            ConfigValue::from(json!({
                "app": {"name": "Themosis", "debug": "true", "version": "1.0"},
                "foo": "bar"
            }))
        );
    }

    #[test]
    fn test_env_reader_nested_wins_over_scalar_parent() {
        let reader = EnvReader::with_environment(vars(&[("APP", "x"), ("APP__NAME", "y")]))
            .separator("__");
        assert_eq!(
            reader.read().unwrap(),
            ConfigValue::from(json!({"APP": {"NAME": "y"}}))
        );
    }

    #[test]
    fn test_env_reader_empty_separator_is_ignored() {
        let reader = EnvReader::with_environment(vars(&[("A_B", "1")])).separator("");
        assert_eq!(reader.read().unwrap(), ConfigValue::from(json!({"A_B": "1"})));
    }

    #[test]
    fn test_env_reader_skips_oversized() {
        let long_key = "K".repeat(MAX_ENV_KEY_LEN + 1);
        let reader = EnvReader::with_environment(vars(&[(long_key.as_str(), "v"), ("OK", "v")]));
        assert_eq!(reader.read().unwrap(), ConfigValue::from(json!({"OK": "v"})));
    }

    #[test]
    fn test_env_reader_empty_environment() {
        let reader = EnvReader::with_environment(HashMap::<String, String>::new());
        assert_eq!(reader.read().unwrap(), ConfigValue::mapping());
    }
}
