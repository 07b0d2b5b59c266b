// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reader key newtype used to select a format reader.
//!
//! This module provides the `ReaderKey` type, a normalized file-extension token.
//! The directory engine builds one from every file it visits and looks it up in the
//! reader registry.

use std::fmt;

/// Characters stripped from both ends of a reader key.
fn is_trimmed(c: char) -> bool {
    matches!(c, ' ' | '\n' | '\r' | '\t' | '\u{0B}' | '\0' | '.')
}

/// A normalized identifier matching a file extension to a registered reader.
///
/// Leading and trailing whitespace, newlines, NUL bytes and dots are removed on
/// construction. Dots inside the key are kept, so a compound extension such as
/// `inc.php` stays a single token.
///
/// # Examples
///
/// ```
/// use dircfg::domain::ReaderKey;
///
/// assert_eq!(ReaderKey::new("  .json ").as_str(), "json");
/// assert_eq!(ReaderKey::new(" inc.php\n").as_str(), "inc.php");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReaderKey(String);

impl ReaderKey {
    /// Creates a new `ReaderKey`, normalizing the given extension.
    pub fn new(extension: impl AsRef<str>) -> Self {
        ReaderKey(extension.as_ref().trim_matches(is_trimmed).to_string())
    }

    /// Returns the normalized key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `ReaderKey` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns `true` if this key equals any of `others`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dircfg::domain::ReaderKey;
    ///
    /// let ignored = [ReaderKey::from("license"), ReaderKey::from("md")];
    /// assert!(ReaderKey::from(".md").equals_any(&ignored));
    /// assert!(!ReaderKey::from("json").equals_any(&ignored));
    /// ```
    pub fn equals_any<'a>(&self, others: impl IntoIterator<Item = &'a ReaderKey>) -> bool {
        others.into_iter().any(|other| other == self)
    }
}

impl From<String> for ReaderKey {
    fn from(s: String) -> Self {
        ReaderKey::new(s)
    }
}

impl From<&str> for ReaderKey {
    fn from(s: &str) -> Self {
        ReaderKey::new(s)
    }
}

impl From<ReaderKey> for String {
    fn from(key: ReaderKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ReaderKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReaderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_reader_key_strips_whitespace_and_dots() {
        assert_eq!(ReaderKey::new("   .php ").as_str(), "php");
        assert_eq!(ReaderKey::new(" .json ").as_str(), "json");
        assert_eq!(ReaderKey::new("\tyaml\r\n").as_str(), "yaml");
    }

    #[test]
    fn test_reader_key_keeps_inner_dots() {
        assert_eq!(ReaderKey::new(" inc.php\n").as_str(), "inc.php");
    }

    #[test]
    fn test_reader_key_trailing_dot() {
        assert_eq!(ReaderKey::new("json.").as_str(), "json");
    }

    #[test]
    fn test_reader_key_empty() {
        assert_eq!(ReaderKey::new("").as_str(), "");
        assert_eq!(ReaderKey::new(" . ").as_str(), "");
    }

    #[test]
    fn test_reader_key_display() {
        let key = ReaderKey::from(".license");
        assert_eq!(format!("{}", key), "license");
    }

    #[test]
    fn test_reader_key_debug() {
        let key = ReaderKey::from("json");
        assert_eq!(format!("{:?}", key), "ReaderKey(\"json\")");
    }

    #[test]
    fn test_reader_key_equality_after_normalization() {
        assert_eq!(ReaderKey::from(" .json"), ReaderKey::from("json"));
        assert_ne!(ReaderKey::from("json"), ReaderKey::from("JSON"));
    }

    #[test]
    fn test_reader_key_hash() {
        let mut map = HashMap::new();
        map.insert(ReaderKey::from("php"), "value1");

        assert_eq!(map.get(&ReaderKey::from(".php ")), Some(&"value1"));
        assert_eq!(map.get(&ReaderKey::from("json")), None);
    }

    #[test]
    fn test_reader_key_equals_any() {
        let keys = vec![ReaderKey::from("license"), ReaderKey::from("txt")];
        assert!(ReaderKey::from("txt").equals_any(&keys));
        assert!(!ReaderKey::from("php").equals_any(&keys));
        assert!(!ReaderKey::from("php").equals_any(&[]));
    }

    #[test]
    fn test_string_from_reader_key() {
        let key = ReaderKey::from(" yml ");
        let s: String = key.into();
        assert_eq!(s, "yml");
    }
}
