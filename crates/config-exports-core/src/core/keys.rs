// crates/config-exports-core/src/core/keys.rs
// ============================================================================
// Module: Requested Keys
// Description: Parsing of bare and dotted export keys.
// Purpose: Turn caller key lists into top-level and sub-key addresses.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! A requested key is either bare (`Foo`) or dotted (`Foo.bar`). Only the
//! first `.` is meaningful: `Foo.bar.baz` addresses the sub-key `bar.baz` of
//! `Foo`. Addressing is never recursive.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::core::errors::RequestError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Config name holding the keys exported when no explicit request is made.
///
/// Installed components contribute under the same name through
/// [`crate::DefaultKeyProvider`].
pub const DEFAULT_KEYS_CONFIG_NAME: &str = "ConfigExportsKeys";

/// Maximum byte length of a single requested key.
pub const MAX_KEY_BYTES: usize = 255;

/// Separator between the top-level key and the sub-key.
const SUBKEY_SEPARATOR: char = '.';
/// Delimiters accepted between keys in a flat key list.
const LIST_DELIMITERS: [char; 2] = ['|', ','];

// ============================================================================
// SECTION: Requested Key
// ============================================================================

/// A single parsed key address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedKey<'a> {
    /// Top-level config name.
    pub top: &'a str,
    /// Optional sub-key inside a map-valued config.
    pub sub: Option<&'a str>,
}

impl<'a> RequestedKey<'a> {
    /// Splits a raw key on its first `.`.
    #[must_use]
    pub fn parse(raw: &'a str) -> Self {
        match raw.split_once(SUBKEY_SEPARATOR) {
            Some((top, sub)) => Self {
                top,
                sub: Some(sub),
            },
            None => Self {
                top: raw,
                sub: None,
            },
        }
    }
}

// ============================================================================
// SECTION: Requested Keys
// ============================================================================

/// Ordered list of requested keys.
///
/// # Invariants
/// - Order is preserved exactly as supplied; duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestedKeys(Vec<String>);

impl RequestedKeys {
    /// Creates a key list from any iterator of strings.
    #[must_use]
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    /// Parses a flat key list delimited by `|` or `,`.
    ///
    /// Segments are trimmed and empty segments dropped. Returns `None` when
    /// no key remains, which selects the default keys.
    #[must_use]
    pub fn parse_delimited(raw: &str) -> Option<Self> {
        let keys: Vec<String> = raw
            .split(LIST_DELIMITERS)
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(ToString::to_string)
            .collect();
        if keys.is_empty() { None } else { Some(Self(keys)) }
    }

    /// Builds a key list from an untyped JSON value.
    ///
    /// This is the entry point for embedders that receive the requested keys
    /// as decoded JSON (for example a host API parameter bag) rather than as
    /// a delimited string.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::NotAList`] unless the value is an array whose
    /// elements are all strings.
    pub fn from_json(value: &Value) -> Result<Self, RequestError> {
        string_list(value).map(Self).ok_or(RequestError::NotAList)
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no keys were requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the raw key strings in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns the raw key strings.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for RequestedKeys {
    fn from(value: Vec<String>) -> Self {
        Self(value)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a JSON array of strings, returning `None` for any other shape.
pub(crate) fn string_list(value: &Value) -> Option<Vec<String>> {
    let Value::Array(items) = value else {
        return None;
    };
    items.iter().map(|item| item.as_str().map(ToString::to_string)).collect()
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use serde_json::json;

    use super::RequestedKey;
    use super::RequestedKeys;
    use crate::RequestError;

    #[test]
    fn bare_key_has_no_subkey() {
        let key = RequestedKey::parse("SiteName");
        assert_eq!(key.top, "SiteName");
        assert_eq!(key.sub, None);
    }

    #[test]
    fn only_first_dot_splits() {
        let key = RequestedKey::parse("Maps.tiles.url");
        assert_eq!(key.top, "Maps");
        assert_eq!(key.sub, Some("tiles.url"));
    }

    #[test]
    fn trailing_dot_yields_empty_subkey() {
        let key = RequestedKey::parse("Maps.");
        assert_eq!(key.top, "Maps");
        assert_eq!(key.sub, Some(""));
    }

    #[test]
    fn delimited_list_accepts_pipes_and_commas() {
        let keys = RequestedKeys::parse_delimited("SiteName, Maps.zoom|Skin").unwrap();
        assert_eq!(keys.as_slice(), ["SiteName", "Maps.zoom", "Skin"]);
    }

    #[test]
    fn blank_delimited_list_selects_defaults() {
        assert_eq!(RequestedKeys::parse_delimited(""), None);
        assert_eq!(RequestedKeys::parse_delimited(" , | "), None);
    }

    #[test]
    fn delimited_list_keeps_duplicates() {
        let keys = RequestedKeys::parse_delimited("A|A,B").unwrap();
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn from_json_rejects_non_lists() {
        assert_eq!(RequestedKeys::from_json(&json!("A|B")), Err(RequestError::NotAList));
        assert_eq!(RequestedKeys::from_json(&json!({"A": true})), Err(RequestError::NotAList));
        assert_eq!(RequestedKeys::from_json(&json!(["A", 1])), Err(RequestError::NotAList));
    }

    #[test]
    fn from_json_keeps_order_and_duplicates() {
        let keys = RequestedKeys::from_json(&json!(["B", "A", "B"])).unwrap();
        assert_eq!(keys.iter().collect::<Vec<_>>(), vec!["B", "A", "B"]);
    }
}
