// crates/config-exports-core/src/core/whitelist.rs
// ============================================================================
// Module: Export Whitelist
// Description: Ordered set of top-level config names that may be exported.
// Purpose: Gate every export on an operator-controlled allowlist.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! The whitelist is supplied by host configuration, usually as the config
//! value named [`WHITELIST_CONFIG_NAME`]. It is immutable for the duration of
//! an export call and preserves the operator's ordering for display.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::core::errors::ConfigurationError;
use crate::core::keys::string_list;
use crate::interfaces::ConfigSource;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Config name holding the export whitelist.
pub const WHITELIST_CONFIG_NAME: &str = "ConfigExportsKeysWhitelist";

// ============================================================================
// SECTION: Whitelist
// ============================================================================

/// Ordered set of whitelisted top-level keys.
///
/// # Invariants
/// - Keys are unique; the first occurrence fixes the position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    /// Keys in first-seen order.
    ordered: Vec<String>,
    /// Membership index.
    index: BTreeSet<String>,
}

impl Whitelist {
    /// Builds a whitelist, dropping duplicate keys.
    #[must_use]
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut whitelist = Self::default();
        for key in keys {
            let key = key.into();
            if whitelist.index.insert(key.clone()) {
                whitelist.ordered.push(key);
            }
        }
        whitelist
    }

    /// Reads the whitelist from the configuration source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::WhitelistNotConfigured`] when the source
    /// has no whitelist and [`ConfigurationError::InvalidWhitelist`] when the
    /// value is not a list of strings.
    pub fn from_source<S>(source: &S) -> Result<Self, ConfigurationError>
    where
        S: ConfigSource + ?Sized,
    {
        if !source.has(WHITELIST_CONFIG_NAME) {
            return Err(ConfigurationError::WhitelistNotConfigured);
        }
        let value =
            source.get(WHITELIST_CONFIG_NAME).ok_or(ConfigurationError::WhitelistNotConfigured)?;
        let keys = string_list(&value).ok_or(ConfigurationError::InvalidWhitelist)?;
        Ok(Self::new(keys))
    }

    /// Returns true when the key is whitelisted.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains(key)
    }

    /// Returns the number of whitelisted keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Returns true when nothing is whitelisted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Iterates over whitelisted keys in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }
}
