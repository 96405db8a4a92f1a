// crates/config-exports-core/src/sources.rs
// ============================================================================
// Module: In-Memory Collaborators
// Description: Map-backed config source and default-key contributors.
// Purpose: Provide host-independent implementations of the core interfaces.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`MapConfigSource`] serves values from an in-memory JSON object.
//! [`StaticKeyProvider`] returns a fixed key list, and
//! [`KeyContributorRegistry`] aggregates the keys declared by named,
//! independently installed components in registration order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::interfaces::ConfigSource;
use crate::interfaces::DefaultKeyProvider;

// ============================================================================
// SECTION: Map Config Source
// ============================================================================

/// Config source backed by a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapConfigSource {
    /// Config values keyed by name.
    values: Map<String, Value>,
}

impl MapConfigSource {
    /// Creates a source from a JSON object map.
    #[must_use]
    pub const fn new(values: Map<String, Value>) -> Self {
        Self {
            values,
        }
    }

    /// Creates a source from a JSON value, returning `None` unless it is an object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(values) => Some(Self::new(values)),
            _ => None,
        }
    }

    /// Defines or replaces a value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }
}

impl ConfigSource for MapConfigSource {
    fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }
}

// ============================================================================
// SECTION: Static Key Provider
// ============================================================================

/// Default-key provider returning a fixed list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticKeyProvider {
    /// Contributed keys.
    keys: Vec<String>,
}

impl StaticKeyProvider {
    /// Creates a provider from any iterator of keys.
    #[must_use]
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Provider with no contributions.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            keys: Vec::new(),
        }
    }
}

impl DefaultKeyProvider for StaticKeyProvider {
    fn contributed_keys(&self) -> Vec<String> {
        self.keys.clone()
    }
}

// ============================================================================
// SECTION: Contributor Registry
// ============================================================================

/// Registry errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A contributor with the same name is already registered.
    #[error("duplicate contributor: {0}")]
    DuplicateContributor(String),
}

/// Contributor entry.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Contributor {
    /// Contributor name.
    name: String,
    /// Keys the contributor asks to export by default.
    keys: Vec<String>,
}

/// Aggregates default keys declared by installed components.
///
/// # Invariants
/// - Contributor names are unique.
/// - Keys are reported in registration order, then declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyContributorRegistry {
    /// Registered contributors.
    contributors: Vec<Contributor>,
}

impl KeyContributorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            contributors: Vec::new(),
        }
    }

    /// Registers a contributor and its keys.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateContributor`] when the name is taken.
    pub fn register<I, S>(&mut self, name: impl Into<String>, keys: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        if self.contributors.iter().any(|existing| existing.name == name) {
            return Err(RegistryError::DuplicateContributor(name));
        }
        self.contributors.push(Contributor {
            name,
            keys: keys.into_iter().map(Into::into).collect(),
        });
        Ok(())
    }

    /// Returns registered contributor names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.contributors.iter().map(|contributor| contributor.name.as_str())
    }
}

impl DefaultKeyProvider for KeyContributorRegistry {
    fn contributed_keys(&self) -> Vec<String> {
        self.contributors.iter().flat_map(|contributor| contributor.keys.iter().cloned()).collect()
    }
}
