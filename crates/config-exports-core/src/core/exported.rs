// crates/config-exports-core/src/core/exported.rs
// ============================================================================
// Module: Exported Config
// Description: Ordered result mapping produced by an export.
// Purpose: Hold full values and one-level sub-key projections per key.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! [`ExportedConfig`] maps each exported top-level key to either its full
//! value or a partial map of the sub-keys that were requested. Keys serialize
//! in the order they were first exported.
//!
//! Slot precedence: once a key holds its full value, later sub-key requests
//! for the same key leave it untouched, and a later bare request replaces any
//! partial map. The full value therefore wins regardless of request order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeMap;
use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: Exported Value
// ============================================================================

/// Value stored under one exported key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExportedValue {
    /// The complete config value.
    Full(Value),
    /// Only the requested sub-keys of a map-valued config.
    Partial(Map<String, Value>),
}

impl ExportedValue {
    /// Converts the slot into a plain JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Full(value) => value,
            Self::Partial(map) => Value::Object(map),
        }
    }
}

// ============================================================================
// SECTION: Exported Config
// ============================================================================

/// Filtered configuration produced by an export.
///
/// # Invariants
/// - Every key was whitelisted at export time.
/// - Keys are unique and kept in first-exported order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportedConfig {
    /// Exported slots in first-exported order.
    entries: Vec<(String, ExportedValue)>,
}

impl ExportedConfig {
    /// Creates an empty result.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns the number of exported top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing was exported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over exported keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Returns the slot for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ExportedValue> {
        self.entries.iter().find(|(existing, _)| existing == key).map(|(_, value)| value)
    }

    /// Consumes the result into ordered `(key, value)` pairs.
    #[must_use]
    pub fn into_entries(self) -> Vec<(String, Value)> {
        self.entries.into_iter().map(|(key, value)| (key, value.into_value())).collect()
    }

    /// Stores the full value for `key`, replacing any partial map.
    pub(crate) fn insert_full(&mut self, key: &str, value: Value) {
        match self.slot_mut(key) {
            Some(slot) => *slot = ExportedValue::Full(value),
            None => self.entries.push((key.to_string(), ExportedValue::Full(value))),
        }
    }

    /// Merges one sub-key into the partial map for `key`.
    pub(crate) fn insert_sub(&mut self, key: &str, subkey: &str, value: Value) {
        match self.slot_mut(key) {
            Some(ExportedValue::Full(_)) => {}
            Some(ExportedValue::Partial(map)) => {
                map.insert(subkey.to_string(), value);
            }
            None => {
                let mut map = Map::new();
                map.insert(subkey.to_string(), value);
                self.entries.push((key.to_string(), ExportedValue::Partial(map)));
            }
        }
    }

    /// Returns a mutable slot for a key.
    fn slot_mut(&mut self, key: &str) -> Option<&mut ExportedValue> {
        self.entries.iter_mut().find(|(existing, _)| existing == key).map(|(_, value)| value)
    }
}

impl Serialize for ExportedConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
