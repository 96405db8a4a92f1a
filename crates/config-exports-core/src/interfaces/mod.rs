// crates/config-exports-core/src/interfaces/mod.rs
// ============================================================================
// Module: Config Exports Interfaces
// Description: Collaborator contracts supplied by the host platform.
// Purpose: Decouple the exporter from host configuration and plugin registries.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! The exporter reads values through [`ConfigSource`] and learns which keys
//! installed components want exported by default through
//! [`DefaultKeyProvider`]. Either collaborator may block or perform I/O; the
//! exporter only calls them synchronously and never mutates them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

// ============================================================================
// SECTION: Config Source
// ============================================================================

/// Read-only key/value configuration store.
///
/// # Invariants
/// - `has(key)` is true exactly when `get(key)` returns `Some`.
pub trait ConfigSource {
    /// Returns true when the key is defined.
    fn has(&self, key: &str) -> bool;

    /// Returns the value for a key. Map values may be addressed by sub-key.
    fn get(&self, key: &str) -> Option<Value>;
}

// ============================================================================
// SECTION: Default Key Provider
// ============================================================================

/// Aggregates keys that installed components ask to export by default.
pub trait DefaultKeyProvider {
    /// Returns the contributed keys; empty when nothing is installed.
    fn contributed_keys(&self) -> Vec<String>;
}
