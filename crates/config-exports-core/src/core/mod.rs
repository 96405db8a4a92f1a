// crates/config-exports-core/src/core/mod.rs
// ============================================================================
// Module: Config Exports Core Types
// Description: Canonical key, whitelist, result, and error types.
// Purpose: Provide stable, serializable types shared by every export surface.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Core types describe what may be exported ([`Whitelist`]), what a caller
//! asked for ([`RequestedKeys`]), and what was produced ([`ExportedConfig`]).
//! These types are the source of truth for the HTTP and script surfaces.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod errors;
pub mod exported;
pub mod keys;
pub mod whitelist;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use errors::ConfigurationError;
pub use errors::ExportError;
pub use errors::RequestError;
pub use exported::ExportedConfig;
pub use exported::ExportedValue;
pub use keys::DEFAULT_KEYS_CONFIG_NAME;
pub use keys::MAX_KEY_BYTES;
pub use keys::RequestedKey;
pub use keys::RequestedKeys;
pub use whitelist::WHITELIST_CONFIG_NAME;
pub use whitelist::Whitelist;
