// crates/config-exports-config/src/lib.rs
// ============================================================================
// Module: Config Exports Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for config-exports.toml semantics.
// Dependencies: config-exports-core, serde, toml
// ============================================================================

//! ## Overview
//! `config-exports-config` defines the configuration file model for Config
//! Exports: the host config values being exported, the whitelist and default
//! keys stored among them, default-key contributors, the disallowed-key
//! policy, and server and audit settings. Validation is strict and fails
//! closed.
//!
//! Security posture: config inputs are untrusted until validated.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
