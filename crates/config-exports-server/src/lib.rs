// crates/config-exports-server/src/lib.rs
// ============================================================================
// Module: Config Exports Server
// Description: HTTP surface for whitelisted configuration exports.
// Purpose: Serve exported config as JSON and as a client-side script.
// Dependencies: config-exports-core, config-exports-config, axum, tokio
// ============================================================================

//! ## Overview
//! The server exposes two read-only endpoints over the exporter in
//! [`config_exports_core`]: `GET /config_exports` returns the exported
//! mapping as a flat JSON object and `GET /config_exports.js` returns the
//! `mw.config.set({...});` script for the default keys. State is immutable
//! after startup and shared through an `Arc`.
//!
//! Security posture: query parameters are untrusted; configuration failures
//! are reported with a generic message and never echo config values.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod handlers;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use handlers::EXPORT_PATH;
pub use handlers::SCRIPT_PATH;
pub use server::ExportServer;
pub use server::ServerError;
