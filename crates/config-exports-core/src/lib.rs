// crates/config-exports-core/src/lib.rs
// ============================================================================
// Module: Config Exports Core Library
// Description: Public API surface for the Config Exports core.
// Purpose: Expose data model, collaborator interfaces, and the exporter.
// Dependencies: crate::{core, interfaces, runtime, audit, sources}
// ============================================================================

//! ## Overview
//! Config Exports core filters a host configuration store down to an operator
//! whitelist and hands the permitted values to two consumers: an HTTP export
//! endpoint and a client-side script injector. Everything here is synchronous
//! and side-effect free with respect to its inputs; the host supplies values
//! and default-key contributions through explicit interfaces.
//!
//! Security posture: requested keys are untrusted input and the export fails
//! closed on any disallowed or malformed key.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod interfaces;
pub mod runtime;
pub mod sources;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use audit::ExportAuditEvent;
pub use audit::ExportAuditSink;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use interfaces::ConfigSource;
pub use interfaces::DefaultKeyProvider;
pub use runtime::ConfigExporter;
pub use runtime::ExportCaller;
pub use runtime::ExportPolicy;
pub use runtime::ResolvedDefaults;
pub use runtime::ScriptError;
pub use runtime::inject_variables;
pub use runtime::render_config_set_script;
pub use runtime::render_script;
pub use runtime::resolve_default_keys;
pub use sources::KeyContributorRegistry;
pub use sources::MapConfigSource;
pub use sources::RegistryError;
pub use sources::StaticKeyProvider;
