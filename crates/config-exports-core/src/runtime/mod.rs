// crates/config-exports-core/src/runtime/mod.rs
// ============================================================================
// Module: Config Exports Runtime
// Description: Export execution, default-key resolution, and script output.
// Purpose: Turn core types and collaborators into filtered exports.
// Dependencies: crate::{core, interfaces, audit}
// ============================================================================

//! ## Overview
//! The runtime hosts [`ConfigExporter`], the default-key resolver used when a
//! caller requests nothing explicitly, and the script-injection helpers that
//! feed exported values to client-side code.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod defaults;
pub mod exporter;
pub mod script;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use defaults::ResolvedDefaults;
pub use defaults::resolve_default_keys;
pub use exporter::ConfigExporter;
pub use exporter::ExportCaller;
pub use exporter::ExportPolicy;
pub use script::CONFIG_SET_CALL;
pub use script::ScriptError;
pub use script::inject_variables;
pub use script::render_config_set_script;
pub use script::render_script;
