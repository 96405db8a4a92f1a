// crates/config-exports-core/src/runtime/script.rs
// ============================================================================
// Module: Script Injection
// Description: Client-side delivery of default config exports.
// Purpose: Merge exports into a variable bag or render a config-set call.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! The script surface never takes request parameters: it always exports the
//! default keys. [`inject_variables`] merges them into a client-visible
//! variable bag, one assignment per key. [`render_config_set_script`] renders
//! a `mw.config.set({...});` call whose JSON literal is safe to inline in an
//! HTML `<script>` element.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::ExportError;
use crate::core::ExportedConfig;
use crate::core::Whitelist;
use crate::interfaces::ConfigSource;
use crate::runtime::exporter::ConfigExporter;
use crate::runtime::exporter::ExportCaller;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Client-side function receiving the exported mapping.
pub const CONFIG_SET_CALL: &str = "mw.config.set";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Script rendering errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The underlying export failed.
    #[error(transparent)]
    Export(#[from] ExportError),
    /// The exported mapping could not be serialized.
    #[error("script serialization failed: {0}")]
    Serialize(String),
}

// ============================================================================
// SECTION: Variable Injection
// ============================================================================

/// Exports the default keys and assigns each into `vars`.
///
/// Existing entries with the same name are replaced. Returns the number of
/// assignments made.
///
/// # Errors
///
/// Returns [`ExportError`] when the export fails; `vars` is left untouched.
pub fn inject_variables<S>(
    exporter: &ConfigExporter,
    source: &S,
    whitelist: Option<&Whitelist>,
    vars: &mut Map<String, Value>,
) -> Result<usize, ExportError>
where
    S: ConfigSource + ?Sized,
{
    let exported = exporter.export_as(ExportCaller::Script, source, whitelist, None)?;
    let count = exported.len();
    for (key, value) in exported.into_entries() {
        vars.insert(key, value);
    }
    Ok(count)
}

// ============================================================================
// SECTION: Script Rendering
// ============================================================================

/// Renders the `mw.config.set({...});` call for an exported mapping.
///
/// # Errors
///
/// Returns [`ScriptError::Serialize`] when serialization fails.
pub fn render_config_set_script(exported: &ExportedConfig) -> Result<String, ScriptError> {
    let json =
        serde_json::to_string(exported).map_err(|err| ScriptError::Serialize(err.to_string()))?;
    Ok(format!("{CONFIG_SET_CALL}({});", escape_for_script(&json)))
}

/// Exports the default keys and renders them as a script.
///
/// # Errors
///
/// Returns [`ScriptError`] when the export or rendering fails.
pub fn render_script<S>(
    exporter: &ConfigExporter,
    source: &S,
    whitelist: Option<&Whitelist>,
) -> Result<String, ScriptError>
where
    S: ConfigSource + ?Sized,
{
    let exported = exporter.export_as(ExportCaller::Script, source, whitelist, None)?;
    render_config_set_script(&exported)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Escapes characters that could end a script element or a JS string literal.
///
/// The affected characters only occur inside JSON strings, where the `\u`
/// escapes are equivalent.
fn escape_for_script(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            other => escaped.push(other),
        }
    }
    escaped
}
