// crates/config-exports-core/src/audit.rs
// ============================================================================
// Module: Export Audit Logging
// Description: Structured audit events for configuration exports.
// Purpose: Emit key-level audit logs without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every export produces one [`ExportAuditEvent`] describing where the keys
//! came from, which keys were exported or dropped, and how the call ended.
//! Sinks write JSON lines so deployments can route events to their preferred
//! logging pipeline. Events carry key names only, never config values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::runtime::ExportCaller;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Origin of the keys processed by an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySource {
    /// Keys supplied by the caller.
    Explicit,
    /// Keys resolved from config defaults and contributors.
    Defaults,
}

/// Export outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportOutcome {
    /// The export produced a result.
    Ok,
    /// The export failed as a whole.
    Error,
}

/// Export audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Surface that invoked the export.
    pub caller: ExportCaller,
    /// Origin of the processed keys.
    pub key_source: KeySource,
    /// Default keys read from configuration (defaults only).
    pub default_keys_from_config: Vec<String>,
    /// Default keys contributed by installed components (defaults only).
    pub default_keys_from_contributors: Vec<String>,
    /// Keys processed, in order.
    pub requested_keys: Vec<String>,
    /// Top-level keys present in the result.
    pub exported_keys: Vec<String>,
    /// Top-level keys dropped by the intersect policy.
    pub dropped_keys: Vec<String>,
    /// Export outcome.
    pub outcome: ExportOutcome,
    /// Error kind label when the export failed.
    pub error_kind: Option<&'static str>,
    /// Detailed error label when the export failed.
    pub error_label: Option<&'static str>,
}

impl ExportAuditEvent {
    /// Event identifier used for every export.
    pub const EVENT: &'static str = "config_exports.export";

    /// Creates an event stamped with the current time and no keys.
    #[must_use]
    pub fn new(caller: ExportCaller, key_source: KeySource) -> Self {
        Self {
            event: Self::EVENT,
            timestamp_ms: now_millis(),
            caller,
            key_source,
            default_keys_from_config: Vec::new(),
            default_keys_from_contributors: Vec::new(),
            requested_keys: Vec::new(),
            exported_keys: Vec::new(),
            dropped_keys: Vec::new(),
            outcome: ExportOutcome::Ok,
            error_kind: None,
            error_label: None,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for export events.
pub trait ExportAuditSink: Send + Sync {
    /// Records an export event.
    fn record(&self, event: &ExportAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl ExportAuditSink for StderrAuditSink {
    fn record(&self, event: &ExportAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ExportAuditSink for FileAuditSink {
    fn record(&self, event: &ExportAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl ExportAuditSink for NoopAuditSink {
    fn record(&self, _event: &ExportAuditEvent) {}
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the current wall-clock time in milliseconds since epoch.
fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |duration| duration.as_millis())
}
