// crates/config-exports-core/src/runtime/exporter.rs
// ============================================================================
// Module: Config Exporter
// Description: Whitelist filtering and one-level sub-key projection.
// Purpose: Produce the permitted, requested subset of host configuration.
// Dependencies: crate::{core, interfaces, audit, runtime::defaults}
// ============================================================================

//! ## Overview
//! [`ConfigExporter`] is a pure function over its inputs: it never mutates the
//! source or the whitelist and keeps no state between calls. Under the
//! default [`ExportPolicy::FailClosed`] a single disallowed key aborts the
//! whole export with no partial result. [`ExportPolicy::Intersect`] restores
//! the legacy behavior of silently dropping disallowed top-level keys.
//!
//! When a key is requested both bare and dotted, the full value wins
//! regardless of order (see [`crate::core::exported`]).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::audit::ExportAuditEvent;
use crate::audit::ExportAuditSink;
use crate::audit::ExportOutcome;
use crate::audit::KeySource;
use crate::audit::NoopAuditSink;
use crate::core::ConfigurationError;
use crate::core::ExportError;
use crate::core::ExportedConfig;
use crate::core::MAX_KEY_BYTES;
use crate::core::RequestError;
use crate::core::RequestedKey;
use crate::core::RequestedKeys;
use crate::core::Whitelist;
use crate::interfaces::ConfigSource;
use crate::interfaces::DefaultKeyProvider;
use crate::runtime::defaults::resolve_default_keys;

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Handling of requested top-level keys that are not whitelisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportPolicy {
    /// Any disallowed key fails the whole export.
    #[default]
    FailClosed,
    /// Disallowed keys are dropped and the rest are exported.
    Intersect,
}

/// Surface that invoked an export, recorded in audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportCaller {
    /// Direct library call.
    Direct,
    /// HTTP export endpoint.
    Api,
    /// Client-side script injection.
    Script,
}

// ============================================================================
// SECTION: Exporter
// ============================================================================

/// Filters configuration down to whitelisted, requested keys.
///
/// # Invariants
/// - Every key in a returned [`ExportedConfig`] is whitelisted.
/// - Errors never carry a partial result.
/// - Exactly one audit event is recorded per export call.
pub struct ConfigExporter {
    /// Keys contributed by installed components for default exports.
    defaults: Arc<dyn DefaultKeyProvider + Send + Sync>,
    /// Disallowed-key policy.
    policy: ExportPolicy,
    /// Audit sink for export events.
    audit: Arc<dyn ExportAuditSink>,
}

impl ConfigExporter {
    /// Creates a fail-closed exporter that discards audit events.
    #[must_use]
    pub fn new(defaults: Arc<dyn DefaultKeyProvider + Send + Sync>) -> Self {
        Self {
            defaults,
            policy: ExportPolicy::FailClosed,
            audit: Arc::new(NoopAuditSink),
        }
    }

    /// Sets the disallowed-key policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ExportPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn ExportAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the disallowed-key policy.
    #[must_use]
    pub const fn policy(&self) -> ExportPolicy {
        self.policy
    }

    /// Checks that a whitelist is configured and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::WhitelistNotConfigured`] otherwise.
    pub fn check_whitelist(whitelist: Option<&Whitelist>) -> Result<&Whitelist, ConfigurationError> {
        match whitelist {
            Some(whitelist) if !whitelist.is_empty() => Ok(whitelist),
            _ => Err(ConfigurationError::WhitelistNotConfigured),
        }
    }

    /// Exports the whitelisted subset of `requested` keys.
    ///
    /// When `requested` is `None` the keys are resolved from configured
    /// defaults and component contributions.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Configuration`] on host misconfiguration and
    /// [`ExportError::Request`] on invalid or disallowed keys.
    pub fn export<S>(
        &self,
        source: &S,
        whitelist: Option<&Whitelist>,
        requested: Option<&RequestedKeys>,
    ) -> Result<ExportedConfig, ExportError>
    where
        S: ConfigSource + ?Sized,
    {
        self.export_as(ExportCaller::Direct, source, whitelist, requested)
    }

    /// Exports on behalf of a specific surface; see [`Self::export`].
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] under the same conditions as [`Self::export`].
    pub fn export_as<S>(
        &self,
        caller: ExportCaller,
        source: &S,
        whitelist: Option<&Whitelist>,
        requested: Option<&RequestedKeys>,
    ) -> Result<ExportedConfig, ExportError>
    where
        S: ConfigSource + ?Sized,
    {
        let key_source = if requested.is_some() { KeySource::Explicit } else { KeySource::Defaults };
        let mut event = ExportAuditEvent::new(caller, key_source);
        let result = self.run_export(source, whitelist, requested, &mut event);
        match &result {
            Ok(exported) => {
                event.exported_keys = exported.keys().map(ToString::to_string).collect();
            }
            Err(err) => {
                event.outcome = ExportOutcome::Error;
                event.error_kind = Some(err.kind());
                event.error_label = Some(err.label());
            }
        }
        self.audit.record(&event);
        result
    }

    /// Records a request rejected by a surface before any export ran.
    ///
    /// Surfaces that enforce their own request limits call this so the
    /// rejection leaves the same audit trail as an export failure.
    #[must_use]
    pub fn reject(
        &self,
        caller: ExportCaller,
        requested: &RequestedKeys,
        err: RequestError,
    ) -> ExportError {
        let err = ExportError::Request(err);
        let mut event = ExportAuditEvent::new(caller, KeySource::Explicit);
        event.requested_keys = requested.as_slice().to_vec();
        event.outcome = ExportOutcome::Error;
        event.error_kind = Some(err.kind());
        event.error_label = Some(err.label());
        self.audit.record(&event);
        err
    }

    /// Runs the export algorithm, filling key details into the audit event.
    fn run_export<S>(
        &self,
        source: &S,
        whitelist: Option<&Whitelist>,
        requested: Option<&RequestedKeys>,
        event: &mut ExportAuditEvent,
    ) -> Result<ExportedConfig, ExportError>
    where
        S: ConfigSource + ?Sized,
    {
        let whitelist = Self::check_whitelist(whitelist)?;

        let resolved;
        let keys = match requested {
            Some(keys) => keys,
            None => {
                resolved = resolve_default_keys(source, self.defaults.as_ref())?;
                event.default_keys_from_config.clone_from(&resolved.from_config);
                event.default_keys_from_contributors.clone_from(&resolved.from_contributors);
                &resolved.keys
            }
        };
        event.requested_keys = keys.as_slice().to_vec();

        let mut exported = ExportedConfig::new();
        for raw in keys.iter() {
            if raw.len() > MAX_KEY_BYTES {
                return Err(RequestError::KeyTooLong.into());
            }
            let key = RequestedKey::parse(raw);
            if !whitelist.contains(key.top) {
                match self.policy {
                    ExportPolicy::FailClosed => {
                        return Err(RequestError::NotWhitelisted {
                            key: key.top.to_string(),
                        }
                        .into());
                    }
                    ExportPolicy::Intersect => {
                        event.dropped_keys.push(key.top.to_string());
                        continue;
                    }
                }
            }
            let value = source.get(key.top).ok_or_else(|| ConfigurationError::UndefinedKey {
                key: key.top.to_string(),
            })?;
            match key.sub {
                None => exported.insert_full(key.top, value),
                Some(sub) => {
                    let field = project_subkey(key.top, sub, value)?;
                    exported.insert_sub(key.top, sub, field);
                }
            }
        }
        Ok(exported)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Extracts one sub-key from a map-valued config.
fn project_subkey(top: &str, sub: &str, value: Value) -> Result<Value, RequestError> {
    let Value::Object(mut map) = value else {
        return Err(RequestError::NotAMap {
            key: top.to_string(),
        });
    };
    map.remove(sub).ok_or_else(|| RequestError::NoSuchSubkey {
        key: top.to_string(),
        subkey: sub.to_string(),
    })
}
