// crates/config-exports-core/src/core/errors.rs
// ============================================================================
// Module: Export Errors
// Description: Error taxonomy for configuration exports.
// Purpose: Separate host misconfiguration from invalid caller input.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Exports fail with one of two kinds. [`ConfigurationError`] is a host setup
//! fault that the caller cannot repair; [`RequestError`] is caused by the
//! caller's keys and is recoverable per request. Messages carry at most the
//! offending key name and never a configuration value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Configuration Errors
// ============================================================================

/// Host misconfiguration detected while exporting.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The whitelist is missing or empty.
    #[error("whitelist not configured")]
    WhitelistNotConfigured,
    /// The whitelist value exists but is not a list of strings.
    #[error("whitelist must be a list of strings")]
    InvalidWhitelist,
    /// The default-keys value exists but is not a list of strings.
    #[error("default keys must be a list of strings")]
    InvalidDefaultKeys,
    /// A whitelisted key has no value in the configuration source.
    #[error("whitelisted key not defined: {key}")]
    UndefinedKey {
        /// Whitelisted key without a value.
        key: String,
    },
}

impl ConfigurationError {
    /// Returns a stable label for audit and telemetry.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::WhitelistNotConfigured => "whitelist_not_configured",
            Self::InvalidWhitelist => "invalid_whitelist",
            Self::InvalidDefaultKeys => "invalid_default_keys",
            Self::UndefinedKey {
                ..
            } => "undefined_key",
        }
    }
}

// ============================================================================
// SECTION: Request Errors
// ============================================================================

/// Invalid or disallowed caller input.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Messages never include configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Requested keys were not an ordered list of strings.
    #[error("requestedKeys must be a list")]
    NotAList,
    /// A requested top-level key is not whitelisted.
    #[error("key not whitelisted: {key}")]
    NotWhitelisted {
        /// Offending top-level key.
        key: String,
    },
    /// A sub-key was requested on a value that is not a map.
    #[error("cannot address into non-map config: {key}")]
    NotAMap {
        /// Top-level key holding a non-map value.
        key: String,
    },
    /// A requested sub-key does not exist in the map value.
    #[error("no such subkey: {key}.{subkey}")]
    NoSuchSubkey {
        /// Top-level key.
        key: String,
        /// Missing sub-key.
        subkey: String,
    },
    /// A requested key exceeds the byte limit.
    #[error("requested key exceeds limit")]
    KeyTooLong,
    /// Too many keys were requested at once.
    #[error("too many requested keys")]
    TooManyKeys,
}

impl RequestError {
    /// Returns a stable label for audit and telemetry.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NotAList => "not_a_list",
            Self::NotWhitelisted {
                ..
            } => "not_whitelisted",
            Self::NotAMap {
                ..
            } => "not_a_map",
            Self::NoSuchSubkey {
                ..
            } => "no_such_subkey",
            Self::KeyTooLong => "key_too_long",
            Self::TooManyKeys => "too_many_keys",
        }
    }
}

// ============================================================================
// SECTION: Export Error
// ============================================================================

/// Failure of a whole export call.
///
/// # Invariants
/// - No partial result accompanies an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// Host misconfiguration.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Invalid caller input.
    #[error(transparent)]
    Request(#[from] RequestError),
}

impl ExportError {
    /// Returns the error kind label (`configuration_error` or `request_error`).
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration_error",
            Self::Request(_) => "request_error",
        }
    }

    /// Returns the detailed variant label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Configuration(err) => err.label(),
            Self::Request(err) => err.label(),
        }
    }
}
