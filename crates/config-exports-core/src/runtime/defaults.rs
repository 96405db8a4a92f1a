// crates/config-exports-core/src/runtime/defaults.rs
// ============================================================================
// Module: Default Key Resolution
// Description: Resolves export keys when the caller requests none.
// Purpose: Union configured defaults with component contributions.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Defaults are the union, not the intersection, of the configured
//! [`DEFAULT_KEYS_CONFIG_NAME`] list and the keys contributed through
//! [`DefaultKeyProvider`]: any component may ask for its own key to be
//! exported. Duplicates are dropped keeping the first-seen position.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::core::ConfigurationError;
use crate::core::DEFAULT_KEYS_CONFIG_NAME;
use crate::core::RequestedKeys;
use crate::core::keys::string_list;
use crate::interfaces::ConfigSource;
use crate::interfaces::DefaultKeyProvider;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome of default-key resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDefaults {
    /// Keys read from the configured default list.
    pub from_config: Vec<String>,
    /// Keys contributed by installed components.
    pub from_contributors: Vec<String>,
    /// Deduplicated union in first-seen order.
    pub keys: RequestedKeys,
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves default export keys.
///
/// # Errors
///
/// Returns [`ConfigurationError::InvalidDefaultKeys`] when the configured
/// default list exists but is not a list of strings.
pub fn resolve_default_keys<S>(
    source: &S,
    provider: &dyn DefaultKeyProvider,
) -> Result<ResolvedDefaults, ConfigurationError>
where
    S: ConfigSource + ?Sized,
{
    let from_config = if source.has(DEFAULT_KEYS_CONFIG_NAME) {
        match source.get(DEFAULT_KEYS_CONFIG_NAME) {
            Some(value) => string_list(&value).ok_or(ConfigurationError::InvalidDefaultKeys)?,
            None => Vec::new(),
        }
    } else {
        Vec::new()
    };
    let from_contributors = provider.contributed_keys();

    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut keys = Vec::new();
    for key in from_config.iter().chain(from_contributors.iter()) {
        if seen.insert(key.as_str()) {
            keys.push(key.clone());
        }
    }

    Ok(ResolvedDefaults {
        from_config,
        from_contributors,
        keys: RequestedKeys::from(keys),
    })
}
