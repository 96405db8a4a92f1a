// crates/config-exports-config/src/config.rs
// ============================================================================
// Module: Config Exports Configuration
// Description: Configuration loading and validation for Config Exports.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: config-exports-core, serde, serde_json, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The `[values]` table is the host configuration store served through
//! [`MapConfigSource`]; it may hold the whitelist
//! (`ConfigExportsKeysWhitelist`) and the default key list
//! (`ConfigExportsKeys`). A missing whitelist is accepted at load time and
//! surfaces from the exporter as a configuration error, so the decision to
//! abort stays with the caller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use config_exports_core::ConfigExporter;
use config_exports_core::DEFAULT_KEYS_CONFIG_NAME;
use config_exports_core::ExportAuditSink;
use config_exports_core::ExportPolicy;
use config_exports_core::FileAuditSink;
use config_exports_core::KeyContributorRegistry;
use config_exports_core::MAX_KEY_BYTES;
use config_exports_core::MapConfigSource;
use config_exports_core::NoopAuditSink;
use config_exports_core::StderrAuditSink;
use config_exports_core::WHITELIST_CONFIG_NAME;
use config_exports_core::Whitelist;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "config-exports.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "CONFIG_EXPORTS_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default bind address for the HTTP server.
const DEFAULT_BIND: &str = "127.0.0.1:8080";
/// Default public cache lifetime for export responses (10 minutes).
pub const DEFAULT_CACHE_MAX_AGE_SECS: u64 = 600;
/// Maximum allowed public cache lifetime (1 day).
pub const MAX_CACHE_MAX_AGE_SECS: u64 = 86_400;
/// Default cap on requested keys per HTTP request.
pub const DEFAULT_MAX_REQUESTED_KEYS: usize = 50;
/// Upper bound for the requested key cap.
pub const MAX_REQUESTED_KEYS_LIMIT: usize = 500;
/// Maximum number of default-key contributors.
pub const MAX_CONTRIBUTORS: usize = 256;
/// Maximum number of keys a single contributor may declare.
pub const MAX_CONTRIBUTOR_KEYS: usize = 256;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Config Exports configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigExportsConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Export policy configuration.
    #[serde(default)]
    pub exports: ExportsConfig,
    /// Components contributing default export keys.
    #[serde(default)]
    pub contributors: Vec<ContributorConfig>,
    /// Host configuration values available for export.
    #[serde(default)]
    pub values: Map<String, Value>,
}

impl ConfigExportsConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        if content.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.audit.validate()?;
        validate_contributors(&self.contributors)?;
        validate_key_list_value(&self.values, WHITELIST_CONFIG_NAME)?;
        validate_key_list_value(&self.values, DEFAULT_KEYS_CONFIG_NAME)?;
        Ok(())
    }

    /// Returns the configured values as a config source.
    #[must_use]
    pub fn config_source(&self) -> MapConfigSource {
        MapConfigSource::new(self.values.clone())
    }

    /// Returns the configured whitelist, or `None` when it is not configured.
    #[must_use]
    pub fn whitelist(&self) -> Option<Whitelist> {
        Whitelist::from_source(&self.config_source()).ok()
    }

    /// Builds the default-key contributor registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when contributor names collide.
    pub fn contributor_registry(&self) -> Result<KeyContributorRegistry, ConfigError> {
        let mut registry = KeyContributorRegistry::new();
        for contributor in &self.contributors {
            registry
                .register(contributor.name.trim(), contributor.keys.iter().cloned())
                .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        }
        Ok(registry)
    }

    /// Builds an exporter wired with contributors, policy, and audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the registry or audit sink cannot be built.
    pub fn build_exporter(&self) -> Result<ConfigExporter, ConfigError> {
        let registry = self.contributor_registry()?;
        let audit = self.audit.build_sink()?;
        Ok(ConfigExporter::new(Arc::new(registry))
            .with_policy(self.exports.policy)
            .with_audit_sink(audit))
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP listener.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Public cache lifetime for successful responses, in seconds.
    #[serde(default = "default_cache_max_age_secs")]
    pub cache_max_age_secs: u64,
    /// Maximum number of keys accepted in one request.
    #[serde(default = "default_max_requested_keys")]
    pub max_requested_keys: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cache_max_age_secs: default_cache_max_age_secs(),
            max_requested_keys: default_max_requested_keys(),
        }
    }
}

impl ServerConfig {
    /// Returns the parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid("invalid bind address".to_string()))
    }

    /// Validates server configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.cache_max_age_secs > MAX_CACHE_MAX_AGE_SECS {
            return Err(ConfigError::Invalid(
                "server.cache_max_age_secs exceeds one day".to_string(),
            ));
        }
        if self.max_requested_keys == 0 || self.max_requested_keys > MAX_REQUESTED_KEYS_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "server.max_requested_keys must be between 1 and {MAX_REQUESTED_KEYS_LIMIT}"
            )));
        }
        Ok(())
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkType {
    /// Discard audit events.
    None,
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `audit.path`.
    File,
}

/// Audit logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditConfig {
    /// Selected sink.
    #[serde(default)]
    pub sink: AuditSinkType,
    /// Audit log path (JSON lines), required for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        if self.sink == AuditSinkType::File && self.path.is_none() {
            return Err(ConfigError::Invalid("file audit sink requires audit.path".to_string()));
        }
        Ok(())
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the audit file cannot be opened.
    pub fn build_sink(&self) -> Result<Arc<dyn ExportAuditSink>, ConfigError> {
        match self.sink {
            AuditSinkType::None => Ok(Arc::new(NoopAuditSink)),
            AuditSinkType::Stderr => Ok(Arc::new(StderrAuditSink)),
            AuditSinkType::File => {
                let path = self.path.as_deref().ok_or_else(|| {
                    ConfigError::Invalid("file audit sink requires audit.path".to_string())
                })?;
                let sink = FileAuditSink::new(Path::new(path.trim()))
                    .map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Arc::new(sink))
            }
        }
    }
}

/// Export policy configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportsConfig {
    /// Handling of requested keys that are not whitelisted.
    #[serde(default)]
    pub policy: ExportPolicy,
}

/// A component contributing default export keys.
#[derive(Debug, Clone, Deserialize)]
pub struct ContributorConfig {
    /// Contributor name (unique).
    pub name: String,
    /// Keys the contributor asks to export by default.
    pub keys: Vec<String>,
}

impl ContributorConfig {
    /// Validates a single contributor entry.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("contributor name must be non-empty".to_string()));
        }
        if self.keys.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "contributor {} must declare at least one key",
                self.name.trim()
            )));
        }
        if self.keys.len() > MAX_CONTRIBUTOR_KEYS {
            return Err(ConfigError::Invalid(format!(
                "contributor {} declares too many keys",
                self.name.trim()
            )));
        }
        for key in &self.keys {
            validate_key(&format!("contributor {} key", self.name.trim()), key)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a single export key name.
fn validate_key(field: &str, key: &str) -> Result<(), ConfigError> {
    if key.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if key.len() > MAX_KEY_BYTES {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    Ok(())
}

/// Validates the contributor list.
fn validate_contributors(contributors: &[ContributorConfig]) -> Result<(), ConfigError> {
    if contributors.len() > MAX_CONTRIBUTORS {
        return Err(ConfigError::Invalid("too many contributors".to_string()));
    }
    for (index, contributor) in contributors.iter().enumerate() {
        contributor.validate()?;
        let name = contributor.name.trim();
        if contributors[.. index].iter().any(|earlier| earlier.name.trim() == name) {
            return Err(ConfigError::Invalid(format!("duplicate contributor: {name}")));
        }
    }
    Ok(())
}

/// Validates that a key-list value, when present, is a list of key names.
fn validate_key_list_value(values: &Map<String, Value>, name: &str) -> Result<(), ConfigError> {
    let Some(value) = values.get(name) else {
        return Ok(());
    };
    let Value::Array(items) = value else {
        return Err(ConfigError::Invalid(format!("values.{name} must be a list of strings")));
    };
    for item in items {
        let Value::String(key) = item else {
            return Err(ConfigError::Invalid(format!("values.{name} must be a list of strings")));
        };
        validate_key(&format!("values.{name} entry"), key)?;
        if name == WHITELIST_CONFIG_NAME && key.contains('.') {
            return Err(ConfigError::Invalid(format!(
                "values.{name} entry must be a top-level key: {key}"
            )));
        }
    }
    Ok(())
}

/// Default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Default cache lifetime.
const fn default_cache_max_age_secs() -> u64 {
    DEFAULT_CACHE_MAX_AGE_SECS
}

/// Default requested key cap.
const fn default_max_requested_keys() -> usize {
    DEFAULT_MAX_REQUESTED_KEYS
}
