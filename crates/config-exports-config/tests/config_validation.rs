//! Config semantic validation tests for config-exports-config.
// crates/config-exports-config/tests/config_validation.rs
// =============================================================================
// Module: Config Validation Tests
// Description: Validate server, audit, contributor, and key-list constraints.
// Purpose: Ensure invalid settings are rejected before any export runs.
// =============================================================================

#![allow(clippy::use_debug, reason = "Test failure messages format values with Debug.")]

use std::fs;

use config_exports_config::AuditSinkType;
use config_exports_config::ConfigError;
use config_exports_config::ConfigExportsConfig;
use config_exports_config::config_toml_example;
use config_exports_core::ExportPolicy;
use config_exports_core::RequestedKeys;
use serde_json::Value;
use serde_json::json;

type TestResult = Result<(), String>;

fn assert_invalid(content: &str, needle: &str) -> TestResult {
    match ConfigExportsConfig::from_toml_str(content) {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}

fn parse(content: &str) -> Result<ConfigExportsConfig, String> {
    ConfigExportsConfig::from_toml_str(content).map_err(|err| err.to_string())
}

// ============================================================================
// SECTION: Server
// ============================================================================

#[test]
fn server_rejects_unparseable_bind() -> TestResult {
    assert_invalid("[server]\nbind = \"localhost\"\n", "invalid bind address")
}

#[test]
fn server_rejects_cache_over_one_day() -> TestResult {
    assert_invalid("[server]\ncache_max_age_secs = 86401\n", "exceeds one day")
}

#[test]
fn server_accepts_cache_of_exactly_one_day() -> TestResult {
    let config = parse("[server]\ncache_max_age_secs = 86400\n")?;
    if config.server.cache_max_age_secs != 86_400 {
        return Err("cache lifetime not preserved".to_string());
    }
    Ok(())
}

#[test]
fn server_rejects_zero_requested_keys() -> TestResult {
    assert_invalid("[server]\nmax_requested_keys = 0\n", "max_requested_keys must be between")
}

#[test]
fn server_rejects_excessive_requested_keys() -> TestResult {
    assert_invalid("[server]\nmax_requested_keys = 501\n", "max_requested_keys must be between")
}

// ============================================================================
// SECTION: Audit
// ============================================================================

#[test]
fn file_sink_requires_path() -> TestResult {
    assert_invalid("[audit]\nsink = \"file\"\n", "file audit sink requires audit.path")
}

#[test]
fn audit_path_must_be_non_empty() -> TestResult {
    assert_invalid("[audit]\nsink = \"file\"\npath = \"  \"\n", "audit.path must be non-empty")
}

#[test]
fn unknown_sink_is_a_parse_error() -> TestResult {
    assert_invalid("[audit]\nsink = \"syslog\"\n", "config parse error")
}

#[test]
fn default_sink_is_stderr() -> TestResult {
    let config = parse("")?;
    if config.audit.sink != AuditSinkType::Stderr {
        return Err(format!("unexpected default sink {:?}", config.audit.sink));
    }
    Ok(())
}

// ============================================================================
// SECTION: Contributors
// ============================================================================

#[test]
fn contributor_name_must_be_non_empty() -> TestResult {
    assert_invalid(
        "[[contributors]]\nname = \" \"\nkeys = [\"A\"]\n",
        "contributor name must be non-empty",
    )
}

#[test]
fn contributor_must_declare_keys() -> TestResult {
    assert_invalid("[[contributors]]\nname = \"maps\"\nkeys = []\n", "must declare at least one key")
}

#[test]
fn contributor_names_must_be_unique() -> TestResult {
    assert_invalid(
        "[[contributors]]\nname = \"maps\"\nkeys = [\"A\"]\n\n[[contributors]]\nname = \"maps\"\nkeys = [\"B\"]\n",
        "duplicate contributor: maps",
    )
}

#[test]
fn contributor_keys_must_be_non_empty() -> TestResult {
    assert_invalid("[[contributors]]\nname = \"maps\"\nkeys = [\"\"]\n", "key must be non-empty")
}

// ============================================================================
// SECTION: Key Lists
// ============================================================================

#[test]
fn whitelist_must_be_a_list() -> TestResult {
    assert_invalid(
        "[values]\nConfigExportsKeysWhitelist = \"SiteName\"\n",
        "values.ConfigExportsKeysWhitelist must be a list of strings",
    )
}

#[test]
fn whitelist_entries_must_be_strings() -> TestResult {
    assert_invalid(
        "[values]\nConfigExportsKeysWhitelist = [\"SiteName\", 3]\n",
        "values.ConfigExportsKeysWhitelist must be a list of strings",
    )
}

#[test]
fn whitelist_entries_must_be_top_level_keys() -> TestResult {
    assert_invalid(
        "[values]\nConfigExportsKeysWhitelist = [\"SiteName\", \"Maps.zoom\"]\n",
        "values.ConfigExportsKeysWhitelist entry must be a top-level key: Maps.zoom",
    )
}

#[test]
fn default_keys_may_address_sub_keys() -> TestResult {
    parse("[values]\nConfigExportsKeys = [\"Maps.zoom\"]\n")?;
    Ok(())
}

#[test]
fn default_keys_must_be_a_list() -> TestResult {
    assert_invalid(
        "[values]\nConfigExportsKeys = { a = 1 }\n",
        "values.ConfigExportsKeys must be a list of strings",
    )
}

#[test]
fn missing_whitelist_is_accepted_at_load() -> TestResult {
    let config = parse("[values]\nSiteName = \"Example\"\n")?;
    if config.whitelist().is_some() {
        return Err("expected whitelist to be absent".to_string());
    }
    Ok(())
}

// ============================================================================
// SECTION: Exporter Wiring
// ============================================================================

#[test]
fn example_builds_exporter_with_contributed_defaults() -> TestResult {
    let config = parse(&config_toml_example())?;
    let exporter = config.build_exporter().map_err(|err| err.to_string())?;
    let source = config.config_source();
    let whitelist = config.whitelist();
    let exported =
        exporter.export(&source, whitelist.as_ref(), None).map_err(|err| err.to_string())?;
    let value = serde_json::to_value(&exported).map_err(|err| err.to_string())?;
    let expected = json!({
        "SiteName": "Example Wiki",
        "Maps": {"zoom": 3, "provider": "osm"},
    });
    if value != expected {
        return Err(format!("unexpected export {value}"));
    }
    Ok(())
}

#[test]
fn example_exports_requested_sub_keys() -> TestResult {
    let config = parse(&config_toml_example())?;
    let exporter = config.build_exporter().map_err(|err| err.to_string())?;
    let requested = RequestedKeys::new(["Skin.dark_mode"]);
    let exported = exporter
        .export(&config.config_source(), config.whitelist().as_ref(), Some(&requested))
        .map_err(|err| err.to_string())?;
    let value = serde_json::to_value(&exported).map_err(|err| err.to_string())?;
    if value != json!({"Skin": {"dark_mode": false}}) {
        return Err(format!("unexpected export {value}"));
    }
    Ok(())
}

#[test]
fn intersect_policy_is_applied() -> TestResult {
    let content = "[exports]\npolicy = \"intersect\"\n\n[audit]\nsink = \"none\"\n\n[values]\nA = 1\nB = 2\nConfigExportsKeysWhitelist = [\"A\"]\n";
    let config = parse(content)?;
    let exporter = config.build_exporter().map_err(|err| err.to_string())?;
    if exporter.policy() != ExportPolicy::Intersect {
        return Err("policy not applied".to_string());
    }
    let requested = RequestedKeys::new(["A", "B"]);
    let exported = exporter
        .export(&config.config_source(), config.whitelist().as_ref(), Some(&requested))
        .map_err(|err| err.to_string())?;
    let keys: Vec<&str> = exported.keys().collect();
    if keys != ["A"] {
        return Err(format!("unexpected keys {keys:?}"));
    }
    Ok(())
}

#[test]
fn file_sink_is_opened_on_build() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("audit.jsonl");
    let content = format!(
        "[audit]\nsink = \"file\"\npath = {}\n\n[values]\nA = 1\nConfigExportsKeysWhitelist = [\"A\"]\n",
        Value::String(path.display().to_string())
    );
    let config = parse(&content)?;
    let exporter = config.build_exporter().map_err(|err| err.to_string())?;
    let requested = RequestedKeys::new(["A"]);
    exporter
        .export(&config.config_source(), config.whitelist().as_ref(), Some(&requested))
        .map_err(|err| err.to_string())?;
    let written = fs::read_to_string(&path).map_err(|err| err.to_string())?;
    if written.lines().count() != 1 {
        return Err(format!("expected one audit line, got {written}"));
    }
    Ok(())
}

#[test]
fn unopenable_file_sink_is_an_io_error() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("missing-dir").join("audit.jsonl");
    let content = format!(
        "[audit]\nsink = \"file\"\npath = {}\n",
        Value::String(path.display().to_string())
    );
    let config = parse(&content)?;
    match config.build_exporter() {
        Err(ConfigError::Io(_)) => Ok(()),
        Err(other) => Err(format!("unexpected error {other}")),
        Ok(_) => Err("expected audit sink failure".to_string()),
    }
}
