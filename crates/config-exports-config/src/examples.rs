// crates/config-exports-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payloads.
// Purpose: Deterministic examples for docs and tooling.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example `config-exports.toml`. Output is deterministic and is
//! exercised by the config tests so it always loads.

/// Returns a canonical example `config-exports.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[server]
bind = "127.0.0.1:8080"
cache_max_age_secs = 600
max_requested_keys = 50

[audit]
sink = "stderr"
# sink = "file"
# path = "config-exports-audit.jsonl"

[exports]
policy = "fail_closed"

[[contributors]]
name = "maps"
keys = ["Maps"]

[values]
SiteName = "Example Wiki"
ConfigExportsKeysWhitelist = ["SiteName", "Maps", "Skin"]
ConfigExportsKeys = ["SiteName"]
DBPassword = "not-exported"

[values.Maps]
zoom = 3
provider = "osm"

[values.Skin]
name = "vector"
dark_mode = false
"#,
    )
}
