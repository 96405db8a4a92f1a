// crates/config-exports-server/tests/http_exports.rs
// ============================================================================
// Module: HTTP Export Tests
// Description: End-to-end checks of the export endpoints over loopback HTTP.
// Purpose: Validate status codes, bodies, and cache headers per outcome.
// Dependencies: config-exports-server, config-exports-config, reqwest, tempfile, tokio
// ============================================================================

//! ## Overview
//! Each test binds the server to an ephemeral loopback port and issues real
//! HTTP requests against it.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions and helpers are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;

use config_exports_config::ConfigExportsConfig;
use config_exports_server::ExportServer;
use config_exports_server::ServerError;
use serde_json::Value;
use serde_json::json;
use tokio::net::TcpListener;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const CONFIG: &str = r#"
[server]
cache_max_age_secs = 120
max_requested_keys = 3

[audit]
sink = "none"

[[contributors]]
name = "maps"
keys = ["Maps"]

[values]
SiteName = "Example"
Banner = "</script>"
Secret = "hunter2"
ConfigExportsKeysWhitelist = ["SiteName", "Maps", "Banner", "Missing"]
ConfigExportsKeys = ["SiteName"]

[values.Maps]
zoom = 3
provider = "osm"
"#;

async fn spawn(content: &str) -> String {
    let config = ConfigExportsConfig::from_toml_str(content).unwrap();
    let server = ExportServer::from_config(&config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let _server = tokio::spawn(server.serve_on(listener));
    format!("http://{addr}")
}

fn cache_control(response: &reqwest::Response) -> String {
    response.headers().get("cache-control").unwrap().to_str().unwrap().to_string()
}

// ============================================================================
// SECTION: JSON Endpoint
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn explicit_keys_return_flat_object_with_public_cache() {
    let base = spawn(CONFIG).await;
    let response =
        reqwest::get(format!("{base}/config_exports?configs=SiteName%7CMaps.zoom")).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(cache_control(&response), "public, max-age=120");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"SiteName": "Example", "Maps": {"zoom": 3}}));
}

#[tokio::test(flavor = "multi_thread")]
async fn comma_delimited_keys_are_accepted() {
    let base = spawn(CONFIG).await;
    let response =
        reqwest::get(format!("{base}/config_exports?configs=Maps.zoom,Maps.provider")).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"Maps": {"zoom": 3, "provider": "osm"}}));
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_param_exports_defaults() {
    let base = spawn(CONFIG).await;
    let response = reqwest::get(format!("{base}/config_exports")).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"SiteName": "Example", "Maps": {"zoom": 3, "provider": "osm"}}));
}

#[tokio::test(flavor = "multi_thread")]
async fn disallowed_key_is_bad_request_without_values() {
    let base = spawn(CONFIG).await;
    let response =
        reqwest::get(format!("{base}/config_exports?configs=SiteName%7CSecret")).await.unwrap();
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(cache_control(&response), "no-store");
    let text = response.text().await.unwrap();
    assert!(!text.contains("hunter2"));
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        body,
        json!({"error": {"code": "not_whitelisted", "message": "key not whitelisted: Secret"}})
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_subkey_is_bad_request() {
    let base = spawn(CONFIG).await;
    let response = reqwest::get(format!("{base}/config_exports?configs=Maps.nope")).await.unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], json!("no_such_subkey"));
}

#[tokio::test(flavor = "multi_thread")]
async fn too_many_keys_is_bad_request() {
    let base = spawn(CONFIG).await;
    let response =
        reqwest::get(format!("{base}/config_exports?configs=SiteName,Maps,Banner,SiteName"))
            .await
            .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({"error": {"code": "too_many_keys", "message": "too many requested keys"}})
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn too_many_keys_is_audited() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("audit.jsonl");
    let content = CONFIG.replace(
        "sink = \"none\"",
        &format!("sink = \"file\"\npath = '{}'", log.display()),
    );
    let base = spawn(&content).await;
    let response =
        reqwest::get(format!("{base}/config_exports?configs=SiteName,Maps,Banner,SiteName"))
            .await
            .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let lines = fs::read_to_string(&log).unwrap();
    let events: Vec<Value> =
        lines.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["caller"], "api");
    assert_eq!(events[0]["outcome"], "error");
    assert_eq!(events[0]["error_label"], "too_many_keys");
    assert_eq!(events[0]["requested_keys"], json!(["SiteName", "Maps", "Banner", "SiteName"]));
}

#[tokio::test(flavor = "multi_thread")]
async fn undefined_whitelisted_key_is_generic_server_error() {
    let base = spawn(CONFIG).await;
    let response = reqwest::get(format!("{base}/config_exports?configs=Missing")).await.unwrap();
    assert_eq!(response.status().as_u16(), 500);
    assert_eq!(cache_control(&response), "no-store");
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({"error": {"code": "configuration_error", "message": "server configuration error"}})
    );
}

// ============================================================================
// SECTION: Script Endpoint
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn script_endpoint_renders_default_exports() {
    let base = spawn(CONFIG).await;
    let response = reqwest::get(format!("{base}/config_exports.js")).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers().get("content-type").unwrap().to_str().unwrap(),
        "text/javascript; charset=utf-8"
    );
    assert_eq!(cache_control(&response), "public, max-age=120");
    let body = response.text().await.unwrap();
    assert!(body.starts_with("mw.config.set({"));
    assert!(body.ends_with("});"));
    assert!(body.contains(r#""SiteName":"Example""#));
    assert!(!body.contains("hunter2"));
}

#[tokio::test(flavor = "multi_thread")]
async fn script_endpoint_escapes_markup_in_defaults() {
    let content = CONFIG.replace(
        r#"ConfigExportsKeys = ["SiteName"]"#,
        r#"ConfigExportsKeys = ["SiteName", "Banner"]"#,
    );
    let base = spawn(&content).await;
    let body = reqwest::get(format!("{base}/config_exports.js")).await.unwrap().text().await.unwrap();
    assert!(!body.contains("</script>"));
    assert!(body.contains(r#""Banner":"\u003c/script\u003e""#));
}

#[tokio::test(flavor = "multi_thread")]
async fn script_endpoint_failure_is_server_error() {
    let content = CONFIG.replace(
        r#"ConfigExportsKeys = ["SiteName"]"#,
        r#"ConfigExportsKeys = ["Missing"]"#,
    );
    let base = spawn(&content).await;
    let response = reqwest::get(format!("{base}/config_exports.js")).await.unwrap();
    assert_eq!(response.status().as_u16(), 500);
    assert_eq!(cache_control(&response), "no-store");
}

// ============================================================================
// SECTION: Startup
// ============================================================================

#[test]
fn startup_aborts_without_whitelist() {
    let config = ConfigExportsConfig::from_toml_str("[values]\nSiteName = \"Example\"\n").unwrap();
    match ExportServer::from_config(&config) {
        Err(ServerError::Config(message)) => assert!(message.contains("whitelist not configured")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("server started without a whitelist"),
    }
}

#[test]
fn startup_aborts_with_empty_whitelist() {
    let config =
        ConfigExportsConfig::from_toml_str("[values]\nConfigExportsKeysWhitelist = []\n").unwrap();
    assert!(matches!(ExportServer::from_config(&config), Err(ServerError::Config(_))));
}

#[test]
fn bind_address_comes_from_config() {
    let content = CONFIG.replace("[server]\n", "[server]\nbind = \"127.0.0.1:9099\"\n");
    let config = ConfigExportsConfig::from_toml_str(&content).unwrap();
    let server = ExportServer::from_config(&config).unwrap();
    assert_eq!(server.bind_addr().to_string(), "127.0.0.1:9099");
}
