// crates/config-exports-server/src/handlers.rs
// ============================================================================
// Module: Export Handlers
// Description: axum handlers for the JSON and script export endpoints.
// Purpose: Map query parameters to requested keys and results to responses.
// Dependencies: config-exports-core, axum, serde, serde_json
// ============================================================================

//! ## Overview
//! The `configs` query parameter carries the requested keys, delimited by `|`
//! or `,`; repeated parameters are concatenated. A missing or empty parameter
//! selects the default keys. Request errors map to 400 with the error label as
//! the code; configuration errors map to 500 with a generic message. Only
//! successful responses are publicly cacheable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Json;
use axum::extract::Query;
use axum::extract::State;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::response::Response;
use config_exports_core::ConfigExporter;
use config_exports_core::ExportCaller;
use config_exports_core::ExportError;
use config_exports_core::MapConfigSource;
use config_exports_core::RequestError;
use config_exports_core::RequestedKeys;
use config_exports_core::ScriptError;
use config_exports_core::Whitelist;
use config_exports_core::render_script;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Route of the JSON export endpoint.
pub const EXPORT_PATH: &str = "/config_exports";
/// Route of the script export endpoint.
pub const SCRIPT_PATH: &str = "/config_exports.js";
/// Query parameter carrying requested keys.
const CONFIGS_PARAM: &str = "configs";
/// Content type of the script endpoint.
const SCRIPT_CONTENT_TYPE: &str = "text/javascript; charset=utf-8";
/// Cache directive for error responses.
const NO_STORE: &str = "no-store";
/// Message returned for every server-side failure.
const INTERNAL_MESSAGE: &str = "server configuration error";

// ============================================================================
// SECTION: State
// ============================================================================

/// Shared, immutable state for export handlers.
pub(crate) struct ExportState {
    /// Exporter wired with contributors, policy, and audit sink.
    pub(crate) exporter: ConfigExporter,
    /// Host configuration values.
    pub(crate) source: MapConfigSource,
    /// Whitelist read at startup.
    pub(crate) whitelist: Whitelist,
    /// `Cache-Control` value for successful responses.
    pub(crate) cache_control: HeaderValue,
    /// Maximum number of keys accepted per request.
    pub(crate) max_requested_keys: usize,
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handles `GET /config_exports`.
pub(crate) async fn handle_export(
    State(state): State<Arc<ExportState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let requested = requested_keys(&params);
    if let Some(keys) = &requested
        && keys.len() > state.max_requested_keys
    {
        let err = state.exporter.reject(ExportCaller::Api, keys, RequestError::TooManyKeys);
        return error_response(&err);
    }
    let result = state.exporter.export_as(
        ExportCaller::Api,
        &state.source,
        Some(&state.whitelist),
        requested.as_ref(),
    );
    match result {
        Ok(exported) => {
            (StatusCode::OK, [(CACHE_CONTROL, state.cache_control.clone())], Json(exported))
                .into_response()
        }
        Err(err) => error_response(&err),
    }
}

/// Handles `GET /config_exports.js`.
pub(crate) async fn handle_script(State(state): State<Arc<ExportState>>) -> Response {
    let script = render_script(&state.exporter, &state.source, Some(&state.whitelist));
    match script {
        Ok(body) => (
            StatusCode::OK,
            [
                (CONTENT_TYPE, HeaderValue::from_static(SCRIPT_CONTENT_TYPE)),
                (CACHE_CONTROL, state.cache_control.clone()),
            ],
            body,
        )
            .into_response(),
        Err(ScriptError::Export(err)) => error_response(&err),
        Err(ScriptError::Serialize(_)) => {
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "serialization_failed", INTERNAL_MESSAGE)
        }
    }
}

// ============================================================================
// SECTION: Request Parsing
// ============================================================================

/// Collects requested keys from `configs` parameters.
///
/// Returns `None` when no non-empty key was supplied, selecting defaults.
pub(crate) fn requested_keys(params: &[(String, String)]) -> Option<RequestedKeys> {
    let joined = params
        .iter()
        .filter(|(name, _)| name == CONFIGS_PARAM)
        .map(|(_, value)| value.as_str())
        .collect::<Vec<_>>()
        .join("|");
    RequestedKeys::parse_delimited(&joined)
}

// ============================================================================
// SECTION: Error Mapping
// ============================================================================

/// Error response envelope.
#[derive(Debug, Serialize)]
struct ErrorEnvelope<'a> {
    /// Error details.
    error: ErrorBody<'a>,
}

/// Error details.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    /// Stable error code.
    code: &'a str,
    /// Human-readable message.
    message: &'a str,
}

/// Maps an export error to an HTTP response.
fn error_response(err: &ExportError) -> Response {
    match err {
        ExportError::Request(request) => {
            error_body(StatusCode::BAD_REQUEST, request.label(), &request.to_string())
        }
        ExportError::Configuration(_) => {
            error_body(StatusCode::INTERNAL_SERVER_ERROR, err.kind(), INTERNAL_MESSAGE)
        }
    }
}

/// Builds a non-cacheable JSON error response.
fn error_body(status: StatusCode, code: &str, message: &str) -> Response {
    let envelope = ErrorEnvelope {
        error: ErrorBody {
            code,
            message,
        },
    };
    (status, [(CACHE_CONTROL, HeaderValue::from_static(NO_STORE))], Json(envelope))
        .into_response()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;

    fn params(values: &[(&str, &str)]) -> Vec<(String, String)> {
        values.iter().map(|(name, value)| ((*name).to_string(), (*value).to_string())).collect()
    }

    #[test]
    fn missing_param_selects_defaults() {
        assert_eq!(requested_keys(&params(&[("other", "x")])), None);
    }

    #[test]
    fn empty_param_selects_defaults() {
        assert_eq!(requested_keys(&params(&[("configs", " | ,")])), None);
    }

    #[test]
    fn pipe_and_comma_delimiters_are_accepted() {
        let keys = requested_keys(&params(&[("configs", "A|B.c,D")])).unwrap();
        assert_eq!(keys.as_slice(), ["A", "B.c", "D"]);
    }

    #[test]
    fn repeated_params_are_concatenated() {
        let keys = requested_keys(&params(&[("configs", "A"), ("configs", "B")])).unwrap();
        assert_eq!(keys.as_slice(), ["A", "B"]);
    }

    #[test]
    fn empty_repeated_param_is_skipped() {
        let keys = requested_keys(&params(&[("configs", ""), ("configs", "B")])).unwrap();
        assert_eq!(keys.as_slice(), ["B"]);
    }
}
