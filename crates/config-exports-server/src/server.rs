// crates/config-exports-server/src/server.rs
// ============================================================================
// Module: Export Server
// Description: Server construction and HTTP transport.
// Purpose: Validate startup state and serve export endpoints with axum.
// Dependencies: config-exports-config, config-exports-core, axum, tokio
// ============================================================================

//! ## Overview
//! [`ExportServer::from_config`] validates configuration, refuses to start
//! without a whitelist, and builds the shared handler state once.
//! [`ExportServer::serve`] binds the configured address; tests and embedders
//! can hand in their own listener through [`ExportServer::serve_on`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::get;
use config_exports_config::ConfigExportsConfig;
use config_exports_core::ConfigExporter;
use tokio::net::TcpListener;

use crate::handlers::EXPORT_PATH;
use crate::handlers::ExportState;
use crate::handlers::SCRIPT_PATH;
use crate::handlers::handle_export;
use crate::handlers::handle_script;

// ============================================================================
// SECTION: Export Server
// ============================================================================

/// HTTP export server instance.
pub struct ExportServer {
    /// Configured bind address.
    bind: SocketAddr,
    /// Shared handler state.
    state: Arc<ExportState>,
}

impl ExportServer {
    /// Builds a new export server from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] when the configuration is invalid or
    /// no whitelist is configured, and [`ServerError::Init`] when the
    /// exporter cannot be built.
    pub fn from_config(config: &ConfigExportsConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let bind = config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
        let whitelist = config.whitelist();
        let whitelist = ConfigExporter::check_whitelist(whitelist.as_ref())
            .map_err(|err| ServerError::Config(err.to_string()))?
            .clone();
        let exporter = config.build_exporter().map_err(|err| ServerError::Init(err.to_string()))?;
        let cache_control =
            HeaderValue::from_str(&format!("public, max-age={}", config.server.cache_max_age_secs))
                .map_err(|err| ServerError::Init(err.to_string()))?;
        let state = Arc::new(ExportState {
            exporter,
            source: config.config_source(),
            whitelist,
            cache_control,
            max_requested_keys: config.server.max_requested_keys,
        });
        Ok(Self {
            bind,
            state,
        })
    }

    /// Returns the configured bind address.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind
    }

    /// Builds the axum router for the export endpoints.
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .route(EXPORT_PATH, get(handle_export))
            .route(SCRIPT_PATH, get(handle_script))
            .with_state(Arc::clone(&self.state))
    }

    /// Binds the configured address and serves requests.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.bind)
            .await
            .map_err(|_| ServerError::Transport("http bind failed".to_string()))?;
        self.serve_on(listener).await
    }

    /// Serves requests on an already-bound listener.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] when the server fails.
    pub async fn serve_on(self, listener: TcpListener) -> Result<(), ServerError> {
        let app = self.router();
        axum::serve(listener, app)
            .await
            .map_err(|_| ServerError::Transport("http server failed".to_string()))
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Export server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}
