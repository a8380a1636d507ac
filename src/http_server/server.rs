//! # HTTP Server
//!
//! Main HTTP server combining the storage and health routers.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::config::ServerConfig;
use super::observability_routes::health_routes;
use super::storage_routes::{storage_routes, StorageState};
use crate::observability::{log_event, Event};

/// HTTP Server for filedrop
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with default configuration
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    /// Create a new HTTP server with custom configuration
    pub fn with_config(config: ServerConfig) -> Self {
        let router = Self::build_router(&config);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &ServerConfig) -> Router {
        let storage_state = Arc::new(StorageState::new(
            &config.storage_root,
            config.max_upload_bytes,
        ));

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        let body_limit = usize::try_from(config.max_request_bytes).unwrap_or(usize::MAX);

        Router::new()
            .merge(health_routes())
            .merge(storage_routes(storage_state))
            .layer(DefaultBodyLimit::max(body_limit))
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind the configured host and port; host names are resolved
    pub async fn bind(&self) -> Result<TcpListener, std::io::Error> {
        TcpListener::bind((self.config.bind_host(), self.config.port)).await
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), std::io::Error> {
        let listener = self.bind().await?;

        let addr_str = listener.local_addr()?.to_string();
        let root = self.config.storage_root.display().to_string();
        log_event(
            Event::Serving,
            &[("addr", addr_str.as_str()), ("storage_root", root.as_str())],
        );

        axum::serve(listener, self.router).await?;

        Ok(())
    }
}

impl Default for HttpServer {
    fn default() -> Self {
        Self::new()
    }
}
