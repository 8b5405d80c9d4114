//! Web server module.

mod handlers;

pub use handlers::*;

use crate::config::ServerConfig;
use crate::logs::LogBuffer;
use crate::telemetry::TelemetryReader;

use axum::{
    routing::{get, post},
    Router,
};
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub telemetry: TelemetryReader,
    pub logs: LogBuffer,
}

/// HTTP query surface for dishwatch.
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    /// Create a new server with the given dependencies.
    pub fn new(config: ServerConfig, telemetry: TelemetryReader, logs: LogBuffer) -> Self {
        Self {
            config,
            state: AppState { telemetry, logs },
        }
    }

    /// Start the server on the configured address and serve until
    /// `shutdown` resolves.
    pub async fn start<F>(&self, shutdown: F) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = routes(self.state.clone());

        let listener = self.bind().await?;
        tracing::info!("Web server listening on {}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }

    /// Bind the configured host, which may be a name or an IPv6 literal.
    async fn bind(&self) -> std::io::Result<TcpListener> {
        TcpListener::bind((self.config.http_host.as_str(), self.config.http_port)).await
    }
}

/// Build the router with all routes.
pub fn routes(state: AppState) -> Router {
    // Local companion UI only; every origin is allowed.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/status", get(handlers::handle_status))
        .route("/api/history", get(handlers::handle_history))
        .route("/api/logs", get(handlers::handle_logs))
        .route("/api/logs/clear", post(handlers::handle_clear_logs))
        .route("/health", get(handlers::handle_health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
