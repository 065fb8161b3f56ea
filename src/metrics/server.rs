//! HTTP server for the Prometheus exposition endpoint.

use crate::metrics::MetricsRegistry;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Errors that can occur during metrics server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen address could not be bound.
    #[error("failed to bind to address: {0}")]
    Bind(#[from] std::io::Error),

    /// Serving stopped with an error.
    #[error("server error: {0}")]
    Server(String),
}

/// Configuration for the metrics server.
#[derive(Debug, Clone)]
pub struct MetricsServerConfig {
    /// Address to bind the server to, as `host:port`.
    pub listen: String,
    /// Route serving the exposition text.
    pub path: String,
}

impl Default for MetricsServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:9090".into(),
            path: "/metrics".into(),
        }
    }
}

impl MetricsServerConfig {
    /// Creates a config listening on `listen` with the default route.
    pub fn with_listen(listen: impl Into<String>) -> Self {
        Self {
            listen: listen.into(),
            ..Default::default()
        }
    }
}

/// Shared state for the metrics server.
struct MetricsState {
    registry: MetricsRegistry,
}

/// HTTP server for exposing Prometheus metrics.
pub struct MetricsServer {
    config: MetricsServerConfig,
    state: Arc<MetricsState>,
}

/// A server whose listener is bound and ready to accept scrapes.
pub struct BoundMetricsServer {
    listener: TcpListener,
    app: Router,
    local_addr: SocketAddr,
}

impl MetricsServer {
    /// Creates a new metrics server.
    pub fn new(config: MetricsServerConfig, registry: MetricsRegistry) -> Self {
        Self {
            config,
            state: Arc::new(MetricsState { registry }),
        }
    }

    /// Builds the router serving the exposition route.
    pub fn router(&self) -> Router {
        Router::new()
            .route(&self.config.path, get(metrics_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::clone(&self.state))
    }

    /// Binds the listener.
    pub async fn bind(self) -> Result<BoundMetricsServer, ServerError> {
        let app = self.router();
        let listener = TcpListener::bind(self.config.listen.as_str()).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!(addr = %local_addr, path = %self.config.path, "Metrics server listening");

        Ok(BoundMetricsServer {
            listener,
            app,
            local_addr,
        })
    }

    /// Binds and serves until the task is dropped.
    pub async fn run(self) -> Result<(), ServerError> {
        self.bind().await?.serve().await
    }
}

impl BoundMetricsServer {
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serves scrapes for as long as the future is polled.
    pub async fn serve(self) -> Result<(), ServerError> {
        axum::serve(self.listener, self.app)
            .await
            .map_err(|e| ServerError::Server(e.to_string()))
    }
}

/// Handler for the exposition route.
async fn metrics_handler(State(state): State<Arc<MetricsState>>) -> impl IntoResponse {
    match state.registry.encode() {
        Ok(output) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            output,
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain; charset=utf-8")],
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}
