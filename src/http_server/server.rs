//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth_routes::auth_routes;
use super::form_routes::form_routes;
use super::observability_routes::health_routes;
use super::state::{AppAuthService, AppState};
use crate::config::ServerConfig;

/// HTTP Server for the form builder API
pub struct HttpServer {
    config: ServerConfig,
    state: AppState,
    prune_interval: Duration,
}

impl HttpServer {
    /// Create a new HTTP server over `state`
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state,
            prune_interval: Duration::from_secs(300),
        }
    }

    /// Set how often expired sessions are pruned
    pub fn with_prune_interval(mut self, interval: Duration) -> Self {
        self.prune_interval = interval;
        self
    }

    /// Get the router (for testing)
    pub fn router(&self) -> Router {
        build_router(self.state.clone(), &self.config)
    }

    /// Bind the configured address and serve until ctrl-c
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self
            .config
            .bind_addr()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already-bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, "formcraft HTTP server listening");

        let pruner = spawn_session_pruner(self.state.auth.clone(), self.prune_interval);
        let router = self.router();

        let result = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await;

        pruner.abort();
        tracing::info!("formcraft HTTP server stopped");
        result
    }
}

/// Build the combined router with all endpoints
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    // Configure CORS from config
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

    Router::new()
        // Health check at root level
        .merge(health_routes())
        .nest("/api", auth_routes().merge(form_routes()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Periodically drop expired and revoked sessions
pub fn spawn_session_pruner(auth: Arc<AppAuthService>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match auth.prune_sessions() {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "pruned sessions"),
                Err(e) => tracing::warn!(error = %e, "session pruning failed"),
            }
        }
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn test_server(config: ServerConfig) -> HttpServer {
        HttpServer::new(config, AppState::in_memory(&AppConfig::default()))
    }

    #[tokio::test]
    async fn test_start_rejects_unparseable_host() {
        let config = ServerConfig {
            host: "not a host".into(),
            ..Default::default()
        };

        let err = test_server(config).start().await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_router_builds_with_any_origin() {
        let config = ServerConfig {
            cors_origins: vec![],
            ..Default::default()
        };
        let _router = test_server(config).router();
    }

    #[tokio::test]
    async fn test_serve_stops_on_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server = test_server(ServerConfig::default()).with_prune_interval(Duration::from_millis(10));

        server.serve(listener, async {}).await.unwrap();
    }
}
