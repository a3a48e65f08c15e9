//! Axum server setup
//!
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use savectl_core::{BoardStore, MembershipSelector, MixedMembership, ToggleEngine};

use super::routes;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3030)
    pub bind_addr: SocketAddr,

    /// Allow any origin (default: false = localhost only)
    pub cors_permissive: bool,

    /// Tap behaviour when a restaurant is in Quick Saves and custom boards
    pub mixed_membership: MixedMembership,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3030)),
            cors_permissive: false,
            mixed_membership: MixedMembership::default(),
        }
    }
}

/// Shared application state
///
/// Handlers never cache save state; every request re-resolves from `store`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BoardStore>,
    pub engine: ToggleEngine,
    pub selector: MembershipSelector,
}

impl AppState {
    pub fn new(store: Arc<dyn BoardStore>, policy: MixedMembership) -> Self {
        Self {
            engine: ToggleEngine::new(store.clone()).with_policy(policy),
            selector: MembershipSelector::new(store.clone()),
            store,
        }
    }
}

/// Build the router with every route and request tracing, without CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::boards::router())
        .merge(routes::saves::router())
        .merge(routes::sheet::router())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

fn cors_layer(permissive: bool) -> CorsLayer {
    if permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:3030"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
            HeaderValue::from_static("http://127.0.0.1:3030"),
        ])
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Run the HTTP server until Ctrl+C or SIGTERM.
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(PgBoardStore::new(create_pool(&database_url).await?));
/// run_server(store, ServerConfig::default()).await?;
/// ```
pub async fn run_server(
    store: Arc<dyn BoardStore>,
    config: ServerConfig,
) -> Result<(), ServerError> {
    tracing::info!(
        store = store.kind(),
        policy = ?config.mixed_membership,
        "starting savectl server"
    );

    let state = AppState::new(store, config.mixed_membership);
    let app = router(state).layer(cors_layer(config.cors_permissive));

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3030);
        assert!(!config.cors_permissive);
        assert_eq!(config.mixed_membership, MixedMembership::UnsaveQuickSaves);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let (app, _store) = crate::http::testing::app();
        let (status, _) = crate::http::testing::send(&app, "GET", "/nope", None).await;
        assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    }
}
