//! HTTP Server
//!
//! Binds the axum router on TCP and serves until the shutdown token fires.

use crate::handler::{self, AppState};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, Level};
use waitlist_core::application::ShutdownToken;
use waitlist_core::error::{AppError, Result};

const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
const DEFAULT_HTTP_PORT: u16 = 8787;

/// HTTP Server Configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub host: String,
    /// 0 picks an ephemeral port
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

/// Build the route table
pub fn router(service: AppState) -> Router {
    Router::new()
        .route(
            "/api/user",
            post(handler::submit)
                .delete(handler::remove)
                .put(handler::update_status),
        )
        .route("/api/users", get(handler::list))
        .route("/api/cleanup", get(handler::cleanup))
        .route("/api/queue", get(handler::queue))
        .route("/api/activities", get(handler::activities))
        .route("/health", get(handler::health))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(service)
}

/// HTTP Server
pub struct HttpServer {
    config: HttpServerConfig,
    service: AppState,
}

/// Running server
pub struct HttpServerHandle {
    local_addr: SocketAddr,
    task: JoinHandle<()>,
}

impl HttpServerHandle {
    /// Address actually bound (resolves port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Wait for the server to finish draining after shutdown
    pub async fn stopped(self) {
        if let Err(e) = self.task.await {
            error!(error = %e, "HTTP server task panicked");
        }
    }
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, service: AppState) -> Self {
        Self { config, service }
    }

    /// Bind and start serving in the background
    pub async fn start(self, shutdown: ShutdownToken) -> Result<HttpServerHandle> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::Config(format!("Failed to bind {}: {}", addr, e)))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| AppError::Internal(format!("Failed to read bound address: {}", e)))?;

        info!(addr = %local_addr, "HTTP server listening");

        let app = router(self.service);
        let task = tokio::spawn(async move {
            let mut shutdown = shutdown;
            let result = axum::serve(listener, app.into_make_service())
                .with_graceful_shutdown(async move { shutdown.wait().await })
                .await;

            match result {
                Ok(()) => info!("HTTP server stopped"),
                Err(e) => error!(error = %e, "HTTP server error"),
            }
        });

        Ok(HttpServerHandle { local_addr, task })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use waitlist_core::application::{shutdown_channel, WaitlistConfig, WaitlistService};
    use waitlist_core::port::entry_store::mocks::InMemoryEntryStore;
    use waitlist_core::port::id_provider::mocks::SequentialIdProvider;
    use waitlist_core::port::time_provider::mocks::FixedTimeProvider;

    use crate::error::ErrorBody;

    fn service_with(store: Arc<InMemoryEntryStore>) -> Arc<WaitlistService> {
        Arc::new(WaitlistService::new(
            store,
            Arc::new(SequentialIdProvider::default()),
            Arc::new(FixedTimeProvider::new(0)),
            WaitlistConfig::default(),
        ))
    }

    fn service() -> Arc<WaitlistService> {
        service_with(Arc::new(InMemoryEntryStore::new()))
    }

    async fn start_failing() -> (String, waitlist_core::application::ShutdownSender) {
        let store = Arc::new(InMemoryEntryStore::new());
        store.set_failing(true);
        let config = HttpServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        let (tx, token) = shutdown_channel();
        let handle = HttpServer::new(config, service_with(store))
            .start(token)
            .await
            .unwrap();
        (format!("http://{}", handle.local_addr()), tx)
    }

    #[tokio::test]
    async fn test_start_on_ephemeral_port_and_shutdown() {
        let config = HttpServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        let (tx, token) = shutdown_channel();
        let handle = HttpServer::new(config, service()).start(token).await.unwrap();
        assert_ne!(handle.local_addr().port(), 0);

        tx.shutdown();
        tokio_test::assert_ok!(
            tokio::time::timeout(Duration::from_secs(5), handle.stopped()).await
        );
    }

    #[tokio::test]
    async fn test_bind_failure_is_config_error() {
        let (_tx, token) = shutdown_channel();
        let first = HttpServer::new(
            HttpServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            service(),
        )
        .start(token.clone())
        .await
        .unwrap();

        let taken = HttpServerConfig {
            host: "127.0.0.1".to_string(),
            port: first.local_addr().port(),
        };
        let err = HttpServer::new(taken, service())
            .start(token)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_cleanup_store_failure_is_500_with_detail() {
        let (base, _tx) = start_failing().await;

        let resp = reqwest::get(format!("{}/api/cleanup", base)).await.unwrap();
        assert_eq!(resp.status().as_u16(), 500);
        let body: ErrorBody = resp.json().await.unwrap();
        assert_eq!(body.message, "Error cleaning up users");
        assert!(body.error.unwrap().contains("store unavailable"));
    }

    #[tokio::test]
    async fn test_submit_store_failure_is_internal_error() {
        let (base, _tx) = start_failing().await;

        let resp = reqwest::Client::new()
            .post(format!("{}/api/user", base))
            .json(&serde_json::json!({"name": "alice", "activities": ["misc"]}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 500);
        let body: ErrorBody = resp.json().await.unwrap();
        assert_eq!(body.message, "Internal server error");
        assert!(body.error.unwrap().contains("store unavailable"));
    }

    #[tokio::test]
    async fn test_list_store_failure_is_500() {
        let (base, _tx) = start_failing().await;

        let resp = reqwest::get(format!("{}/api/users", base)).await.unwrap();
        assert_eq!(resp.status().as_u16(), 500);
    }
}
