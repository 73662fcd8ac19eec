//! Shared harness: temp-file SQLite + live HTTP server on an ephemeral port

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use waitlist_api_http::{HttpServer, HttpServerConfig, HttpServerHandle};
use waitlist_core::application::{shutdown_channel, ShutdownSender, WaitlistConfig, WaitlistService};
use waitlist_core::port::id_provider::UuidProvider;
use waitlist_core::port::time_provider::mocks::FixedTimeProvider;
use waitlist_infra_sqlite::{create_pool, run_migrations, SqliteEntryStore};
use waitlist_sdk::{SubmitRequest, WaitlistClient};

pub const START: i64 = 1_700_000_000_000;

pub struct TestApp {
    pub client: WaitlistClient,
    pub http: reqwest::Client,
    pub base_url: String,
    pub clock: Arc<FixedTimeProvider>,
    pub store: Arc<SqliteEntryStore>,
    pub database_url: String,
    shutdown: ShutdownSender,
    server: Option<HttpServerHandle>,
    _dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let database_url = format!("sqlite://{}", dir.path().join("waitlist.db").display());

        let pool = create_pool(&database_url, Duration::from_secs(5))
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();

        let clock = Arc::new(FixedTimeProvider::new(START));
        let store = Arc::new(SqliteEntryStore::new(pool));
        let service = Arc::new(WaitlistService::new(
            store.clone(),
            Arc::new(UuidProvider),
            clock.clone(),
            WaitlistConfig::default(),
        ));

        let (shutdown, token) = shutdown_channel();
        let config = HttpServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        let server = HttpServer::new(config, service).start(token).await.unwrap();
        let base_url = format!("http://{}", server.local_addr());

        Self {
            client: WaitlistClient::connect(&base_url).unwrap(),
            http: reqwest::Client::new(),
            base_url,
            clock,
            store,
            database_url,
            shutdown,
            server: Some(server),
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn stop(mut self) {
        self.shutdown.shutdown();
        if let Some(server) = self.server.take() {
            tokio::time::timeout(Duration::from_secs(5), server.stopped())
                .await
                .unwrap();
        }
    }
}

pub fn request(name: &str, activities: &[&str], urgency: bool) -> SubmitRequest {
    SubmitRequest {
        name: name.to_string(),
        activities: activities.iter().map(|s| s.to_string()).collect(),
        urgency,
        timestamp: None,
    }
}
