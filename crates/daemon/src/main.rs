//! Waitlist Engine - Daemon Entry Point
//! HTTP server + periodic expiry sweeper over a shared SQLite store

mod settings;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::settings::{LogFormat, Settings};
use waitlist_api_http::{HttpServer, HttpServerConfig};
use waitlist_core::application::{shutdown_channel, Sweeper, WaitlistService};
use waitlist_core::port::id_provider::UuidProvider;
use waitlist_core::port::time_provider::SystemTimeProvider;
use waitlist_infra_sqlite::{run_migrations, shared_pool, SqliteEntryStore};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_LOG_FILTER: &str = "waitlist=info,tower_http=info";

#[derive(Parser)]
#[command(name = "waitlistd")]
#[command(about = "Waitlist Engine daemon", version)]
struct Args {
    /// Config file (TOML)
    #[arg(long, env = "WAITLIST_CONFIG")]
    config: Option<String>,
}

fn init_logging(format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .context("Failed to create env filter")?;

    match format {
        LogFormat::Json => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .try_init()?;
        }
        LogFormat::Pretty => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .try_init()?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref()).context("Failed to load configuration")?;

    // 2. Initialize logging
    init_logging(settings.log_format)?;
    info!("Waitlist Engine v{} starting...", VERSION);

    let policy = settings
        .waitlist_config()
        .context("Invalid configuration")?;

    // 3. Initialize database
    let database_url = settings.database_url();
    if let Some(path) = database_url.strip_prefix("sqlite://") {
        if let Some(parent) = std::path::Path::new(path).parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    info!("Initializing database...");
    let pool = shared_pool(&database_url, settings.store_timeout())
        .await
        .context("DB pool creation failed")?;
    run_migrations(&pool).await.context("Migration failed")?;

    // 4. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let store = Arc::new(SqliteEntryStore::new(pool.clone()));
    let max_wait_ms = policy.max_wait_ms;
    let service = Arc::new(WaitlistService::new(
        store.clone(),
        Arc::new(UuidProvider),
        time_provider.clone(),
        policy,
    ));

    // 5. Sweep once so a restart does not serve stale entries
    match service.cleanup().await {
        Ok(removed) => info!(removed = removed, "Startup sweep completed"),
        Err(e) => tracing::error!(error = ?e, "Startup sweep failed"),
    }

    let (shutdown_tx, shutdown_rx) = shutdown_channel();

    // 6. Start HTTP server
    let http_config = HttpServerConfig {
        host: settings.http.host.clone(),
        port: settings.http.port,
    };
    let server = HttpServer::new(http_config, service)
        .start(shutdown_rx.clone())
        .await
        .context("HTTP server start failed")?;

    // 7. Start periodic sweeper
    let sweeper = Sweeper::new(
        store,
        time_provider,
        max_wait_ms,
        settings.sweep_interval(),
    );
    let sweeper_handle = tokio::spawn(sweeper.run(shutdown_rx));

    info!(addr = %server.local_addr(), "System ready");
    info!("Press Ctrl+C to shutdown");

    // 8. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 9. Graceful shutdown
    shutdown_tx.shutdown();
    let _ = tokio::time::timeout(Duration::from_secs(5), server.stopped()).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), sweeper_handle).await;
    pool.close().await;

    info!("Shutdown complete.");

    Ok(())
}
