// SQLite Connection Pool Setup

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use waitlist_core::error::{AppError, Result};

static SHARED_POOL: OnceCell<SqlitePool> = OnceCell::const_new();

fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Create SQLite connection pool with WAL mode and bounded waits
///
/// `timeout` bounds both lock waits (busy_timeout) and pool acquisition, so a
/// wedged database surfaces as a storage error instead of a hung request.
/// An in-memory database lives only as long as a connection to it is open, so
/// memory URLs get one connection that is never reaped or recycled.
pub async fn create_pool(database_url: &str, timeout: Duration) -> Result<SqlitePool> {
    // The URL may carry credentials or private paths; keep it out of errors.
    // Non-sqlite schemes would otherwise be read as a file path and created.
    if !database_url.starts_with("sqlite:") {
        return Err(AppError::Config("invalid database url".to_string()));
    }
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|_| AppError::Config("invalid database url".to_string()))?
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(timeout)
        .create_if_missing(true);

    let mut pool_options = SqlitePoolOptions::new().acquire_timeout(timeout);
    pool_options = if is_memory_url(database_url) {
        pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.max_connections(10)
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(|e| AppError::Storage(format!("failed to open database: {}", e)))?;

    debug!(
        max_connections = pool.options().get_max_connections(),
        "SQLite pool created"
    );
    Ok(pool)
}

/// Process-wide pool, created on first use
///
/// Later calls return the first pool regardless of their arguments.
/// If creation fails the cell stays empty and the next call retries.
pub async fn shared_pool(database_url: &str, timeout: Duration) -> Result<SqlitePool> {
    let pool = SHARED_POOL
        .get_or_try_init(|| async {
            info!("Initializing shared database pool");
            create_pool(database_url, timeout).await
        })
        .await?;
    Ok(pool.clone())
}
