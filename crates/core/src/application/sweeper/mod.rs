// Expiry Sweeper
// Removes entries that outlived the wait window, on demand or periodically

mod shutdown;

pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use crate::domain::{is_expired, Entry};
use crate::error::Result;
use crate::port::{EntryStore, TimeProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

/// Delete every entry expired at `now_millis`, returns the count removed
///
/// Idempotent: entries already gone are simply not matched, so redundant
/// sweeps in close succession are harmless.
pub async fn sweep_expired(
    store: &dyn EntryStore,
    now_millis: i64,
    max_wait_ms: i64,
) -> Result<u64> {
    let removed = store
        .remove_where(&|entry: &Entry| is_expired(entry, now_millis, max_wait_ms))
        .await?;

    if removed > 0 {
        info!(removed = removed, "Expired entries removed from the waitlist");
    } else {
        debug!("No expired entries");
    }

    Ok(removed)
}

/// Shortest period a sweeper will tick at
pub const MIN_SWEEP_PERIOD: Duration = Duration::from_millis(1);

/// Periodic sweeper
///
/// Runs `sweep_expired` every `period` in the background
pub struct Sweeper {
    store: Arc<dyn EntryStore>,
    time_provider: Arc<dyn TimeProvider>,
    max_wait_ms: i64,
    period: Duration,
}

impl Sweeper {
    /// Create a new sweeper
    ///
    /// # Arguments
    /// * `store` - Entry store to sweep
    /// * `time_provider` - Clock used to decide expiry
    /// * `max_wait_ms` - Wait window (ms)
    /// * `period` - How often to sweep, raised to `MIN_SWEEP_PERIOD` if shorter
    pub fn new(
        store: Arc<dyn EntryStore>,
        time_provider: Arc<dyn TimeProvider>,
        max_wait_ms: i64,
        period: Duration,
    ) -> Self {
        Self {
            store,
            time_provider,
            max_wait_ms,
            period: period.max(MIN_SWEEP_PERIOD),
        }
    }

    /// Run one sweep now
    pub async fn run_once(&self) -> Result<u64> {
        sweep_expired(
            self.store.as_ref(),
            self.time_provider.now_millis(),
            self.max_wait_ms,
        )
        .await
    }

    /// Run the sweep loop until shutdown is signalled
    ///
    /// Failures are logged and the loop keeps going.
    /// Should be spawned in tokio::spawn
    pub async fn run(self, mut shutdown: ShutdownToken) {
        info!(
            period_ms = self.period.as_millis() as u64,
            max_wait_ms = self.max_wait_ms,
            "Sweeper started"
        );

        let mut tick = interval(self.period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.wait() => break,
                _ = tick.tick() => {
                    if let Err(e) = self.run_once().await {
                        error!(error = ?e, "Scheduled sweep failed");
                    }
                }
            }
        }

        info!("Sweeper stopped");
    }
}
