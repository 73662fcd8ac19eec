// Waitlist Service - Core use cases for queue management

pub mod submit;


pub use submit::SubmitRequest;

use crate::application::sweeper::sweep_expired;
use crate::domain::{
    annotate_queue, ActivityCatalog, Entry, EntryId, EntryStatus, QueuePosition, MAX_WAIT_TIME_MS,
};
use crate::error::{AppError, Result};
use crate::port::{EntryStore, IdProvider, TimeProvider};
use std::sync::Arc;
use tracing::{debug, info};

/// Per-deployment waitlist policy
#[derive(Debug, Clone)]
pub struct WaitlistConfig {
    /// Entries older than this are expired (ms)
    pub max_wait_ms: i64,
    pub catalog: ActivityCatalog,
}

impl Default for WaitlistConfig {
    fn default() -> Self {
        Self {
            max_wait_ms: MAX_WAIT_TIME_MS,
            catalog: ActivityCatalog::default(),
        }
    }
}

/// Waitlist Service
pub struct WaitlistService {
    store: Arc<dyn EntryStore>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
    config: WaitlistConfig,
}

impl WaitlistService {
    pub fn new(
        store: Arc<dyn EntryStore>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
        config: WaitlistConfig,
    ) -> Self {
        Self {
            store,
            id_provider,
            time_provider,
            config,
        }
    }

    pub fn catalog(&self) -> &ActivityCatalog {
        &self.config.catalog
    }

    pub fn max_wait_ms(&self) -> i64 {
        self.config.max_wait_ms
    }

    /// Add a participant to the waitlist
    pub async fn submit(&self, req: SubmitRequest) -> Result<Entry> {
        submit::execute(
            self.store.as_ref(),
            self.id_provider.as_ref(),
            self.time_provider.as_ref(),
            &self.config,
            req,
        )
        .await
    }

    /// Remove a participant (left or served)
    pub async fn remove(&self, id: &EntryId) -> Result<()> {
        if !self.store.remove(id).await? {
            return Err(AppError::NotFound(format!("Entry {} not found", id)));
        }
        info!(entry_id = %id, "Entry removed");
        Ok(())
    }

    /// Change the status of one entry
    ///
    /// Marking an entry `using` removes the previous `using` entry.
    pub async fn set_status(&self, id: &EntryId, status: EntryStatus) -> Result<Entry> {
        let entry = self.store.set_status(id, status).await?;
        info!(entry_id = %id, status = %status, "Entry status updated");
        Ok(entry)
    }

    /// Sweep expired entries, then return the rest (unordered)
    pub async fn list(&self) -> Result<Vec<Entry>> {
        self.cleanup().await?;
        let entries = self.store.list_all().await?;
        debug!(count = entries.len(), "Listed entries");
        Ok(entries)
    }

    /// Run the expiry sweep on its own
    pub async fn cleanup(&self) -> Result<u64> {
        sweep_expired(
            self.store.as_ref(),
            self.time_provider.now_millis(),
            self.config.max_wait_ms,
        )
        .await
    }

    /// Ordered queue with estimated waits
    pub async fn board(&self) -> Result<Vec<QueuePosition>> {
        let entries = self.list().await?;
        Ok(annotate_queue(entries, &self.config.catalog))
    }
}
