// Entry Store Port (Interface)

use crate::domain::{Entry, EntryId, EntryStatus};
use crate::error::Result;
use async_trait::async_trait;

/// Predicate used for bulk removal (e.g. the expiry sweep)
pub type EntryPredicate<'a> = &'a (dyn Fn(&Entry) -> bool + Send + Sync);

/// Store interface for waitlist entries
///
/// Every method is atomic with respect to a single entry: no partially
/// updated entry is ever observable.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Insert a new entry
    ///
    /// Fails with `AppError::Conflict` if another entry with the same name,
    /// `timestamp >= active_since` and a status other than `done` exists.
    /// The check and the insert are a single step, so two concurrent inserts
    /// of the same name cannot both succeed.
    async fn insert(&self, entry: &Entry, active_since: i64) -> Result<()>;

    /// Find entry by ID
    async fn find_by_id(&self, id: &EntryId) -> Result<Option<Entry>>;

    /// Remove entry by ID, returns false if it did not exist
    async fn remove(&self, id: &EntryId) -> Result<bool>;

    /// Update the status of one entry
    ///
    /// Setting `using` removes any other entry currently `using` in the same
    /// step, so at most one entry holds the resource.
    /// Fails with `AppError::NotFound` if the entry does not exist.
    async fn set_status(&self, id: &EntryId, status: EntryStatus) -> Result<Entry>;

    /// All entries, oldest first
    async fn list_all(&self) -> Result<Vec<Entry>>;

    /// Remove every entry matching the predicate, returns the count removed
    async fn remove_where(&self, predicate: EntryPredicate<'_>) -> Result<u64>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// In-memory EntryStore (single mutex, so every operation is atomic)
    #[derive(Default)]
    pub struct InMemoryEntryStore {
        entries: Mutex<Vec<Entry>>,
        failing: AtomicBool,
    }

    impl InMemoryEntryStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every subsequent call fail with a storage error
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub fn len(&self) -> usize {
            self.entries.lock().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        fn check(&self) -> Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(AppError::Storage("store unavailable".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl EntryStore for InMemoryEntryStore {
        async fn insert(&self, entry: &Entry, active_since: i64) -> Result<()> {
            self.check()?;
            let mut entries = self.entries.lock().unwrap();
            let taken = entries.iter().any(|e| {
                e.name == entry.name
                    && e.timestamp >= active_since
                    && e.status != EntryStatus::Done
            });
            if taken {
                return Err(AppError::Conflict(format!(
                    "{} is already in the queue",
                    entry.name
                )));
            }
            if entries.iter().any(|e| e.id == entry.id) {
                return Err(AppError::Storage(format!("duplicate id {}", entry.id)));
            }
            entries.push(entry.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: &EntryId) -> Result<Option<Entry>> {
            self.check()?;
            let entries = self.entries.lock().unwrap();
            Ok(entries.iter().find(|e| &e.id == id).cloned())
        }

        async fn remove(&self, id: &EntryId) -> Result<bool> {
            self.check()?;
            let mut entries = self.entries.lock().unwrap();
            let before = entries.len();
            entries.retain(|e| &e.id != id);
            Ok(entries.len() < before)
        }

        async fn set_status(&self, id: &EntryId, status: EntryStatus) -> Result<Entry> {
            self.check()?;
            let mut entries = self.entries.lock().unwrap();
            if !entries.iter().any(|e| &e.id == id) {
                return Err(AppError::NotFound(format!("Entry {} not found", id)));
            }
            if status == EntryStatus::Using {
                entries.retain(|e| &e.id == id || !e.is_using());
            }
            let entry = entries
                .iter_mut()
                .find(|e| &e.id == id)
                .ok_or_else(|| AppError::NotFound(format!("Entry {} not found", id)))?;
            entry.status = status;
            Ok(entry.clone())
        }

        async fn list_all(&self) -> Result<Vec<Entry>> {
            self.check()?;
            let mut entries = self.entries.lock().unwrap().clone();
            entries.sort_by_key(|e| e.timestamp);
            Ok(entries)
        }

        async fn remove_where(&self, predicate: EntryPredicate<'_>) -> Result<u64> {
            self.check()?;
            let mut entries = self.entries.lock().unwrap();
            let before = entries.len();
            entries.retain(|e| !predicate(e));
            Ok((before - entries.len()) as u64)
        }
    }
}
