// Domain Layer - Pure business logic and entities

pub mod activity;
pub mod entry;
pub mod error;
pub mod estimate;
pub mod expiry;
pub mod ordering;

// Re-exports
pub use activity::{Activity, ActivityCatalog};
pub use entry::{ActivityCode, Entry, EntryId, EntryStatus};
pub use error::DomainError;
pub use estimate::{annotate_queue, entry_duration, estimate_wait, QueuePosition};
pub use expiry::{active_since, is_expired, MAX_WAIT_TIME_MS};
pub use ordering::order_queue;
