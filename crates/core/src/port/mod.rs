// Port Layer - Interfaces for external dependencies

pub mod entry_store;
pub mod id_provider; // For deterministic testing
pub mod time_provider;

// Re-exports
pub use entry_store::{EntryPredicate, EntryStore};
pub use id_provider::IdProvider;
pub use time_provider::TimeProvider;
