// Waitlist Infrastructure - SQLite Adapter
// Implements: EntryStore

mod connection;
mod entry_store;
mod migration;

pub use connection::{create_pool, shared_pool};
pub use entry_store::SqliteEntryStore;
pub use migration::run_migrations;

// Note: sqlx::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
