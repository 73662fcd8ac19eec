// ID Provider Port (for deterministic testing)

/// ID provider interface (allows deterministic IDs in tests)
pub trait IdProvider: Send + Sync {
    /// Generate a new unique entry ID
    fn generate_id(&self) -> String;
}

/// UUID v4 provider (production)
pub struct UuidProvider;

impl IdProvider for UuidProvider {
    fn generate_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Yields entry-1, entry-2, ...
    #[derive(Default)]
    pub struct SequentialIdProvider {
        next: AtomicU64,
    }

    impl IdProvider for SequentialIdProvider {
        fn generate_id(&self) -> String {
            format!("entry-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }
}
