// Expiry Policy

use crate::domain::Entry;

/// Default maximum wait window (20 minutes)
pub const MAX_WAIT_TIME_MS: i64 = 20 * 60 * 1000;

/// True iff the entry has waited strictly longer than `max_wait_ms`
///
/// Monotonic in `now_millis`: once expired, an entry never un-expires.
pub fn is_expired(entry: &Entry, now_millis: i64, max_wait_ms: i64) -> bool {
    entry.age_millis(now_millis) > max_wait_ms
}

/// Oldest timestamp that is still inside the wait window at `now_millis`
pub fn active_since(now_millis: i64, max_wait_ms: i64) -> i64 {
    now_millis.saturating_sub(max_wait_ms)
}
