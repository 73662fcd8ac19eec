//! Queue Ordering Policy
//!
//! Display order, most significant key first:
//! 1. entries currently `using` the resource
//! 2. urgent entries
//! 3. everyone else
//!
//! Ties inside a tier go to the earlier timestamp (FIFO). The sort is stable,
//! so entries with identical keys keep their input order.

use crate::domain::Entry;

fn tier(entry: &Entry) -> u8 {
    if entry.is_using() {
        0
    } else if entry.urgency {
        1
    } else {
        2
    }
}

/// Produce the display order for the given entries
pub fn order_queue(mut entries: Vec<Entry>) -> Vec<Entry> {
    // slice::sort_by_key is stable
    entries.sort_by_key(|e| (tier(e), e.timestamp));
    entries
}
