// Wait-Time Estimator (pure projection, recomputed on every refresh)

use crate::domain::{order_queue, ActivityCatalog, Entry};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Queue slot shown on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuePosition {
    /// 1-based display position
    pub position: usize,
    pub estimated_wait_minutes: u32,
    pub entry: Entry,
}

/// Minutes the entry itself will occupy the resource
///
/// Unknown activity codes count as zero and are logged as a data-quality warning.
pub fn entry_duration(entry: &Entry, catalog: &ActivityCatalog) -> u32 {
    entry
        .activities
        .iter()
        .map(|code| match catalog.duration_of(code) {
            Some(minutes) => minutes,
            None => {
                warn!(
                    entry_id = %entry.id,
                    activity = %code,
                    "Unknown activity code, counting as 0 minutes"
                );
                0
            }
        })
        .fold(0u32, u32::saturating_add)
}

/// Estimated wait for the entry at `index` of an already ordered queue
///
/// Sum of the durations of every entry strictly ahead of it. Index 0 is
/// always 0; an index past the end sums the whole queue.
pub fn estimate_wait(ordered: &[Entry], index: usize, catalog: &ActivityCatalog) -> u32 {
    let end = index.min(ordered.len());
    ordered[..end]
        .iter()
        .map(|e| entry_duration(e, catalog))
        .fold(0u32, u32::saturating_add)
}

/// Order the entries and annotate each with its position and estimated wait
pub fn annotate_queue(entries: Vec<Entry>, catalog: &ActivityCatalog) -> Vec<QueuePosition> {
    let mut ahead = 0u32;
    order_queue(entries)
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let slot = QueuePosition {
                position: index + 1,
                estimated_wait_minutes: ahead,
                entry,
            };
            ahead = ahead.saturating_add(entry_duration(&slot.entry, catalog));
            slot
        })
        .collect()
}
