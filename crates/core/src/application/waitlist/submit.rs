// Submit Use Case

use crate::application::waitlist::WaitlistConfig;
use crate::domain::{active_since, is_expired, ActivityCatalog, DomainError, Entry};
use crate::error::{AppError, Result};
use crate::port::{EntryStore, IdProvider, TimeProvider};
use serde::{Deserialize, Serialize};
use tracing::info;

/// How far ahead of the server clock a client-supplied timestamp may be
pub const MAX_CLOCK_SKEW_MS: i64 = 60 * 1000;

/// Submit request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub name: String,
    pub activities: Vec<String>,

    #[serde(default)]
    pub urgency: bool,

    /// Client clock at submission (epoch ms); server clock when absent
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// Reject activity codes the catalog does not know
pub fn validate_activities(entry: &Entry, catalog: &ActivityCatalog) -> Result<()> {
    match entry.activities.iter().find(|code| !catalog.contains(code)) {
        Some(code) => Err(DomainError::UnknownActivity(code.clone()).into()),
        None => Ok(()),
    }
}

/// Execute submit use case
///
/// # Arguments
///
/// * `store` - Entry store (uniqueness check + insert in one step)
/// * `id_provider` - ID generator (injected for determinism)
/// * `time_provider` - Time provider (injected for determinism)
/// * `config` - Wait window and activity catalog
/// * `req` - Submit request
pub async fn execute(
    store: &dyn EntryStore,
    id_provider: &dyn IdProvider,
    time_provider: &dyn TimeProvider,
    config: &WaitlistConfig,
    req: SubmitRequest,
) -> Result<Entry> {
    let now = time_provider.now_millis();
    let timestamp = req.timestamp.unwrap_or(now);

    let entry = Entry::new(
        id_provider.generate_id(),
        timestamp,
        &req.name,
        req.activities,
        req.urgency,
    )?;
    validate_activities(&entry, &config.catalog)?;

    if is_expired(&entry, now, config.max_wait_ms) {
        return Err(AppError::Validation(
            "timestamp is older than the wait window".to_string(),
        ));
    }
    if entry.timestamp > now + MAX_CLOCK_SKEW_MS {
        return Err(AppError::Validation("timestamp is in the future".to_string()));
    }

    store
        .insert(&entry, active_since(now, config.max_wait_ms))
        .await?;

    info!(
        entry_id = %entry.id,
        name = %entry.name,
        urgency = entry.urgency,
        activities = ?entry.activities,
        "Entry submitted"
    );

    Ok(entry)
}
