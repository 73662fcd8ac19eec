//! SDK Request/Response Types
//!
//! Mirrors the JSON bodies of the HTTP API.

use serde::{Deserialize, Serialize};

pub use waitlist_core::application::SubmitRequest;
pub use waitlist_core::domain::{Activity, Entry, EntryStatus, QueuePosition};

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RemoveRequest<'a> {
    pub id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct UpdateStatusRequest<'a> {
    pub id: &'a str,
    pub status: EntryStatus,
}

/// Response from remove operation
#[derive(Debug, Clone, Deserialize)]
pub struct RemoveResponse {
    pub message: String,
    pub id: String,
}

/// Response from cleanup operation
#[derive(Debug, Clone, Deserialize)]
pub struct CleanupResponse {
    pub message: String,
    pub removed: u64,
}

/// Response from health check
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error body returned by failing routes
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
    #[serde(default)]
    pub error: Option<String>,
}
