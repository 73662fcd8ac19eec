//! HTTP Request/Response Types

use serde::{Deserialize, Serialize};

pub use waitlist_core::application::SubmitRequest;

/// DELETE /api/user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoveRequest {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveResponse {
    pub message: String,
    pub id: String,
}

/// PUT /api/user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// GET /api/cleanup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupResponse {
    pub message: String,
    pub removed: u64,
}

impl CleanupResponse {
    pub fn new(removed: u64) -> Self {
        let message = if removed > 0 {
            format!("{} users removed from the waitlist.", removed)
        } else {
            "No users to remove.".to_string()
        };
        Self { message, removed }
    }
}

/// GET /health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
