//! SDK Error Types

use thiserror::Error;

/// SDK Result type
pub type Result<T> = std::result::Result<T, SdkError>;

/// SDK Error
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Server answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        detail: Option<String>,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SdkError {
    /// HTTP status, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
