// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Please select at least one activity")]
    EmptyActivities,

    #[error("Unknown activity: {0}")]
    UnknownActivity(String),

    #[error("Invalid status: {0} (expected waiting, using or done)")]
    InvalidStatus(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(i64),
}

pub type Result<T> = std::result::Result<T, DomainError>;
