// Entry Domain Model

use crate::domain::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Entry ID (UUID v4)
pub type EntryId = String;

/// Activity code (key into the ActivityCatalog)
pub type ActivityCode = String;

/// Entry Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    #[default]
    Waiting,
    Using,
    Done,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Waiting => "waiting",
            EntryStatus::Using => "using",
            EntryStatus::Done => "done",
        }
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "waiting" => Ok(EntryStatus::Waiting),
            "using" => Ok(EntryStatus::Using),
            "done" => Ok(EntryStatus::Done),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

/// Waitlist participant record
///
/// Only `status` ever changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub name: String,
    pub status: EntryStatus,
    pub activities: Vec<ActivityCode>,
    pub urgency: bool,
    pub timestamp: i64, // epoch ms
}

impl Entry {
    /// Create a new waiting entry
    ///
    /// # Arguments
    ///
    /// * `id` - Unique entry ID (injected, not generated)
    /// * `timestamp` - Creation time in epoch ms (injected, not system time)
    /// * `name` - Display name, trimmed, must not be empty
    /// * `activities` - Activity codes, duplicates collapsed, must not be empty
    /// * `urgency` - Urgent entries are served before non-urgent ones
    pub fn new(
        id: impl Into<String>,
        timestamp: i64,
        name: &str,
        activities: Vec<ActivityCode>,
        urgency: bool,
    ) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::EmptyName);
        }
        if timestamp < 0 {
            return Err(DomainError::InvalidTimestamp(timestamp));
        }

        let activities = dedup_activities(activities);
        if activities.is_empty() {
            return Err(DomainError::EmptyActivities);
        }

        Ok(Self {
            id: id.into(),
            name: name.to_string(),
            status: EntryStatus::Waiting,
            activities,
            urgency,
            timestamp,
        })
    }

    pub fn is_using(&self) -> bool {
        self.status == EntryStatus::Using
    }

    /// Milliseconds elapsed since submission (negative if clock skewed)
    pub fn age_millis(&self, now_millis: i64) -> i64 {
        now_millis - self.timestamp
    }
}

/// Trim codes, drop blanks and keep the first occurrence of each code
fn dedup_activities(activities: Vec<ActivityCode>) -> Vec<ActivityCode> {
    let mut out: Vec<ActivityCode> = Vec::with_capacity(activities.len());
    for code in activities {
        let code = code.trim();
        if !code.is_empty() && !out.iter().any(|c| c == code) {
            out.push(code.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_defaults_to_waiting() {
        let entry = Entry::new("e-1", 1_000, "Grace", vec!["shower".into()], false).unwrap();
        assert_eq!(entry.status, EntryStatus::Waiting);
        assert_eq!(entry.name, "Grace");
        assert_eq!(entry.timestamp, 1_000);
        assert!(!entry.urgency);
    }

    #[test]
    fn test_new_entry_rejects_blank_name() {
        let err = Entry::new("e-1", 0, "   ", vec!["shower".into()], false).unwrap_err();
        assert_eq!(err, DomainError::EmptyName);
    }

    #[test]
    fn test_new_entry_rejects_empty_activities() {
        let err = Entry::new("e-1", 0, "Grace", vec![], false).unwrap_err();
        assert_eq!(err, DomainError::EmptyActivities);

        let err = Entry::new("e-1", 0, "Grace", vec!["  ".into()], false).unwrap_err();
        assert_eq!(err, DomainError::EmptyActivities);
    }

    #[test]
    fn test_activities_deduplicated_in_order() {
        let entry = Entry::new(
            "e-1",
            0,
            "Nikita",
            vec!["shave".into(), "number1".into(), "shave".into()],
            false,
        )
        .unwrap();
        assert_eq!(entry.activities, vec!["shave", "number1"]);
    }

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!("using".parse::<EntryStatus>().unwrap(), EntryStatus::Using);
        assert_eq!(" Done ".parse::<EntryStatus>().unwrap(), EntryStatus::Done);
        assert!("served".parse::<EntryStatus>().is_err());
        assert_eq!(EntryStatus::Waiting.to_string(), "waiting");
    }

    #[test]
    fn test_status_serde_lowercase() {
        let json = serde_json::to_string(&EntryStatus::Using).unwrap();
        assert_eq!(json, "\"using\"");
    }
}
