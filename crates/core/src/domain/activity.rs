// Activity Catalog (static per deployment, never persisted)

use serde::{Deserialize, Serialize};

/// One selectable activity and how long it occupies the resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub code: String,
    pub label: String,
    pub duration_minutes: u32,
}

impl Activity {
    pub fn new(code: impl Into<String>, label: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            duration_minutes,
        }
    }
}

/// Ordered set of activities, looked up by code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityCatalog {
    activities: Vec<Activity>,
}

impl ActivityCatalog {
    /// Build a catalog, rejecting blank or duplicate codes
    pub fn new(activities: Vec<Activity>) -> Result<Self, String> {
        if activities.is_empty() {
            return Err("activity catalog must not be empty".to_string());
        }
        for (i, activity) in activities.iter().enumerate() {
            if activity.code.trim().is_empty() {
                return Err(format!("activity #{} has an empty code", i + 1));
            }
            if activities[..i].iter().any(|a| a.code == activity.code) {
                return Err(format!("duplicate activity code: {}", activity.code));
            }
        }
        Ok(Self { activities })
    }

    pub fn get(&self, code: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn duration_of(&self, code: &str) -> Option<u32> {
        self.get(code).map(|a| a.duration_minutes)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.activities.iter()
    }

    pub fn as_slice(&self) -> &[Activity] {
        &self.activities
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

impl Default for ActivityCatalog {
    fn default() -> Self {
        Self {
            activities: vec![
                Activity::new("number1", "Number 1", 1),
                Activity::new("number2", "Number 2", 4),
                Activity::new("shave", "Shave", 3),
                Activity::new("shower", "Shower", 15),
                Activity::new("misc", "Miscellaneous", 5),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_durations() {
        let catalog = ActivityCatalog::default();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.duration_of("number1"), Some(1));
        assert_eq!(catalog.duration_of("shower"), Some(15));
        assert_eq!(catalog.duration_of("nap"), None);
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let result = ActivityCatalog::new(vec![
            Activity::new("a", "A", 1),
            Activity::new("a", "A again", 2),
        ]);
        assert!(result.unwrap_err().contains("duplicate"));
    }

    #[test]
    fn test_catalog_rejects_empty() {
        assert!(ActivityCatalog::new(vec![]).is_err());
        assert!(ActivityCatalog::new(vec![Activity::new(" ", "blank", 1)]).is_err());
    }

    #[test]
    fn test_catalog_serializes_as_list() {
        let catalog = ActivityCatalog::new(vec![Activity::new("misc", "Misc", 5)]).unwrap();
        let json = serde_json::to_value(&catalog).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"code": "misc", "label": "Misc", "duration_minutes": 5}])
        );
    }
}
