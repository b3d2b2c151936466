//! Class model and related functionality
//!
//! Time-of-day parts are stored as the separate text fields the clients
//! submit (hour, minute, AM/PM period); responses join them into a single
//! display string. No overlap checking is done, a schedule may hold
//! time-conflicting classes.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Class entity
#[derive(Debug, Clone, FromRow)]
pub struct Class {
    pub id: i64,
    pub schedule_id: i64,
    pub name: String,
    pub code: String,
    pub class_type: String,
    pub start_hour: String,
    pub start_minute: String,
    pub start_period: String,
    pub end_hour: String,
    pub end_minute: String,
    pub end_period: String,
    pub days: String,
}

impl Class {
    /// The simplified record used for cross-user equality comparison:
    /// identifiers are dropped, display fields are kept.
    pub fn summary(&self) -> ClassSummary {
        ClassSummary {
            name: self.name.clone(),
            class_type: self.class_type.clone(),
            start_time: join_time(&self.start_hour, &self.start_minute, &self.start_period),
            end_time: join_time(&self.end_hour, &self.end_minute, &self.end_period),
            days: self.days.clone(),
        }
    }
}

fn join_time(hour: &str, minute: &str, period: &str) -> String {
    format!("{}:{} {}", hour, minute, period)
}

/// Payload for adding a class to a schedule; every field is required
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClassRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub class_type: Option<String>,
    pub start_hour: Option<String>,
    pub start_minute: Option<String>,
    pub start_period: Option<String>,
    pub end_hour: Option<String>,
    pub end_minute: Option<String>,
    pub end_period: Option<String>,
    pub days: Option<String>,
}

/// A fully validated class payload, ready to persist
#[derive(Debug, Clone)]
pub struct NewClass {
    pub name: String,
    pub code: String,
    pub class_type: String,
    pub start_hour: String,
    pub start_minute: String,
    pub start_period: String,
    pub end_hour: String,
    pub end_minute: String,
    pub end_period: String,
    pub days: String,
}

/// Public view of a class
#[derive(Debug, Clone, Serialize)]
pub struct ClassResponse {
    pub id: i64,
    pub schedule_id: i64,
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    pub class_type: String,
    pub start_time: String,
    pub end_time: String,
    pub days: String,
}

impl From<&Class> for ClassResponse {
    fn from(class: &Class) -> Self {
        Self {
            id: class.id,
            schedule_id: class.schedule_id,
            name: class.name.clone(),
            code: class.code.clone(),
            class_type: class.class_type.clone(),
            start_time: join_time(&class.start_hour, &class.start_minute, &class.start_period),
            end_time: join_time(&class.end_hour, &class.end_minute, &class.end_period),
            days: class.days.clone(),
        }
    }
}

/// Simplified class record compared by value across users' schedules
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub class_type: String,
    pub start_time: String,
    pub end_time: String,
    pub days: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_class(id: i64, schedule_id: i64) -> Class {
        Class {
            id,
            schedule_id,
            name: "Intro to Databases".to_string(),
            code: "CS 4320".to_string(),
            class_type: "LEC".to_string(),
            start_hour: "10".to_string(),
            start_minute: "10".to_string(),
            start_period: "AM".to_string(),
            end_hour: "11".to_string(),
            end_minute: "00".to_string(),
            end_period: "AM".to_string(),
            days: "MWF".to_string(),
        }
    }

    #[test]
    fn test_summary_joins_time_parts() {
        let summary = sample_class(1, 1).summary();
        assert_eq!(summary.start_time, "10:10 AM");
        assert_eq!(summary.end_time, "11:00 AM");
    }

    #[test]
    fn test_summary_equality_ignores_identifiers() {
        // Two distinct rows with identical display fields count as the same class
        let a = sample_class(1, 10).summary();
        let b = sample_class(2, 20).summary();
        assert_eq!(a, b);
    }

    #[test]
    fn test_summary_inequality_on_display_field() {
        let a = sample_class(1, 10).summary();
        let mut b = sample_class(1, 10);
        b.days = "TR".to_string();
        assert_ne!(a, b.summary());
    }
}
