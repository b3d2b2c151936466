//! Schedule model and related functionality

use serde::Serialize;
use sqlx::FromRow;

use crate::models::class::ClassResponse;

/// Schedule entity; every user owns exactly one, created at registration
#[derive(Debug, Clone, FromRow)]
pub struct Schedule {
    pub id: i64,
    pub user_id: i64,
}

/// Public view of a schedule with its classes
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleResponse {
    pub id: i64,
    pub user_id: i64,
    pub classes: Vec<ClassResponse>,
}

impl ScheduleResponse {
    pub fn new(schedule: &Schedule, classes: Vec<ClassResponse>) -> Self {
        Self {
            id: schedule.id,
            user_id: schedule.user_id,
            classes,
        }
    }
}
