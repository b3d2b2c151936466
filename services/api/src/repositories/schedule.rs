//! Schedule repository for database operations

use sqlx::PgPool;

use crate::error::ApiResult;
use crate::models::Schedule;

/// Schedule repository
#[derive(Clone)]
pub struct ScheduleRepository {
    pool: PgPool,
}

impl ScheduleRepository {
    /// Create a new schedule repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a schedule by ID
    pub async fn find_by_id(&self, id: i64) -> ApiResult<Option<Schedule>> {
        let schedule =
            sqlx::query_as::<_, Schedule>("SELECT id, user_id FROM schedules WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(schedule)
    }

    /// Find the schedule owned by a user
    pub async fn find_by_user_id(&self, user_id: i64) -> ApiResult<Option<Schedule>> {
        let schedule =
            sqlx::query_as::<_, Schedule>("SELECT id, user_id FROM schedules WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(schedule)
    }

    /// Get all schedules
    pub async fn get_all(&self) -> ApiResult<Vec<Schedule>> {
        let schedules =
            sqlx::query_as::<_, Schedule>("SELECT id, user_id FROM schedules ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(schedules)
    }
}
