//! Class repository for database operations

use sqlx::PgPool;
use tracing::info;

use crate::error::ApiResult;
use crate::models::{Class, NewClass};

const CLASS_COLUMNS: &str = "id, schedule_id, name, code, class_type, start_hour, start_minute, \
                             start_period, end_hour, end_minute, end_period, days";

/// Class repository
#[derive(Clone)]
pub struct ClassRepository {
    pool: PgPool,
}

impl ClassRepository {
    /// Create a new class repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add a class to a schedule
    ///
    /// Callers validate presence of every field first; partial class
    /// records are never persisted.
    pub async fn create(&self, schedule_id: i64, new_class: &NewClass) -> ApiResult<Class> {
        info!(
            "Adding class {} to schedule {}",
            new_class.code, schedule_id
        );

        let class = sqlx::query_as::<_, Class>(&format!(
            r#"
            INSERT INTO classes (schedule_id, name, code, class_type, start_hour, start_minute,
                                 start_period, end_hour, end_minute, end_period, days)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {CLASS_COLUMNS}
            "#
        ))
        .bind(schedule_id)
        .bind(&new_class.name)
        .bind(&new_class.code)
        .bind(&new_class.class_type)
        .bind(&new_class.start_hour)
        .bind(&new_class.start_minute)
        .bind(&new_class.start_period)
        .bind(&new_class.end_hour)
        .bind(&new_class.end_minute)
        .bind(&new_class.end_period)
        .bind(&new_class.days)
        .fetch_one(&self.pool)
        .await?;

        Ok(class)
    }

    /// Find a class by ID
    pub async fn find_by_id(&self, id: i64) -> ApiResult<Option<Class>> {
        let class = sqlx::query_as::<_, Class>(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(class)
    }

    /// Get all classes
    pub async fn get_all(&self) -> ApiResult<Vec<Class>> {
        let classes = sqlx::query_as::<_, Class>(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(classes)
    }

    /// All classes on a schedule, in insertion order
    pub async fn list_by_schedule(&self, schedule_id: i64) -> ApiResult<Vec<Class>> {
        let classes = sqlx::query_as::<_, Class>(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes WHERE schedule_id = $1 ORDER BY id"
        ))
        .bind(schedule_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(classes)
    }
}
