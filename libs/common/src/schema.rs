//! Schema bootstrap for the scheduling database
//!
//! Creates the four tables on startup if they do not exist yet. Email,
//! netid, and both token columns carry storage-level uniqueness so that
//! concurrent registrations cannot slip past the application-level checks,
//! and a friendship pair can hold at most one edge per direction.

use crate::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::info;

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    netid TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    session_token TEXT NOT NULL UNIQUE,
    session_expiration TIMESTAMPTZ NOT NULL,
    update_token TEXT NOT NULL UNIQUE
)
"#;

const CREATE_SCHEDULES: &str = r#"
CREATE TABLE IF NOT EXISTS schedules (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE
)
"#;

const CREATE_CLASSES: &str = r#"
CREATE TABLE IF NOT EXISTS classes (
    id BIGSERIAL PRIMARY KEY,
    schedule_id BIGINT NOT NULL REFERENCES schedules(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    code TEXT NOT NULL,
    class_type TEXT NOT NULL,
    start_hour TEXT NOT NULL,
    start_minute TEXT NOT NULL,
    start_period TEXT NOT NULL,
    end_hour TEXT NOT NULL,
    end_minute TEXT NOT NULL,
    end_period TEXT NOT NULL,
    days TEXT NOT NULL
)
"#;

const CREATE_FRIENDSHIPS: &str = r#"
CREATE TABLE IF NOT EXISTS friendships (
    id BIGSERIAL PRIMARY KEY,
    sender_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    receiver_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    accepted BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (sender_id, receiver_id)
)
"#;

/// Create all tables if they do not exist yet
pub async fn init_schema(pool: &PgPool) -> DatabaseResult<()> {
    info!("Bootstrapping database schema");

    for statement in [
        CREATE_USERS,
        CREATE_SCHEDULES,
        CREATE_CLASSES,
        CREATE_FRIENDSHIPS,
    ] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(DatabaseError::Schema)?;
    }

    Ok(())
}
