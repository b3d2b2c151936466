//! User repository for database operations

use sqlx::PgPool;
use tracing::info;

use crate::credentials::IssuedSession;
use crate::error::{ApiError, ApiResult, on_unique_violation};
use crate::models::User;

const USER_COLUMNS: &str =
    "id, name, netid, email, password_hash, session_token, session_expiration, update_token";

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user and their empty schedule in one transaction
    ///
    /// The email is checked first so the common duplicate case gets a clean
    /// conflict; the storage-level uniqueness constraint backstops the race
    /// between two concurrent registrations.
    pub async fn create(
        &self,
        name: &str,
        netid: &str,
        email: &str,
        password_hash: &str,
        session: &IssuedSession,
    ) -> ApiResult<User> {
        info!("Creating new user: {}", email);

        if self.find_by_email(email).await?.is_some() {
            return Err(ApiError::AlreadyExists("user"));
        }

        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, netid, email, password_hash, session_token, session_expiration, update_token)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(netid)
        .bind(email)
        .bind(password_hash)
        .bind(&session.session_token)
        .bind(session.session_expiration)
        .bind(&session.update_token)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| on_unique_violation(e, ApiError::AlreadyExists("user")))?;

        sqlx::query("INSERT INTO schedules (user_id) VALUES ($1)")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i64) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by netid
    pub async fn find_by_netid(&self, netid: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE netid = $1"
        ))
        .bind(netid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by session token
    pub async fn find_by_session_token(&self, token: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE session_token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by update token
    pub async fn find_by_update_token(&self, token: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE update_token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get all users
    pub async fn get_all(&self) -> ApiResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Persist a freshly issued session/update token pair
    pub async fn save_session(&self, user_id: i64, session: &IssuedSession) -> ApiResult<()> {
        info!("Saving new session for user {}", user_id);

        sqlx::query(
            r#"
            UPDATE users
            SET session_token = $2, session_expiration = $3, update_token = $4
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(&session.session_token)
        .bind(session.session_expiration)
        .bind(&session.update_token)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Invalidate the user's session by moving its expiration to now,
    /// leaving the token value in place
    pub async fn expire_session(&self, user_id: i64) -> ApiResult<()> {
        info!("Expiring session for user {}", user_id);

        sqlx::query("UPDATE users SET session_expiration = now() WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
