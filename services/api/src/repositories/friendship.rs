//! Friendship repository for database operations
//!
//! Responding to a request has to survive two concurrent responses, so
//! accept and decline are single conditional statements guarded on the
//! pending state; only one of the two racers can see a row.

use sqlx::PgPool;
use tracing::info;

use crate::error::{ApiError, ApiResult, on_unique_violation};
use crate::models::Friendship;

const FRIENDSHIP_COLUMNS: &str = "id, sender_id, receiver_id, accepted, created_at";

/// Friendship repository
#[derive(Clone)]
pub struct FriendshipRepository {
    pool: PgPool,
}

impl FriendshipRepository {
    /// Create a new friendship repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a pending friend request from sender to receiver
    ///
    /// At most one edge may exist per ordered (sender, receiver) pair; a
    /// duplicate request is a conflict.
    pub async fn create(&self, sender_id: i64, receiver_id: i64) -> ApiResult<Friendship> {
        info!(
            "Creating friend request from {} to {}",
            sender_id, receiver_id
        );

        let friendship = sqlx::query_as::<_, Friendship>(&format!(
            r#"
            INSERT INTO friendships (sender_id, receiver_id, accepted)
            VALUES ($1, $2, FALSE)
            RETURNING {FRIENDSHIP_COLUMNS}
            "#
        ))
        .bind(sender_id)
        .bind(receiver_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| on_unique_violation(e, ApiError::AlreadyExists("friend request")))?;

        Ok(friendship)
    }

    /// Find a friendship by ID
    pub async fn find_by_id(&self, id: i64) -> ApiResult<Option<Friendship>> {
        let friendship = sqlx::query_as::<_, Friendship>(&format!(
            "SELECT {FRIENDSHIP_COLUMNS} FROM friendships WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(friendship)
    }

    /// Get all friendships
    pub async fn get_all(&self) -> ApiResult<Vec<Friendship>> {
        let friendships = sqlx::query_as::<_, Friendship>(&format!(
            "SELECT {FRIENDSHIP_COLUMNS} FROM friendships ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(friendships)
    }

    /// All edges where the user is sender or receiver, in insertion order
    pub async fn list_for_user(&self, user_id: i64) -> ApiResult<Vec<Friendship>> {
        let friendships = sqlx::query_as::<_, Friendship>(&format!(
            r#"
            SELECT {FRIENDSHIP_COLUMNS} FROM friendships
            WHERE sender_id = $1 OR receiver_id = $1
            ORDER BY id
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(friendships)
    }

    /// Accepted edges where the user is sender or receiver, in insertion order
    pub async fn accepted_for_user(&self, user_id: i64) -> ApiResult<Vec<Friendship>> {
        let friendships = sqlx::query_as::<_, Friendship>(&format!(
            r#"
            SELECT {FRIENDSHIP_COLUMNS} FROM friendships
            WHERE (sender_id = $1 OR receiver_id = $1) AND accepted
            ORDER BY id
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(friendships)
    }

    /// Accept a pending friend request
    ///
    /// The update only matches a pending row; a resolved request is a state
    /// conflict and an unknown id is a miss.
    pub async fn accept(&self, id: i64) -> ApiResult<Friendship> {
        info!("Accepting friend request {}", id);

        let updated = sqlx::query_as::<_, Friendship>(&format!(
            r#"
            UPDATE friendships SET accepted = TRUE
            WHERE id = $1 AND NOT accepted
            RETURNING {FRIENDSHIP_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(friendship) => Ok(friendship),
            None => Err(self.resolve_miss(id).await?),
        }
    }

    /// Decline a pending friend request, deleting the row permanently
    pub async fn decline(&self, id: i64) -> ApiResult<()> {
        info!("Declining friend request {}", id);

        let deleted = sqlx::query("DELETE FROM friendships WHERE id = $1 AND NOT accepted")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(self.resolve_miss(id).await?);
        }

        Ok(())
    }

    /// Distinguish an already-resolved request from an unknown id after a
    /// conditional accept/decline matched nothing
    async fn resolve_miss(&self, id: i64) -> ApiResult<ApiError> {
        match self.find_by_id(id).await? {
            Some(_) => Ok(ApiError::InvalidState(
                "friend request has already been responded to",
            )),
            None => Ok(ApiError::NotFound("friend request")),
        }
    }
}
