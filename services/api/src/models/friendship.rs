//! Friendship model and related functionality
//!
//! A friendship is a directed edge between two users. A freshly sent
//! request is pending (`accepted = false`); accepting flips the flag,
//! declining deletes the row entirely.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Friendship entity
#[derive(Debug, Clone, FromRow)]
pub struct Friendship {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub accepted: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for sending a friend request; the target is named by netid
#[derive(Debug, Clone, Deserialize)]
pub struct SendFriendRequest {
    pub netid: Option<String>,
}

/// Payload for responding to a friend request
#[derive(Debug, Clone, Deserialize)]
pub struct RespondRequest {
    pub accepted: Option<String>,
}

/// Public view of a friendship edge
#[derive(Debug, Clone, Serialize)]
pub struct FriendshipResponse {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub accepted: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Friendship> for FriendshipResponse {
    fn from(friendship: &Friendship) -> Self {
        Self {
            id: friendship.id,
            sender_id: friendship.sender_id,
            receiver_id: friendship.receiver_id,
            accepted: friendship.accepted,
            created_at: friendship.created_at,
        }
    }
}
