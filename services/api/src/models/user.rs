//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::friendship::FriendshipResponse;

/// User entity
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub netid: String,
    pub email: String,
    pub password_hash: String,
    pub session_token: String,
    pub session_expiration: DateTime<Utc>,
    pub update_token: String,
}

/// Registration payload; every field is required
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub netid: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login payload
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Token triple returned by register, login, and session renewal
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub session_token: String,
    pub session_expiration: String,
    pub update_token: String,
}

impl From<&User> for TokenResponse {
    fn from(user: &User) -> Self {
        Self {
            session_token: user.session_token.clone(),
            session_expiration: user.session_expiration.to_rfc3339(),
            update_token: user.update_token.clone(),
        }
    }
}

/// Public view of a user; never exposes credentials
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub netid: String,
    pub email: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            netid: user.netid.clone(),
            email: user.email.clone(),
        }
    }
}

/// Single-user view carrying the user's friendship edges
#[derive(Debug, Clone, Serialize)]
pub struct UserDetailResponse {
    pub id: i64,
    pub name: String,
    pub netid: String,
    pub email: String,
    pub friends: Vec<FriendshipResponse>,
}

impl UserDetailResponse {
    pub fn new(user: &User, friends: Vec<FriendshipResponse>) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            netid: user.netid.clone(),
            email: user.email.clone(),
            friends,
        }
    }
}
