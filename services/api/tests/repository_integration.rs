//! Integration tests for the repository layer
//!
//! These tests exercise the conditional friend-request updates and the
//! registration uniqueness backstop against a real PostgreSQL database.
//! They are skipped unless `DATABASE_URL` points at a provisioned
//! instance; each test works on rows tagged with a per-run value so runs
//! do not interfere.

use std::time::{SystemTime, UNIX_EPOCH};

use api::credentials;
use api::error::ApiError;
use api::models::User;
use api::repositories::{FriendshipRepository, UserRepository};
use common::database::{DatabaseConfig, init_pool};
use common::schema::init_schema;
use sqlx::PgPool;

async fn test_pool() -> Option<PgPool> {
    if std::env::var("DATABASE_URL").is_err() {
        return None;
    }

    let config = DatabaseConfig::from_env().expect("database config");
    let pool = init_pool(&config).await.expect("database pool");
    init_schema(&pool).await.expect("schema bootstrap");

    Some(pool)
}

fn unique_tag() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos()
}

async fn register_user(users: &UserRepository, netid: &str, email: &str) -> User {
    let session = credentials::issue_session();
    users
        .create("Test User", netid, email, "digest", &session)
        .await
        .expect("user creation failed")
}

#[tokio::test]
async fn test_declined_request_is_gone_permanently() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let users = UserRepository::new(pool.clone());
    let friendships = FriendshipRepository::new(pool);

    let tag = unique_tag();
    let sender = register_user(&users, &format!("da{tag}"), &format!("da{tag}@example.edu")).await;
    let receiver =
        register_user(&users, &format!("db{tag}"), &format!("db{tag}@example.edu")).await;

    let request = friendships
        .create(sender.id, receiver.id)
        .await
        .expect("request creation failed");
    friendships.decline(request.id).await.expect("decline failed");

    // The row is deleted outright; any further response is a miss
    assert!(matches!(
        friendships.accept(request.id).await,
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        friendships.decline(request.id).await,
        Err(ApiError::NotFound(_))
    ));
    assert!(
        friendships
            .find_by_id(request.id)
            .await
            .expect("lookup failed")
            .is_none()
    );
}

#[tokio::test]
async fn test_responding_twice_is_a_state_conflict() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let users = UserRepository::new(pool.clone());
    let friendships = FriendshipRepository::new(pool);

    let tag = unique_tag();
    let sender = register_user(&users, &format!("ra{tag}"), &format!("ra{tag}@example.edu")).await;
    let receiver =
        register_user(&users, &format!("rb{tag}"), &format!("rb{tag}@example.edu")).await;

    let request = friendships
        .create(sender.id, receiver.id)
        .await
        .expect("request creation failed");

    let accepted = friendships.accept(request.id).await.expect("accept failed");
    assert!(accepted.accepted);

    // Accepting or declining a resolved request is a conflict, not a
    // silent success
    assert!(matches!(
        friendships.accept(request.id).await,
        Err(ApiError::InvalidState(_))
    ));
    assert!(matches!(
        friendships.decline(request.id).await,
        Err(ApiError::InvalidState(_))
    ));
}

#[tokio::test]
async fn test_duplicate_registration_creates_no_second_rows() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let users = UserRepository::new(pool.clone());

    let tag = unique_tag();
    let email = format!("dup{tag}@example.edu");

    let first = register_user(&users, &format!("dup{tag}"), &email).await;

    let session = credentials::issue_session();
    let second = users
        .create("Test User", &format!("dup2{tag}"), &email, "digest", &session)
        .await;
    assert!(matches!(second, Err(ApiError::AlreadyExists(_))));

    let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&pool)
        .await
        .expect("user count failed");
    assert_eq!(user_count, 1);

    let schedule_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM schedules WHERE user_id = $1")
            .bind(first.id)
            .fetch_one(&pool)
            .await
            .expect("schedule count failed");
    assert_eq!(schedule_count, 1);
}

#[tokio::test]
async fn test_friendship_lookup_by_id() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let users = UserRepository::new(pool.clone());
    let friendships = FriendshipRepository::new(pool);

    let tag = unique_tag();
    let sender = register_user(&users, &format!("la{tag}"), &format!("la{tag}@example.edu")).await;
    let receiver =
        register_user(&users, &format!("lb{tag}"), &format!("lb{tag}@example.edu")).await;

    let request = friendships
        .create(sender.id, receiver.id)
        .await
        .expect("request creation failed");

    let found = friendships
        .find_by_id(request.id)
        .await
        .expect("lookup failed")
        .expect("friendship missing");
    assert_eq!(found.sender_id, sender.id);
    assert_eq!(found.receiver_id, receiver.id);
    assert!(!found.accepted);

    let missing = friendships
        .find_by_id(i64::MAX)
        .await
        .expect("lookup failed");
    assert!(missing.is_none());
}
