//! Password hashing and session token management
//!
//! Sessions are opaque random tokens stored on the user row: a short-lived
//! session token paired with a longer-lived update token that only exists
//! to mint the next pair. These are pure functions over model values;
//! persistence stays in the repositories.

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tracing::error;

use crate::error::{ApiError, ApiResult};
use crate::models::User;

/// Session lifetime from issuance
pub const SESSION_TTL_HOURS: i64 = 24;

// Argon2id cost parameters, the tunable work factor for password hashing
const HASH_MEMORY_KIB: u32 = 19 * 1024;
const HASH_ITERATIONS: u32 = 2;
const HASH_PARALLELISM: u32 = 1;

/// Token length in random bytes before hex encoding
const TOKEN_BYTES: usize = 32;

/// A freshly issued session/update token pair with its expiration
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub session_token: String,
    pub session_expiration: DateTime<Utc>,
    pub update_token: String,
}

fn hasher() -> ApiResult<Argon2<'static>> {
    let params = Params::new(HASH_MEMORY_KIB, HASH_ITERATIONS, HASH_PARALLELISM, None)
        .map_err(|e| {
            error!("Invalid password hashing parameters: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a plaintext password with a per-call random salt
pub fn hash_password(plaintext: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());

    let digest = hasher()?
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {}", e);
            ApiError::InternalServerError
        })?
        .to_string();

    Ok(digest)
}

/// Verify a plaintext password against a stored digest
///
/// An absent or unparseable digest verifies nothing; this never errors.
pub fn verify_password(plaintext: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };

    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

/// Generate an opaque, URL-safe session or update token
///
/// 32 random bytes, hex encoded; the token's strength is the entropy of
/// its random input.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill(&mut bytes);
    hex::encode(bytes)
}

/// Issue a fresh session: both tokens are regenerated together,
/// unconditionally, and the expiration is set a day out
pub fn issue_session() -> IssuedSession {
    IssuedSession {
        session_token: generate_token(),
        session_expiration: Utc::now() + Duration::hours(SESSION_TTL_HOURS),
        update_token: generate_token(),
    }
}

/// True iff the presented token matches the stored session token and the
/// session has not yet expired (strictly before the expiration instant)
pub fn verify_session(user: &User, presented: &str) -> bool {
    presented == user.session_token && Utc::now() < user.session_expiration
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_session(session: &IssuedSession) -> User {
        User {
            id: 1,
            name: "Ada".to_string(),
            netid: "al123".to_string(),
            email: "al123@example.edu".to_string(),
            password_hash: String::new(),
            session_token: session.session_token.clone(),
            session_expiration: session.session_expiration,
            update_token: session.update_token.clone(),
        }
    }

    #[test]
    fn test_hash_and_verify_password() {
        let digest = hash_password("hunter2!").expect("hashing failed");
        assert!(verify_password("hunter2!", &digest));
        assert!(!verify_password("hunter3!", &digest));
    }

    #[test]
    fn test_verify_password_garbage_digest_is_false() {
        assert!(!verify_password("hunter2!", "not-a-digest"));
        assert!(!verify_password("hunter2!", ""));
    }

    #[test]
    fn test_generate_token_entropy_and_shape() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_issue_session_expiration_and_distinct_tokens() {
        let before = Utc::now();
        let session = issue_session();
        let after = Utc::now();

        assert_ne!(session.session_token, session.update_token);
        assert!(session.session_expiration >= before + Duration::hours(SESSION_TTL_HOURS));
        assert!(session.session_expiration <= after + Duration::hours(SESSION_TTL_HOURS));
    }

    #[test]
    fn test_issue_session_never_repeats_a_pair() {
        let first = issue_session();
        let second = issue_session();
        assert_ne!(first.session_token, second.session_token);
        assert_ne!(first.update_token, second.update_token);
    }

    #[test]
    fn test_verify_session_token_match() {
        let session = issue_session();
        let user = user_with_session(&session);

        assert!(verify_session(&user, &session.session_token));
        assert!(!verify_session(&user, &session.update_token));
        assert!(!verify_session(&user, "some-other-token"));
    }

    #[test]
    fn test_verify_session_expired_is_false() {
        let session = issue_session();
        let mut user = user_with_session(&session);

        // At or past the expiration instant the token is invalid
        user.session_expiration = Utc::now() - Duration::seconds(1);
        assert!(!verify_session(&user, &session.session_token));
    }

    #[test]
    fn test_expiring_now_invalidates_without_clearing_token() {
        let session = issue_session();
        let mut user = user_with_session(&session);

        user.session_expiration = Utc::now();
        assert!(!verify_session(&user, &session.session_token));
        assert_eq!(user.session_token, session.session_token);
    }
}
