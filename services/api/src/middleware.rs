//! Session authentication middleware
//!
//! Resolves the bearer session token to a user row and rejects expired or
//! unknown sessions before the request reaches a protected handler.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::{credentials, error::ApiError, state::AppState};

/// Authenticated user attached to request extensions
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: i64,
}

/// Extract the bearer token from the Authorization header
///
/// A missing header is an authentication error, as is a token that is
/// empty once the `Bearer` prefix and surrounding whitespace are stripped.
pub fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer")
        .unwrap_or(auth_header)
        .trim();

    if token.is_empty() {
        return Err(ApiError::Unauthorized);
    }

    Ok(token.to_string())
}

/// Authentication middleware for session-protected routes
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())?;

    let user = state
        .user_repository
        .find_by_session_token(&token)
        .await?
        .ok_or(ApiError::InvalidToken)?;

    if !credentials::verify_session(&user, &token) {
        return Err(ApiError::InvalidToken);
    }

    req.extensions_mut().insert(AuthUser { id: user.id });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_str(value).expect("invalid header value"),
        );
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        let headers = headers_with_auth("Bearer abc123");
        assert_eq!(bearer_token(&headers).expect("token rejected"), "abc123");
    }

    #[test]
    fn test_bearer_token_surrounding_whitespace_stripped() {
        let headers = headers_with_auth("Bearer   abc123  ");
        assert_eq!(bearer_token(&headers).expect("token rejected"), "abc123");
    }

    #[test]
    fn test_missing_header_rejected() {
        let headers = HeaderMap::new();
        assert!(matches!(
            bearer_token(&headers),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn test_empty_token_rejected() {
        for value in ["Bearer", "Bearer   ", "   "] {
            let headers = headers_with_auth(value);
            assert!(matches!(
                bearer_token(&headers),
                Err(ApiError::Unauthorized)
            ));
        }
    }
}
