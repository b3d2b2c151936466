//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the API service
///
/// Every variant is recoverable at the request boundary and maps to a
/// conventional status class; the service itself never aborts on these.
#[derive(Error, Debug)]
pub enum ApiError {
    /// A required request field is absent or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// An entity lookup missed
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Uniqueness violation on creation
    #[error("{0} already exists")]
    AlreadyExists(&'static str),

    /// Login or password verification failure
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Session or update token mismatch or expiry
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Operation not valid for the entity's current state
    #[error("{0}")]
    InvalidState(&'static str),

    /// Missing or malformed authorization header
    #[error("Unauthorized")]
    Unauthorized,

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    /// Status class for the variant
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AlreadyExists(_) => StatusCode::CONFLICT,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::InvalidState(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InternalServerError | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_message = match &self {
            ApiError::Database(e) => {
                tracing::error!("Database error: {}", e);
                "Database error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Map a unique-constraint violation to a domain error, passing other
/// database errors through
pub fn on_unique_violation(err: sqlx::Error, conflict: ApiError) -> ApiError {
    match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => conflict,
        _ => ApiError::Database(err),
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_distinct_per_class() {
        assert_eq!(
            ApiError::MissingField("days").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("user").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::AlreadyExists("user").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::InvalidToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::InvalidState("already responded").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }
}
