//! Input presence checks
//!
//! Presence is the only input validation the service performs; anything
//! beyond that is the client's problem.

use crate::error::{ApiError, ApiResult};

/// Unwrap a required request field, treating blank values as absent
pub fn require(field: Option<String>, name: &'static str) -> ApiResult<String> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiError::MissingField(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_present() {
        let value = require(Some("CS 4320".to_string()), "code").expect("field rejected");
        assert_eq!(value, "CS 4320");
    }

    #[test]
    fn test_require_absent() {
        assert!(matches!(
            require(None, "days"),
            Err(ApiError::MissingField("days"))
        ));
    }

    #[test]
    fn test_require_blank_counts_as_absent() {
        assert!(matches!(
            require(Some("   ".to_string()), "name"),
            Err(ApiError::MissingField("name"))
        ));
    }
}
