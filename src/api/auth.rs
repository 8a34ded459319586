//! Request identity.
//!
//! Session handling lives in front of this service; it forwards the
//! authenticated user's id in the `x-user-id` header.

use super::error::ApiError;
use axum::http::HeaderMap;

/// Header carrying the authenticated user's id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Reads the requesting user's id from the headers.
///
/// # Errors
/// Returns [`ApiError::Unauthorized`] if the header is missing or not a positive integer.
pub fn current_user(headers: &HeaderMap) -> Result<i64, ApiError> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or(ApiError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_current_user() {
        let mut headers = HeaderMap::new();
        assert!(matches!(current_user(&headers), Err(ApiError::Unauthorized)));

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("joonas"));
        assert!(matches!(current_user(&headers), Err(ApiError::Unauthorized)));

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("0"));
        assert!(matches!(current_user(&headers), Err(ApiError::Unauthorized)));

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("42"));
        assert!(matches!(current_user(&headers), Ok(42)));
    }
}
