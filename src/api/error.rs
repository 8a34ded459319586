//! Mapping from core outcomes to HTTP responses.
//!
//! Not-found responses never say whether the row exists for someone else.
//! Unexpected failures are logged here and reach the client only as a generic 500.

use crate::errors::Error;
use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Error returned by handlers.
#[derive(Debug)]
pub enum ApiError {
    /// No usable user identity on the request
    Unauthorized,
    /// Missing, deleted, or someone else's row
    NotFound(&'static str),
    /// Rejected input
    Validation {
        /// Offending field
        field: &'static str,
        /// What was wrong with it
        message: String,
    },
    /// The multipart body could not be read
    Form(MultipartError),
    /// Anything else
    Internal(Error),
}

impl ApiError {
    /// Shorthand for a validation failure.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        match error {
            Error::Validation { field, message } => Self::Validation { field, message },
            other => Self::Internal(other),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(error: MultipartError) -> Self {
        Self::Form(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Authentication required" })),
            )
                .into_response(),
            Self::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            Self::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message, "field": field })),
            )
                .into_response(),
            Self::Form(error) => {
                tracing::debug!("Rejected multipart body: {}", error);
                let status = error.status();
                (status, Json(json!({ "error": error.body_text() }))).into_response()
            }
            Self::Internal(error) => {
                tracing::error!("Request failed: {:?}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::NotFound("Plant not found").into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(Error::validation("remarks", "remarks cannot be empty"))
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(Error::Config {
                message: "boom".to_string()
            })
            .into_response()
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
