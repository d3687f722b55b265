//! Shared HTTP plumbing: error responses and the validated JSON extractor

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Message returned for every rejected authentication, whatever the cause.
pub const AUTHENTICATION_REQUIRED: &str = "Authentication required";

/// Error body: `{"error": "..."}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// A failed request, rendered as a status code plus [`ErrorBody`].
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(err: impl std::fmt::Display) -> Self {
        Self::new(StatusCode::BAD_REQUEST, err.to_string())
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, AUTHENTICATION_REQUIRED)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidToken(_) => Self::unauthorized(),
            DomainError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            other => Self::bad_request(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::DuplicateUsername("a".into()), StatusCode::BAD_REQUEST),
            (DomainError::InvalidPassword, StatusCode::BAD_REQUEST),
            (DomainError::Storage("db down".into()), StatusCode::BAD_REQUEST),
            (DomainError::Signing("no ttl".into()), StatusCode::BAD_REQUEST),
            (DomainError::Internal("join".into()), StatusCode::BAD_REQUEST),
            (DomainError::not_found("entry", "id", 1), StatusCode::NOT_FOUND),
            (DomainError::InvalidToken("expired".into()), StatusCode::UNAUTHORIZED),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn token_failures_do_not_leak_the_reason() {
        let err = ApiError::from(DomainError::InvalidToken("token has expired".into()));
        assert_eq!(err.message, AUTHENTICATION_REQUIRED);
    }
}
