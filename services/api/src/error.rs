//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and its mapping
//! onto the wire: every error response is `{ "errors": [...] }` with one
//! entry per problem. Internal detail is logged here and never leaks to
//! clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::ConfigError;
use dreamlog_core::error::Error as CoreError;
use dreamlog_core::ports::StoreError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A classified failure from the core: not-found, validation, or store.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// A storage failure surfacing outside a core call.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Login failed: unknown name or wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The refresh token cookie is missing, unknown, or expired.
    #[error("Invalid refresh token")]
    InvalidToken,

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

//=========================================================================================
// Wire Shape
//=========================================================================================

/// The envelope of every error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub errors: Vec<ErrorEntry>,
}

/// One reported problem: a machine-readable code, a human-readable
/// description, and the offending field for validation failures.
#[derive(Serialize, ToSchema)]
pub struct ErrorEntry {
    pub error: String,
    pub error_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

fn single(code: &str, description: &str) -> ErrorBody {
    ErrorBody {
        errors: vec![ErrorEntry {
            error: code.to_string(),
            error_description: description.to_string(),
            field: None,
        }],
    }
}

impl ApiError {
    fn status_and_body(&self) -> (StatusCode, ErrorBody) {
        match self {
            ApiError::Core(CoreError::NotFound(entity)) => (
                StatusCode::NOT_FOUND,
                single("not_found", &format!("{} not found", entity.label())),
            ),
            ApiError::Core(CoreError::Validation(violations)) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    errors: violations
                        .iter()
                        .map(|v| ErrorEntry {
                            error: v.kind.code().to_string(),
                            error_description: v.message.clone(),
                            field: Some(v.field.to_string()),
                        })
                        .collect(),
                },
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                single("invalid_credentials", "Invalid name or password"),
            ),
            ApiError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                single("invalid_token", "Invalid or expired refresh token"),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                single("server_error", "Internal server error"),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self);
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dreamlog_core::error::{Entity, Violation, ViolationKind};

    #[test]
    fn not_found_carries_the_entity_in_the_description() {
        let err = ApiError::Core(CoreError::NotFound(Entity::ParentComment));
        let (status, body) = err.status_and_body();

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.errors.len(), 1);
        assert_eq!(body.errors[0].error, "not_found");
        assert_eq!(body.errors[0].error_description, "Parent comment not found");
    }

    #[test]
    fn validation_enumerates_every_violation() {
        let err = ApiError::Core(CoreError::Validation(vec![
            Violation::new("title", ViolationKind::Required, "Dream title is required"),
            Violation::new("topics", ViolationKind::InvalidTopic, "Topic x does not exist"),
        ]));
        let (status, body) = err.status_and_body();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.errors.len(), 2);
        assert_eq!(body.errors[0].error, "required");
        assert_eq!(body.errors[0].field.as_deref(), Some("title"));
        assert_eq!(body.errors[1].error, "invalid_topic");
    }

    #[test]
    fn backend_failures_stay_generic() {
        let err = ApiError::Store(StoreError::Backend("connection refused to 10.0.0.5".into()));
        let (status, body) = err.status_and_body();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.errors[0].error, "server_error");
        assert_eq!(body.errors[0].error_description, "Internal server error");
    }
}
