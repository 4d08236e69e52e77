//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All JSON route handlers return
//! `Result<T, AppError>`.
//!
//! Every error body has the shape `{"error": {"<Kind>": "<message>"}}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;

/// Message returned when a random pick hits an empty store.
pub const EMPTY_STORE_MESSAGE: &str = "Sorry, there are no cafes in the database yet.";

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Wrong or missing API key.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Request parameters could not be read.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Database(err) => match err {
                RepositoryError::NotFound | RepositoryError::EmptyStore => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                RepositoryError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Key and client-facing message for the JSON body.
    fn body_parts(&self) -> (&'static str, String) {
        match self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => ("Not Found", "Not found".to_string()),
                RepositoryError::EmptyStore => ("Not Found", EMPTY_STORE_MESSAGE.to_string()),
                RepositoryError::Conflict(msg) => ("Conflict", msg.clone()),
                // Don't expose internal error details to clients
                RepositoryError::Database(_) => {
                    ("Internal Server Error", "Internal server error".to_string())
                }
            },
            Self::NotFound(msg) => ("Not Found", msg.clone()),
            Self::Forbidden(msg) => ("Forbidden", msg.clone()),
            Self::BadRequest(msg) => ("Bad Request", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let (kind, message) = self.body_parts();
        (status, Json(json!({ "error": { kind: message } }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("cafe 12".to_string());
        assert_eq!(err.to_string(), "Not found: cafe 12");

        let err = AppError::Forbidden("bad key".to_string());
        assert_eq!(err.to_string(), "Forbidden: bad key");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::NotFound("test".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Forbidden("test".to_string()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::BadRequest("test".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(RepositoryError::EmptyStore).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(RepositoryError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(RepositoryError::Conflict("dup".to_string())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(RepositoryError::Database(sqlx::Error::RowNotFound)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_not_found_body_shape() {
        let (status, body) = render(AppError::NotFound("no such cafe".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({ "error": { "Not Found": "no such cafe" } }));
    }

    #[tokio::test]
    async fn test_bad_request_body_shape() {
        let (status, body) = render(AppError::BadRequest("Invalid boundary".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": { "Bad Request": "Invalid boundary" } }));
    }

    #[tokio::test]
    async fn test_empty_store_body_shape() {
        let (status, body) = render(AppError::from(RepositoryError::EmptyStore)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["Not Found"], EMPTY_STORE_MESSAGE);
    }

    #[tokio::test]
    async fn test_database_error_hides_details() {
        let err = AppError::from(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            serde_json::json!({ "error": { "Internal Server Error": "Internal server error" } })
        );
    }
}
