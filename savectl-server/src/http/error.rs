//! API error types with IntoResponse
//!
//! Every error is a JSON body `{ "error": code, "message": text }`.
//! Store failures are logged with their cause; clients only see a summary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use savectl_core::models::ValidationError;
use savectl_core::{SaveError, SelectionError};

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Board choice rejected by the membership sheet (404 unknown, 409 already member)
    Selection(SelectionError),

    /// Confirmed sheet with nothing selected (422)
    NoSelection,

    /// Normalized save error (503 read, 502 write)
    Save(SaveError),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            Self::Validation(e) => (StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
            Self::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("{} '{}' not found", resource, id),
            ),
            Self::Selection(e @ SelectionError::UnknownBoard(_)) => {
                (StatusCode::NOT_FOUND, "unknown_board", e.to_string())
            }
            Self::Selection(e @ SelectionError::AlreadyMember(_)) => {
                (StatusCode::CONFLICT, "already_member", e.to_string())
            }
            Self::NoSelection => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "no_selection",
                "select at least one board".to_owned(),
            ),
            Self::Save(e) => match e {
                SaveError::FetchFailed { reason } => {
                    tracing::error!("Store read failed: {}", reason);
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "fetch_failed",
                        "could not load save state".to_owned(),
                    )
                }
                SaveError::Failed { reason } => {
                    tracing::error!("Store write failed: {}", reason);
                    (
                        StatusCode::BAD_GATEWAY,
                        "save_failed",
                        "the change was not saved".to_owned(),
                    )
                }
                SaveError::AlreadyExists { .. } => {
                    (StatusCode::CONFLICT, "already_exists", e.to_string())
                }
                SaveError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found", e.to_string()),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let body = json!({
            "error": code,
            "message": message
        });
        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<SelectionError> for ApiError {
    fn from(e: SelectionError) -> Self {
        Self::Selection(e)
    }
}

impl From<SaveError> for ApiError {
    fn from(e: SaveError) -> Self {
        Self::Save(e)
    }
}
