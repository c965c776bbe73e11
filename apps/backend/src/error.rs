//! Error handling for the backend API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use flashcard_core::CoreError;
use serde::Serialize;
use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Empty deck: {0}")]
    EmptyDeck(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { reason } => ApiError::Validation(reason),
            CoreError::CardNotFound(id) => ApiError::NotFound(format!("card {id}")),
            CoreError::DeckNotFound(name) => ApiError::NotFound(format!("deck '{name}'")),
            CoreError::AlreadyExists(name) => ApiError::AlreadyExists(format!("deck '{name}'")),
            CoreError::Forbidden(reason) => ApiError::Forbidden(reason),
            CoreError::InvalidState(reason) => ApiError::InvalidState(reason),
            CoreError::EmptyDeck(name) => ApiError::EmptyDeck(format!("deck '{name}' has no cards")),
            CoreError::Persistence(e) => ApiError::Persistence(e.to_string()),
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            ApiError::AlreadyExists(_) => (StatusCode::CONFLICT, "already_exists"),
            ApiError::InvalidState(_) => (StatusCode::CONFLICT, "invalid_state"),
            ApiError::EmptyDeck(_) => (StatusCode::UNPROCESSABLE_ENTITY, "empty_deck"),
            ApiError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "persistence"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use flashcard_core::{CardId, PersistenceError};
    use std::io;

    fn status_of(err: CoreError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_validation_status() {
        let status = status_of(CoreError::Validation {
            reason: "front is empty".to_string(),
        });
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_status() {
        assert_eq!(status_of(CoreError::CardNotFound(CardId(3))), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(CoreError::DeckNotFound("Idiomas".to_string())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_forbidden_status() {
        let status = status_of(CoreError::Forbidden("default deck".to_string()));
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_conflict_statuses() {
        assert_eq!(
            status_of(CoreError::AlreadyExists("Geral".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(CoreError::InvalidState("not revealed".to_string())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_empty_deck_status() {
        let status = status_of(CoreError::EmptyDeck("Vazio".to_string()));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_persistence_status() {
        let err = PersistenceError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        let status = status_of(CoreError::Persistence(err));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_bad_request_status() {
        let error = ApiError::BadRequest("unknown session".to_string());
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_error_status() {
        let error = ApiError::Internal("unexpected error".to_string());
        assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_display_not_found() {
        let error = ApiError::from(CoreError::CardNotFound(CardId(123)));
        assert_eq!(error.to_string(), "Not found: card 123");
    }

    #[test]
    fn test_error_display_validation() {
        let error = ApiError::Validation("deck name is empty".to_string());
        assert_eq!(error.to_string(), "Validation error: deck name is empty");
    }
}
