//! Error types for flashcard-core.

use thiserror::Error;

use crate::types::CardId;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while reading or writing the collection snapshot.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors returned by store, scheduler and session operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid text: {reason}")]
    Validation { reason: String },

    #[error("card not found: {0}")]
    CardNotFound(CardId),

    #[error("deck not found: {0}")]
    DeckNotFound(String),

    #[error("deck '{0}' already exists")]
    AlreadyExists(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("deck '{0}' has no cards")]
    EmptyDeck(String),

    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl CoreError {
    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Whether this is one of the not-found kinds.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CardNotFound(_) | Self::DeckNotFound(_))
    }
}
