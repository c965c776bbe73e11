//! Settings endpoints
//!
//! Theme and font size are stored with the collection for the clients; the
//! service does not interpret them.

use axum::{extract::State, Json};
use flashcard_core::validate::validate_text;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// GET /api/settings
pub async fn get(State(state): State<AppState>) -> Result<Json<Preferences>> {
    let engine = state.engine.lock().await;
    Ok(Json(engine.store.preferences().clone()))
}

/// PUT /api/settings
pub async fn update(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<Preferences>> {
    let mut engine = state.engine.lock().await;
    let mut current = engine.store.preferences().clone();

    // Apply updates
    if let Some(theme) = request.theme {
        current.theme = validate_text("theme", &theme)?;
    }
    if let Some(font_size) = request.font_size {
        if font_size == 0 {
            return Err(ApiError::BadRequest("font_size must be positive".to_string()));
        }
        current.font_size = font_size;
    }

    engine.store.set_preferences(current.clone())?;
    Ok(Json(current))
}
