//! Statistics endpoints

use axum::{extract::State, Json};
use flashcard_core::{collection_stats, timestamp, CollectionStats};

use crate::error::Result;
use crate::AppState;

/// GET /api/stats
pub async fn collection(State(state): State<AppState>) -> Result<Json<CollectionStats>> {
    let engine = state.engine.lock().await;
    Ok(Json(collection_stats(&engine.store, timestamp::now_local())))
}
