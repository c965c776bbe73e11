//! Deck endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use flashcard_core::timestamp;

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// GET /api/decks
pub async fn list(State(state): State<AppState>) -> Result<Json<DeckListResponse>> {
    let engine = state.engine.lock().await;
    let decks = engine.store.deck_summaries(timestamp::now_local());
    Ok(Json(DeckListResponse { decks }))
}

/// POST /api/decks
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<DeckNameRequest>,
) -> Result<(StatusCode, Json<DeckResponse>)> {
    let mut engine = state.engine.lock().await;
    let name = engine.store.create_deck(&request.name)?;
    tracing::info!(deck = %name, "Deck created");
    Ok((StatusCode::CREATED, Json(DeckResponse { name })))
}

/// PUT /api/decks/{name}
pub async fn rename(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<DeckNameRequest>,
) -> Result<Json<DeckResponse>> {
    let mut engine = state.engine.lock().await;
    let renamed = engine.store.rename_deck(&name, &request.name)?;
    tracing::info!(from = %name, to = %renamed, "Deck renamed");
    Ok(Json(DeckResponse { name: renamed }))
}

/// DELETE /api/decks/{name}
pub async fn delete(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<DeleteDeckResponse>> {
    let mut engine = state.engine.lock().await;
    let moved_cards = engine.store.delete_deck(&name)?;
    tracing::info!(deck = %name, moved_cards, "Deck deleted");
    Ok(Json(DeleteDeckResponse {
        deleted: name,
        moved_cards,
    }))
}

/// GET /api/decks/{name}/cards
pub async fn cards(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<DeckCardsResponse>> {
    let engine = state.engine.lock().await;
    let cards = engine
        .store
        .cards_in_deck(&name)?
        .iter()
        .filter_map(|id| engine.store.card(*id).ok())
        .cloned()
        .collect();
    Ok(Json(DeckCardsResponse { deck: name, cards }))
}
