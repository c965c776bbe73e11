//! Card endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use flashcard_core::{timestamp, CardStore, PersistenceGateway};

use crate::error::Result;
use crate::models::*;
use crate::AppState;

fn card_response<G: PersistenceGateway>(store: &CardStore<G>, id: CardId) -> Result<CardResponse> {
    Ok(CardResponse {
        card: store.card(id)?.clone(),
        deck: store.deck_of(id)?.to_string(),
    })
}

/// GET /api/cards?deck=&q=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<CardSearchParams>,
) -> Result<Json<CardListResponse>> {
    let engine = state.engine.lock().await;
    let cards = engine.store.search(&params.into())?;
    Ok(Json(CardListResponse { cards }))
}

/// POST /api/cards
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateCardRequest>,
) -> Result<(StatusCode, Json<CardResponse>)> {
    let deck = request.deck.as_deref().unwrap_or(DEFAULT_DECK);
    let now = timestamp::now_local();
    let mut engine = state.engine.lock().await;
    let id = engine.store.create_card_with_state(
        &request.front,
        &request.back,
        deck,
        now,
        state.scheduler.initial_state(now),
    )?;
    tracing::debug!(card = %id, deck, "Card created");
    Ok((StatusCode::CREATED, Json(card_response(&engine.store, id)?)))
}

/// GET /api/cards/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<CardResponse>> {
    let engine = state.engine.lock().await;
    Ok(Json(card_response(&engine.store, CardId(id))?))
}

/// PUT /api/cards/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<UpdateCardRequest>,
) -> Result<Json<CardResponse>> {
    let id = CardId(id);
    let mut engine = state.engine.lock().await;
    engine
        .store
        .update_card_text(id, &request.front, &request.back)?;
    Ok(Json(card_response(&engine.store, id)?))
}

/// DELETE /api/cards/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<u64>) -> Result<StatusCode> {
    let mut engine = state.engine.lock().await;
    engine.store.delete_card(CardId(id))?;
    tracing::debug!(card = id, "Card deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/cards/{id}/move
pub async fn move_card(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<MoveCardRequest>,
) -> Result<Json<CardResponse>> {
    let id = CardId(id);
    let mut engine = state.engine.lock().await;
    engine.store.move_card(id, &request.from, &request.to)?;
    Ok(Json(card_response(&engine.store, id)?))
}
