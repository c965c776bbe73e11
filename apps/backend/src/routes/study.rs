//! Study endpoints
//!
//! A review session lives in memory from `POST /api/study/sessions` until
//! `next` reports it complete or it is abandoned. Graded cards are saved
//! immediately.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use flashcard_core::{timestamp, NextCard, ReviewSession};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::{AppState, Engine};

fn session_mut(
    sessions: &mut HashMap<Uuid, ReviewSession<StdRng>>,
    id: Uuid,
) -> Result<&mut ReviewSession<StdRng>> {
    sessions
        .get_mut(&id)
        .ok_or_else(|| ApiError::NotFound(format!("session {id}")))
}

/// POST /api/study/sessions
pub async fn start(
    State(state): State<AppState>,
    Json(request): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let rng = match request.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let now = timestamp::now_local();

    let mut engine = state.engine.lock().await;
    let session = if request.force {
        ReviewSession::begin_forced(&engine.store, &request.deck, now, request.bidirectional, rng)?
    } else {
        ReviewSession::begin(&engine.store, &request.deck, now, request.bidirectional, rng)?
    };

    let session_id = Uuid::new_v4();
    let response = SessionResponse {
        session_id,
        deck: session.deck().to_string(),
        bidirectional: session.bidirectional(),
        progress: SessionProgress::of(&session),
    };
    engine.sessions.insert(session_id, session);

    tracing::info!(
        %session_id,
        deck = %request.deck,
        cards = response.progress.total,
        forced = request.force,
        "Review session started"
    );
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/study/sessions/{id}/next
pub async fn next(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NextCardResponse>> {
    let mut engine = state.engine.lock().await;
    let Engine { store, sessions } = &mut *engine;
    let session = session_mut(sessions, id)?;

    let card = match session.next_card(store)? {
        NextCard::Card(card) => Some(card),
        NextCard::Complete => None,
    };
    let progress = SessionProgress::of(session);

    if card.is_none() {
        sessions.remove(&id);
        tracing::info!(session_id = %id, reviewed = progress.reviewed, "Review session complete");
    }
    Ok(Json(NextCardResponse { card, progress }))
}

/// POST /api/study/sessions/{id}/reveal
pub async fn reveal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RevealResponse>> {
    let mut engine = state.engine.lock().await;
    let Engine { store, sessions } = &mut *engine;
    let session = session_mut(sessions, id)?;

    let answer = session.reveal(store)?;
    let card_id = session
        .current_card()
        .ok_or_else(|| ApiError::Internal("revealed card is no longer current".to_string()))?;
    Ok(Json(RevealResponse { card_id, answer }))
}

/// POST /api/study/sessions/{id}/grade
pub async fn grade(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<GradeRequest>,
) -> Result<Json<GradeResponse>> {
    let mut engine = state.engine.lock().await;
    let Engine { store, sessions } = &mut *engine;
    let session = session_mut(sessions, id)?;

    let card_id = session
        .current_card()
        .ok_or_else(|| ApiError::InvalidState("no card is being reviewed".to_string()))?;
    let result = session.grade(store, state.scheduler.as_ref(), request.quality)?;
    tracing::debug!(
        card = %card_id,
        quality = ?request.quality,
        interval_days = result.new_state.interval_days,
        "Card graded"
    );

    Ok(Json(GradeResponse {
        card: store.card(card_id)?.clone(),
        progress: SessionProgress::of(session),
    }))
}

/// DELETE /api/study/sessions/{id}
pub async fn abandon(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    let mut engine = state.engine.lock().await;
    engine
        .sessions
        .remove(&id)
        .ok_or_else(|| ApiError::NotFound(format!("session {id}")))?;
    Ok(StatusCode::NO_CONTENT)
}
