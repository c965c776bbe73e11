//! Review sessions over a single deck.
//!
//! A session fixes its working set when it begins, then hands out cards one
//! at a time in random order without replacement. Each card goes through
//! question, answer and grade before the next one can be drawn.

use chrono::NaiveDateTime;
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::algorithm::{SchedulingResult, SpacedRepetitionAlgorithm};
use crate::error::{CoreError, Result};
use crate::persistence::PersistenceGateway;
use crate::store::CardStore;
use crate::types::{CardId, Orientation, Quality};

/// Where a session is in its per-card cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the next card to be drawn.
    Ready,
    ShowingQuestion {
        card_id: CardId,
        orientation: Orientation,
    },
    ShowingAnswer {
        card_id: CardId,
        orientation: Orientation,
    },
    Complete,
}

/// A card drawn from the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresentedCard {
    pub card_id: CardId,
    pub orientation: Orientation,
    pub question: String,
}

/// Outcome of drawing from a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextCard {
    Card(PresentedCard),
    Complete,
}

/// One review pass over a deck.
pub struct ReviewSession<R> {
    deck: String,
    now: NaiveDateTime,
    bidirectional: bool,
    rng: R,
    remaining: Vec<CardId>,
    total: usize,
    reviewed: usize,
    state: SessionState,
}

impl<R: Rng> ReviewSession<R> {
    /// Start a session over the cards of `deck` that are due at `now`.
    ///
    /// A deck with nothing due gives a session that completes immediately;
    /// use [`ReviewSession::begin_forced`] to review everything anyway.
    pub fn begin<G: PersistenceGateway>(
        store: &CardStore<G>,
        deck: &str,
        now: NaiveDateTime,
        bidirectional: bool,
        rng: R,
    ) -> Result<Self> {
        Self::start(store, deck, now, bidirectional, rng, false)
    }

    /// Start a session over every card of `deck`, due or not.
    pub fn begin_forced<G: PersistenceGateway>(
        store: &CardStore<G>,
        deck: &str,
        now: NaiveDateTime,
        bidirectional: bool,
        rng: R,
    ) -> Result<Self> {
        Self::start(store, deck, now, bidirectional, rng, true)
    }

    fn start<G: PersistenceGateway>(
        store: &CardStore<G>,
        deck: &str,
        now: NaiveDateTime,
        bidirectional: bool,
        rng: R,
        forced: bool,
    ) -> Result<Self> {
        let members = store.cards_in_deck(deck)?;
        if members.is_empty() {
            return Err(CoreError::EmptyDeck(deck.to_string()));
        }

        let remaining: Vec<CardId> = members
            .iter()
            .copied()
            .filter(|id| forced || store.card(*id).is_ok_and(|card| card.is_due(now)))
            .collect();
        debug!(deck, forced, cards = remaining.len(), "review session started");

        Ok(Self {
            deck: deck.to_string(),
            now,
            bidirectional,
            rng,
            total: remaining.len(),
            remaining,
            reviewed: 0,
            state: SessionState::Ready,
        })
    }

    /// Draw the next card and show its question side.
    pub fn next_card<G: PersistenceGateway>(&mut self, store: &CardStore<G>) -> Result<NextCard> {
        match self.state {
            SessionState::ShowingQuestion { .. } | SessionState::ShowingAnswer { .. } => {
                return Err(CoreError::InvalidState(
                    "the current card has not been graded".to_string(),
                ));
            }
            SessionState::Ready | SessionState::Complete => {}
        }

        while !self.remaining.is_empty() {
            let pick = self.rng.gen_range(0..self.remaining.len());
            let card_id = self.remaining.swap_remove(pick);
            let Ok(card) = store.card(card_id) else {
                debug!(card = %card_id, "skipping card deleted during session");
                continue;
            };

            let orientation = if self.bidirectional && self.rng.gen_bool(0.5) {
                Orientation::BackFirst
            } else {
                Orientation::FrontFirst
            };
            let (question, _) = card.sides(orientation);
            self.state = SessionState::ShowingQuestion {
                card_id,
                orientation,
            };
            return Ok(NextCard::Card(PresentedCard {
                card_id,
                orientation,
                question: question.to_string(),
            }));
        }

        self.state = SessionState::Complete;
        Ok(NextCard::Complete)
    }

    /// Reveal the side that was not shown as the question.
    pub fn reveal<G: PersistenceGateway>(&mut self, store: &CardStore<G>) -> Result<String> {
        let SessionState::ShowingQuestion {
            card_id,
            orientation,
        } = self.state
        else {
            return Err(CoreError::InvalidState(
                "no question is being shown".to_string(),
            ));
        };

        let card = match store.card(card_id) {
            Ok(card) => card,
            Err(e) => {
                self.state = SessionState::Ready;
                return Err(e);
            }
        };
        let (_, answer) = card.sides(orientation);
        let answer = answer.to_string();
        self.state = SessionState::ShowingAnswer {
            card_id,
            orientation,
        };
        Ok(answer)
    }

    /// Grade the revealed card and store its new schedule.
    ///
    /// The session moves on even if saving fails; the error is still
    /// returned so the caller can retry the save.
    pub fn grade<G: PersistenceGateway>(
        &mut self,
        store: &mut CardStore<G>,
        scheduler: &dyn SpacedRepetitionAlgorithm,
        quality: Quality,
    ) -> Result<SchedulingResult> {
        let SessionState::ShowingAnswer { card_id, .. } = self.state else {
            return Err(CoreError::InvalidState(
                "the answer must be revealed before grading".to_string(),
            ));
        };
        self.state = SessionState::Ready;

        let current = store.card(card_id)?.state.clone();
        let result = scheduler.schedule(&current, quality, self.now);
        self.reviewed += 1;
        store.record_review(card_id, result.new_state.clone())?;
        Ok(result)
    }

    pub fn deck(&self) -> &str {
        &self.deck
    }

    /// Clock value used for every grade in this session.
    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn bidirectional(&self) -> bool {
        self.bidirectional
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Card currently shown, if any.
    pub fn current_card(&self) -> Option<CardId> {
        match self.state {
            SessionState::ShowingQuestion { card_id, .. }
            | SessionState::ShowingAnswer { card_id, .. } => Some(card_id),
            SessionState::Ready | SessionState::Complete => None,
        }
    }

    /// Cards not drawn yet.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Size of the working set at the start.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Cards graded so far.
    pub fn reviewed(&self) -> usize {
        self.reviewed
    }

    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }
}
