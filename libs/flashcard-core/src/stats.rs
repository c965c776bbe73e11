//! Read-only collection statistics.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::persistence::PersistenceGateway;
use crate::store::CardStore;
use crate::types::DeckSummary;

/// Cards at or above this ease count as easy.
pub const EASY_EASE: f64 = 2.8;

/// Cards below this ease count as hard.
pub const HARD_EASE: f64 = 2.2;

/// Reviews at most this many whole days old count as recent.
pub const RECENT_DAYS: i64 = 7;

/// Cards per ease bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EaseBuckets {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStats {
    pub total_cards: usize,
    pub due_now: usize,
    pub reviewed: usize,
    pub never_reviewed: usize,
    pub ease: EaseBuckets,
    pub reviewed_last_week: usize,
    pub decks: Vec<DeckSummary>,
}

/// Summarize the whole collection as of `now`.
pub fn collection_stats<G: PersistenceGateway>(
    store: &CardStore<G>,
    now: NaiveDateTime,
) -> CollectionStats {
    let mut ease = EaseBuckets::default();
    let mut due_now = 0;
    let mut reviewed = 0;
    let mut reviewed_last_week = 0;

    for card in store.cards() {
        if card.is_due(now) {
            due_now += 1;
        }
        if let Some(last) = card.state.last_reviewed_at {
            reviewed += 1;
            if (now - last).num_days() <= RECENT_DAYS {
                reviewed_last_week += 1;
            }
        }
        match card.state.ease_factor {
            e if e >= EASY_EASE => ease.easy += 1,
            e if e >= HARD_EASE => ease.medium += 1,
            _ => ease.hard += 1,
        }
    }

    CollectionStats {
        total_cards: store.len(),
        due_now,
        reviewed,
        never_reviewed: store.len() - reviewed,
        ease,
        reviewed_last_week,
        decks: store.deck_summaries(now),
    }
}
