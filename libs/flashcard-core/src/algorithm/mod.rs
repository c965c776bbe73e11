//! Spaced repetition algorithm implementations.

pub mod sm2;

use crate::types::{CardState, Quality};
use chrono::NaiveDateTime;

/// Result of scheduling a card after review.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingResult {
    pub new_state: CardState,
    /// Same value as `new_state.next_due_at`.
    pub next_due: NaiveDateTime,
}

/// Trait for spaced repetition algorithms.
///
/// Implementations are pure: the same state, quality and `now` always give
/// the same result.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Calculate next review state after a review.
    fn schedule(&self, state: &CardState, quality: Quality, now: NaiveDateTime) -> SchedulingResult;

    /// Initial state for a card created at `now`.
    fn initial_state(&self, now: NaiveDateTime) -> CardState;
}

/// Get algorithm by name.
pub fn get_algorithm(name: &str) -> Option<Box<dyn SpacedRepetitionAlgorithm>> {
    match name {
        "sm2" => Some(Box::new(sm2::Sm2::default())),
        "sm2-legacy" => Some(Box::new(sm2::Sm2::legacy())),
        _ => None,
    }
}
