//! SM-2 spaced repetition algorithm.
//!
//! Modified SuperMemo 2 driven by four review buttons. A review runs the
//! success/failure branch first, then the ease update on the 0-5 grade
//! scale, then a per-button interval adjustment. All rounding is
//! round-half-to-even.

use super::{SchedulingResult, SpacedRepetitionAlgorithm};
use crate::types::{CardState, Quality, INITIAL_EASE, MINIMUM_EASE};
use chrono::{Duration, NaiveDateTime};

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    /// Interval multiplier applied after a "hard" review.
    pub hard_multiplier: f64,
    /// Interval multiplier applied after an "easy" review.
    pub easy_bonus: f64,
    pub first_interval: u32,
    pub second_interval: u32,
    /// Lowest quality that counts as a successful recall.
    pub success_threshold: Quality,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: INITIAL_EASE,
            minimum_ease: MINIMUM_EASE,
            hard_multiplier: 1.2,
            easy_bonus: 1.3,
            first_interval: 1,
            second_interval: 6,
            success_threshold: Quality::Good,
        }
    }
}

impl Sm2 {
    /// Variant where only "easy" counts as a successful recall.
    pub fn legacy() -> Self {
        Self {
            success_threshold: Quality::Easy,
            ..Self::default()
        }
    }

    fn branch_interval(&self, state: &CardState) -> u32 {
        match state.repetitions {
            0 => self.first_interval,
            1 => self.second_interval,
            _ => round_days(f64::from(state.interval_days) * state.ease_factor),
        }
    }

    fn next_ease(&self, ease: f64, quality: Quality) -> f64 {
        let gap = f64::from(5 - quality.to_value());
        (ease + (0.1 - gap * (0.08 + gap * 0.02))).max(self.minimum_ease)
    }

    fn adjust_interval(&self, interval: u32, quality: Quality) -> u32 {
        match quality {
            Quality::Forgot => self.first_interval,
            Quality::Hard => round_days(f64::from(interval) * self.hard_multiplier).max(1),
            Quality::Good => interval,
            Quality::Easy => round_days(f64::from(interval) * self.easy_bonus),
        }
    }
}

impl SpacedRepetitionAlgorithm for Sm2 {
    fn name(&self) -> &'static str {
        if self.success_threshold == Quality::Easy {
            "sm2-legacy"
        } else {
            "sm2"
        }
    }

    fn initial_state(&self, now: NaiveDateTime) -> CardState {
        CardState {
            ease_factor: self.initial_ease,
            ..CardState::new(now)
        }
    }

    fn schedule(&self, state: &CardState, quality: Quality, now: NaiveDateTime) -> SchedulingResult {
        let mut next = state.clone();
        next.total_reviews = state.total_reviews.saturating_add(1);
        next.last_reviewed_at = Some(now);

        if quality >= self.success_threshold {
            next.interval_days = self.branch_interval(state);
            next.repetitions = state.repetitions.saturating_add(1);
            next.correct_streak = state.correct_streak.saturating_add(1);
        } else {
            next.repetitions = 0;
            next.interval_days = self.first_interval;
            next.correct_streak = 0;
        }

        next.ease_factor = self.next_ease(state.ease_factor, quality);
        next.interval_days = self.adjust_interval(next.interval_days, quality);

        let next_due = now
            .checked_add_signed(Duration::days(i64::from(next.interval_days)))
            .unwrap_or(NaiveDateTime::MAX);
        next.next_due_at = next_due;

        SchedulingResult {
            new_state: next,
            next_due,
        }
    }
}

fn round_days(value: f64) -> u32 {
    value.round_ties_even() as u32
}
