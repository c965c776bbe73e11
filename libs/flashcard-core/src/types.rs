//! Core types for the flashcard collection.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::timestamp;

/// Name of the reserved deck that can be neither renamed nor deleted.
pub const DEFAULT_DECK: &str = "Geral";

/// Initial ease factor of a fresh card.
pub const INITIAL_EASE: f64 = 2.5;

/// Lower bound of the ease factor.
pub const MINIMUM_EASE: f64 = 1.3;

/// Stable card identifier. Never reused within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u64);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Quality of a recall, as picked from the four review buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Forgot,
    Hard,
    Good,
    Easy,
}

impl Quality {
    /// Numeric value (0-3).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Forgot => 0,
            Self::Hard => 1,
            Self::Good => 2,
            Self::Easy => 3,
        }
    }

    /// Create from numeric value (0-3).
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Forgot),
            1 => Some(Self::Hard),
            2 => Some(Self::Good),
            3 => Some(Self::Easy),
            _ => None,
        }
    }
}

/// Which side of a card is shown as the question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    FrontFirst,
    BackFirst,
}

impl Default for Orientation {
    fn default() -> Self {
        Self::FrontFirst
    }
}

/// Scheduling state of a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardState {
    #[serde(with = "timestamp::serde_format_opt")]
    pub last_reviewed_at: Option<NaiveDateTime>,
    #[serde(with = "timestamp::serde_format")]
    pub next_due_at: NaiveDateTime,
    pub ease_factor: f64,
    pub interval_days: u32,
    pub repetitions: u32,
    pub correct_streak: u32,
    pub total_reviews: u32,
}

impl CardState {
    /// State of a card created at `now`: never reviewed and immediately due.
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            last_reviewed_at: None,
            next_due_at: now,
            ease_factor: INITIAL_EASE,
            interval_days: 0,
            repetitions: 0,
            correct_streak: 0,
            total_reviews: 0,
        }
    }
}

/// A single study item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub front: String,
    pub back: String,
    #[serde(with = "timestamp::serde_format")]
    pub created_at: NaiveDateTime,
    #[serde(flatten)]
    pub state: CardState,
}

impl Card {
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        self.state.next_due_at <= now
    }

    /// Question and answer text for the given orientation.
    pub fn sides(&self, orientation: Orientation) -> (&str, &str) {
        match orientation {
            Orientation::FrontFirst => (&self.front, &self.back),
            Orientation::BackFirst => (&self.back, &self.front),
        }
    }
}

/// Presentation preferences carried by the snapshot but not interpreted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: String,
    pub font_size: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: "claro".to_string(),
            font_size: 12,
        }
    }
}

/// Deck with card counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSummary {
    pub name: String,
    pub card_count: usize,
    pub due_count: usize,
}

/// One row of a card search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardListing {
    pub id: CardId,
    pub deck: String,
    pub front: String,
    pub back: String,
}

/// Filter for card searches. Empty filters match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardQuery {
    #[serde(default)]
    pub deck: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}
