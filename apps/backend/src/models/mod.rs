//! API request and response types

use serde::{de, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

// Re-export shared types from flashcard-core
pub use flashcard_core::types::{
    Card, CardId, CardListing, CardQuery, DeckSummary, Preferences, Quality, DEFAULT_DECK,
};
pub use flashcard_core::PresentedCard;

use flashcard_core::ReviewSession;

// === Deck API Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct DeckListResponse {
    pub decks: Vec<DeckSummary>,
}

/// Body of deck create and rename requests
#[derive(Debug, Serialize, Deserialize)]
pub struct DeckNameRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeckResponse {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteDeckResponse {
    pub deleted: String,
    /// Cards handed over to the default deck
    pub moved_cards: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeckCardsResponse {
    pub deck: String,
    pub cards: Vec<Card>,
}

// === Card API Types ===

/// Query parameters for card search
#[derive(Debug, Default, Deserialize)]
pub struct CardSearchParams {
    pub deck: Option<String>,
    pub q: Option<String>,
}

impl From<CardSearchParams> for CardQuery {
    fn from(params: CardSearchParams) -> Self {
        CardQuery {
            deck: params.deck,
            text: params.q,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CardListResponse {
    pub cards: Vec<CardListing>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCardRequest {
    pub front: String,
    pub back: String,
    /// Defaults to the reserved default deck
    #[serde(default)]
    pub deck: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCardRequest {
    pub front: String,
    pub back: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MoveCardRequest {
    pub from: String,
    pub to: String,
}

/// Card with the deck it belongs to
#[derive(Debug, Serialize, Deserialize)]
pub struct CardResponse {
    #[serde(flatten)]
    pub card: Card,
    pub deck: String,
}

// === Study API Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct StartSessionRequest {
    pub deck: String,
    #[serde(default)]
    pub bidirectional: bool,
    /// Review every card of the deck, not only the due ones
    #[serde(default)]
    pub force: bool,
    /// Fixed seed for a reproducible card order
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SessionProgress {
    pub total: usize,
    pub remaining: usize,
    pub reviewed: usize,
    pub complete: bool,
}

impl SessionProgress {
    pub fn of<R: rand::Rng>(session: &ReviewSession<R>) -> Self {
        Self {
            total: session.total(),
            remaining: session.remaining(),
            reviewed: session.reviewed(),
            complete: session.is_complete(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub deck: String,
    pub bidirectional: bool,
    #[serde(flatten)]
    pub progress: SessionProgress,
}

#[derive(Debug, Serialize)]
pub struct NextCardResponse {
    /// `None` once the session is complete
    pub card: Option<PresentedCard>,
    #[serde(flatten)]
    pub progress: SessionProgress,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RevealResponse {
    pub card_id: CardId,
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GradeRequest {
    /// Either a label (`"good"`) or its value (0-3)
    #[serde(deserialize_with = "quality_label_or_value")]
    pub quality: Quality,
}

fn quality_label_or_value<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Quality, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Label(Quality),
        Value(u8),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Label(quality) => Ok(quality),
        Raw::Value(value) => Quality::from_value(value)
            .ok_or_else(|| de::Error::custom(format!("quality must be 0-3, got {value}"))),
    }
}

#[derive(Debug, Serialize)]
pub struct GradeResponse {
    pub card: Card,
    #[serde(flatten)]
    pub progress: SessionProgress,
}

// === Settings API Types ===

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateSettingsRequest {
    pub theme: Option<String>,
    pub font_size: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_grade_request_accepts_label_and_value() {
        let label: GradeRequest = serde_json::from_value(json!({ "quality": "hard" })).unwrap();
        assert_eq!(label.quality, Quality::Hard);

        let value: GradeRequest = serde_json::from_value(json!({ "quality": 3 })).unwrap();
        assert_eq!(value.quality, Quality::Easy);
    }

    #[test]
    fn test_grade_request_rejects_out_of_range() {
        assert!(serde_json::from_value::<GradeRequest>(json!({ "quality": 4 })).is_err());
        assert!(serde_json::from_value::<GradeRequest>(json!({ "quality": "great" })).is_err());
    }
}
