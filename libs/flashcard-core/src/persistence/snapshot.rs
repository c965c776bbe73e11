//! On-disk snapshot format.
//!
//! Cards are identified by their position in `flashcards`; deck membership is
//! stored as lists of positions. Positions are recomputed from id order on
//! every encode, and ids are reassigned from positions on decode.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::timestamp;
use crate::types::{
    Card, CardId, CardState, Preferences, DEFAULT_DECK, INITIAL_EASE, MINIMUM_EASE,
};

/// Whole persisted collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub flashcards: Vec<StoredCard>,
    #[serde(default)]
    pub decks: BTreeMap<String, Vec<usize>>,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            flashcards: Vec::new(),
            decks: BTreeMap::from([(DEFAULT_DECK.to_string(), Vec::new())]),
            theme: default_theme(),
            font_size: default_font_size(),
        }
    }
}

/// Card as it appears in the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCard {
    pub front: String,
    pub back: String,
    #[serde(with = "timestamp::serde_format")]
    pub created_at: NaiveDateTime,
    #[serde(default, with = "timestamp::serde_format_opt")]
    pub last_review: Option<NaiveDateTime>,
    #[serde(default, with = "timestamp::serde_format_opt")]
    pub next_review: Option<NaiveDateTime>,
    #[serde(default = "default_ease")]
    pub ease_factor: f64,
    #[serde(default)]
    pub interval: u32,
    #[serde(default)]
    pub repetitions: u32,
    #[serde(default)]
    pub correct_streak: u32,
    #[serde(default)]
    pub total_reviews: u32,
}

fn default_theme() -> String {
    Preferences::default().theme
}

fn default_font_size() -> u32 {
    Preferences::default().font_size
}

fn default_ease() -> f64 {
    INITIAL_EASE
}

/// Serialize with four-space indentation, keeping non-ASCII text as is.
pub fn to_json_bytes(snapshot: &Snapshot) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    snapshot.serialize(&mut serializer)?;
    Ok(out)
}

pub(crate) type Decks = BTreeMap<String, BTreeSet<CardId>>;

/// Rebuild cards and decks from a snapshot, repairing membership.
///
/// Every card ends up in exactly one deck: unknown positions are dropped,
/// a card listed by several decks stays in the first one by name, and cards
/// listed by none go to the default deck.
pub(crate) fn decode(snapshot: Snapshot) -> (BTreeMap<CardId, Card>, Decks, Preferences) {
    let Snapshot {
        flashcards,
        decks: stored_decks,
        theme,
        font_size,
    } = snapshot;

    let count = flashcards.len();
    let cards: BTreeMap<CardId, Card> = flashcards
        .into_iter()
        .enumerate()
        .map(|(position, stored)| {
            let id = position_to_id(position);
            (id, stored.into_card(id))
        })
        .collect();

    let mut decks = Decks::new();
    let mut placed = BTreeSet::new();
    for (name, positions) in stored_decks {
        let members = decks.entry(name.clone()).or_default();
        for position in positions {
            if position >= count {
                warn!(deck = %name, position, "dropping membership of unknown card");
                continue;
            }
            let id = position_to_id(position);
            if !placed.insert(id) {
                warn!(deck = %name, position, "dropping duplicate membership");
                continue;
            }
            members.insert(id);
        }
    }

    let default_members = decks.entry(DEFAULT_DECK.to_string()).or_default();
    for id in cards.keys() {
        if !placed.contains(id) {
            warn!(card = %id, "card without deck moved to default deck");
            default_members.insert(*id);
        }
    }

    (cards, decks, Preferences { theme, font_size })
}

/// Encode cards and decks, numbering cards by id order.
pub(crate) fn encode(
    cards: &BTreeMap<CardId, Card>,
    decks: &Decks,
    preferences: &Preferences,
) -> Snapshot {
    let positions: BTreeMap<CardId, usize> = cards
        .keys()
        .enumerate()
        .map(|(position, id)| (*id, position))
        .collect();

    let decks = decks
        .iter()
        .map(|(name, members)| {
            let mut indices: Vec<usize> = members
                .iter()
                .filter_map(|id| positions.get(id).copied())
                .collect();
            indices.sort_unstable();
            (name.clone(), indices)
        })
        .collect();

    Snapshot {
        flashcards: cards.values().map(StoredCard::from_card).collect(),
        decks,
        theme: preferences.theme.clone(),
        font_size: preferences.font_size,
    }
}

fn position_to_id(position: usize) -> CardId {
    CardId(position as u64 + 1)
}

impl StoredCard {
    fn from_card(card: &Card) -> Self {
        Self {
            front: card.front.clone(),
            back: card.back.clone(),
            created_at: card.created_at,
            last_review: card.state.last_reviewed_at,
            next_review: Some(card.state.next_due_at),
            ease_factor: card.state.ease_factor,
            interval: card.state.interval_days,
            repetitions: card.state.repetitions,
            correct_streak: card.state.correct_streak,
            total_reviews: card.state.total_reviews,
        }
    }

    fn into_card(self, id: CardId) -> Card {
        let ease_factor = if self.ease_factor < MINIMUM_EASE {
            warn!(card = %id, ease = self.ease_factor, "clamping ease factor");
            MINIMUM_EASE
        } else {
            self.ease_factor
        };
        Card {
            id,
            front: self.front,
            back: self.back,
            created_at: self.created_at,
            state: CardState {
                last_reviewed_at: self.last_review,
                next_due_at: self.next_review.unwrap_or(self.created_at),
                ease_factor,
                interval_days: self.interval,
                repetitions: self.repetitions,
                correct_streak: self.correct_streak,
                total_reviews: self.total_reviews,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn sample_json() -> Value {
        json!({
            "flashcards": [
                {
                    "front": "2+2", "back": "4",
                    "created_at": "2024-01-10 08:00:00",
                    "last_review": null,
                    "next_review": "2024-01-10 08:00:00",
                    "ease_factor": 2.5, "interval": 0,
                    "repetitions": 0, "correct_streak": 0, "total_reviews": 0
                },
                {
                    "front": "Olá", "back": "Hello",
                    "created_at": "2024-01-11 09:15:00",
                    "last_review": "2024-01-12 10:00:00",
                    "next_review": "2024-01-18 10:00:00",
                    "ease_factor": 2.36, "interval": 6,
                    "repetitions": 2, "correct_streak": 2, "total_reviews": 3
                },
                {
                    "front": "cat", "back": "gato",
                    "created_at": "2024-01-11 09:16:00",
                    "last_review": null,
                    "next_review": "2024-01-11 09:16:00",
                    "ease_factor": 2.5, "interval": 0,
                    "repetitions": 0, "correct_streak": 0, "total_reviews": 0
                }
            ],
            "decks": { "Geral": [0], "Idiomas": [1, 2] },
            "theme": "escuro",
            "font_size": 14
        })
    }

    #[test]
    fn test_round_trip_is_exact() {
        let original = sample_json();
        let snapshot: Snapshot = serde_json::from_value(original.clone()).unwrap();
        let (cards, decks, preferences) = decode(snapshot);
        let encoded = encode(&cards, &decks, &preferences);
        assert_eq!(serde_json::to_value(&encoded).unwrap(), original);
    }

    #[test]
    fn test_decode_assigns_positional_ids() {
        let snapshot: Snapshot = serde_json::from_value(sample_json()).unwrap();
        let (cards, decks, preferences) = decode(snapshot);
        assert_eq!(cards[&CardId(2)].front, "Olá");
        assert_eq!(
            decks["Idiomas"],
            BTreeSet::from([CardId(2), CardId(3)])
        );
        assert_eq!(decks["Geral"], BTreeSet::from([CardId(1)]));
        assert_eq!(preferences.theme, "escuro");
    }

    #[test]
    fn test_encode_compacts_positions_after_gaps() {
        let snapshot: Snapshot = serde_json::from_value(sample_json()).unwrap();
        let (mut cards, mut decks, preferences) = decode(snapshot);
        cards.remove(&CardId(1));
        decks.get_mut("Geral").unwrap().remove(&CardId(1));

        let encoded = encode(&cards, &decks, &preferences);
        assert_eq!(encoded.flashcards.len(), 2);
        assert_eq!(encoded.flashcards[0].front, "Olá");
        assert_eq!(encoded.decks["Idiomas"], vec![0, 1]);
        assert_eq!(encoded.decks["Geral"], Vec::<usize>::new());
    }

    #[test]
    fn test_decode_repairs_membership() {
        let mut raw = sample_json();
        raw["decks"] = json!({ "A": [1, 7], "B": [1] });
        let (cards, decks, _) = decode(serde_json::from_value(raw).unwrap());

        assert_eq!(cards.len(), 3);
        assert_eq!(decks["A"], BTreeSet::from([CardId(2)]));
        assert!(decks["B"].is_empty());
        assert_eq!(decks[DEFAULT_DECK], BTreeSet::from([CardId(1), CardId(3)]));
    }

    #[test]
    fn test_decode_fills_legacy_defaults() {
        let raw = json!({
            "flashcards": [{
                "front": "q", "back": "a",
                "created_at": "2024-02-01 12:00:00",
                "last_review": null,
                "next_review": null,
                "ease_factor": 0.9, "interval": 3, "repetitions": 1
            }]
        });
        let snapshot: Snapshot = serde_json::from_value(raw).unwrap();
        assert_eq!(snapshot.theme, "claro");
        assert_eq!(snapshot.font_size, 12);

        let (cards, decks, _) = decode(snapshot);
        let card = &cards[&CardId(1)];
        assert_eq!(card.state.next_due_at, card.created_at);
        assert_eq!(card.state.ease_factor, MINIMUM_EASE);
        assert_eq!(card.state.total_reviews, 0);
        assert_eq!(decks[DEFAULT_DECK], BTreeSet::from([CardId(1)]));
    }

    #[test]
    fn test_bad_timestamp_is_rejected() {
        let mut raw = sample_json();
        raw["flashcards"][0]["created_at"] = json!("yesterday");
        assert!(serde_json::from_value::<Snapshot>(raw).is_err());
    }

    #[test]
    fn test_json_bytes_use_four_space_indent() {
        let bytes = to_json_bytes(&Snapshot::default()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("{\n    \"flashcards\": []"), "{text}");
    }

    #[test]
    fn test_json_bytes_keep_non_ascii() {
        let snapshot: Snapshot = serde_json::from_value(sample_json()).unwrap();
        let text = String::from_utf8(to_json_bytes(&snapshot).unwrap()).unwrap();
        assert!(text.contains("\"Olá\""));
    }
}
