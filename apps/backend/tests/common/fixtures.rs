//! Test fixtures and factory functions for request bodies and snapshots.

use serde_json::json;

/// Create a deck create/rename request body.
pub fn deck_name_request(name: &str) -> serde_json::Value {
    json!({ "name": name })
}

/// Create a card create request body. `None` uses the default deck.
pub fn create_card_request(front: &str, back: &str, deck: Option<&str>) -> serde_json::Value {
    match deck {
        Some(d) => json!({ "front": front, "back": back, "deck": d }),
        None => json!({ "front": front, "back": back }),
    }
}

/// Create a card text update request body.
pub fn update_card_request(front: &str, back: &str) -> serde_json::Value {
    json!({ "front": front, "back": back })
}

/// Create a move request body.
pub fn move_card_request(from: &str, to: &str) -> serde_json::Value {
    json!({ "from": from, "to": to })
}

/// Create a study session request body.
pub fn start_session_request(deck: &str, force: bool, seed: Option<u64>) -> serde_json::Value {
    let mut obj = serde_json::Map::new();
    obj.insert("deck".to_string(), json!(deck));
    obj.insert("force".to_string(), json!(force));
    if let Some(s) = seed {
        obj.insert("seed".to_string(), json!(s));
    }
    serde_json::Value::Object(obj)
}

/// Create a bidirectional study session request body.
pub fn bidirectional_session_request(deck: &str, seed: u64) -> serde_json::Value {
    json!({ "deck": deck, "bidirectional": true, "seed": seed })
}

/// Create a grade request body.
pub fn grade_request(quality: &str) -> serde_json::Value {
    json!({ "quality": quality })
}

/// Create a grade request body using the numeric quality (0-3).
pub fn grade_value_request(quality: u8) -> serde_json::Value {
    json!({ "quality": quality })
}

/// Create an update settings request body.
pub fn update_settings_request(theme: Option<&str>, font_size: Option<u32>) -> serde_json::Value {
    let mut obj = serde_json::Map::new();
    if let Some(t) = theme {
        obj.insert("theme".to_string(), json!(t));
    }
    if let Some(f) = font_size {
        obj.insert("font_size".to_string(), json!(f));
    }
    serde_json::Value::Object(obj)
}

/// A stored card that has never been reviewed.
pub fn stored_card(front: &str, back: &str, created_at: &str) -> serde_json::Value {
    json!({
        "front": front,
        "back": back,
        "created_at": created_at,
        "last_review": null,
        "next_review": created_at,
        "ease_factor": 2.5,
        "interval": 0,
        "repetitions": 0,
        "correct_streak": 0,
        "total_reviews": 0
    })
}

/// Snapshot with two cards in "Geral" and one in "Idiomas"; the last one was
/// reviewed recently and is not due for a long time.
pub fn sample_snapshot() -> serde_json::Value {
    let mut reviewed = stored_card("cat", "gato", "2024-01-01 10:00:00");
    reviewed["last_review"] = json!("2024-01-02 10:00:00");
    reviewed["next_review"] = json!("2999-01-01 10:00:00");
    reviewed["ease_factor"] = json!(2.9);
    reviewed["interval"] = json!(6);
    reviewed["repetitions"] = json!(2);
    reviewed["correct_streak"] = json!(2);
    reviewed["total_reviews"] = json!(2);

    json!({
        "flashcards": [
            stored_card("2+2", "4", "2024-01-01 09:00:00"),
            stored_card("Capital da França", "Paris", "2024-01-01 09:01:00"),
            reviewed
        ],
        "decks": { "Geral": [0, 1], "Idiomas": [2] },
        "theme": "escuro",
        "font_size": 14
    })
}
