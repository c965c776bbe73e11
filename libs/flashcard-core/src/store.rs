//! Card and deck repository.
//!
//! `CardStore` is the only way to change cards and deck membership. Every
//! card belongs to exactly one deck at all times, and every successful
//! mutation is saved through the gateway before returning.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::error::{CoreError, Result};
use crate::persistence::snapshot::{self, Decks, Snapshot};
use crate::persistence::PersistenceGateway;
use crate::types::{
    Card, CardId, CardListing, CardQuery, CardState, DeckSummary, Preferences, DEFAULT_DECK,
};
use crate::validate::validate_text;

/// Repository of cards and decks backed by a snapshot gateway.
pub struct CardStore<G> {
    gateway: G,
    cards: BTreeMap<CardId, Card>,
    decks: Decks,
    preferences: Preferences,
    next_id: u64,
}

impl<G: PersistenceGateway> CardStore<G> {
    /// Empty collection holding only the default deck.
    pub fn empty(gateway: G) -> Self {
        let mut decks = Decks::new();
        decks.insert(DEFAULT_DECK.to_string(), BTreeSet::new());
        Self::from_parts(gateway, BTreeMap::new(), decks, Preferences::default())
    }

    /// Load the collection from the gateway.
    ///
    /// An unreadable snapshot is not fatal: the store starts empty and the
    /// load error is handed back as a warning.
    pub fn open(gateway: G) -> (Self, Option<CoreError>) {
        match gateway.load() {
            Ok(Some(snapshot)) => {
                let (cards, decks, preferences) = snapshot::decode(snapshot);
                debug!(cards = cards.len(), decks = decks.len(), "collection loaded");
                (Self::from_parts(gateway, cards, decks, preferences), None)
            }
            Ok(None) => (Self::empty(gateway), None),
            Err(e) => {
                warn!(error = %e, "could not load snapshot, starting with an empty collection");
                (Self::empty(gateway), Some(e.into()))
            }
        }
    }

    fn from_parts(
        gateway: G,
        cards: BTreeMap<CardId, Card>,
        decks: Decks,
        preferences: Preferences,
    ) -> Self {
        let next_id = cards.keys().next_back().map_or(1, |id| id.0 + 1);
        Self {
            gateway,
            cards,
            decks,
            preferences,
            next_id,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    // === Cards ===

    /// Create a card in `deck`, due immediately.
    pub fn create_card(
        &mut self,
        front: &str,
        back: &str,
        deck: &str,
        now: NaiveDateTime,
    ) -> Result<CardId> {
        self.create_card_with_state(front, back, deck, now, CardState::new(now))
    }

    /// Create a card in `deck` starting from a scheduler's initial state.
    pub fn create_card_with_state(
        &mut self,
        front: &str,
        back: &str,
        deck: &str,
        now: NaiveDateTime,
        state: CardState,
    ) -> Result<CardId> {
        let front = validate_text("front", front)?;
        let back = validate_text("back", back)?;
        let deck = deck.trim();
        let members = self
            .decks
            .get_mut(deck)
            .ok_or_else(|| CoreError::DeckNotFound(deck.to_string()))?;

        let id = CardId(self.next_id);
        self.next_id += 1;
        members.insert(id);
        self.cards.insert(
            id,
            Card {
                id,
                front,
                back,
                created_at: now,
                state,
            },
        );

        self.persist()?;
        Ok(id)
    }

    /// Replace the text of a card. Scheduling is left alone.
    pub fn update_card_text(&mut self, id: CardId, front: &str, back: &str) -> Result<()> {
        let front = validate_text("front", front)?;
        let back = validate_text("back", back)?;
        let card = self
            .cards
            .get_mut(&id)
            .ok_or(CoreError::CardNotFound(id))?;
        card.front = front;
        card.back = back;
        self.persist()
    }

    pub fn delete_card(&mut self, id: CardId) -> Result<()> {
        if self.cards.remove(&id).is_none() {
            return Err(CoreError::CardNotFound(id));
        }
        for members in self.decks.values_mut() {
            members.remove(&id);
        }
        self.persist()
    }

    /// Move a card between decks. The card must currently be in `from`.
    pub fn move_card(&mut self, id: CardId, from: &str, to: &str) -> Result<()> {
        if !self.cards.contains_key(&id) {
            return Err(CoreError::CardNotFound(id));
        }
        if !self.decks.contains_key(to) {
            return Err(CoreError::DeckNotFound(to.to_string()));
        }
        let source = self
            .decks
            .get_mut(from)
            .ok_or_else(|| CoreError::DeckNotFound(from.to_string()))?;
        if !source.remove(&id) {
            return Err(CoreError::InvalidState(format!(
                "card {id} is not in deck '{from}'"
            )));
        }
        if let Some(target) = self.decks.get_mut(to) {
            target.insert(id);
        }
        self.persist()
    }

    /// Store the outcome of a review.
    pub fn record_review(&mut self, id: CardId, state: CardState) -> Result<()> {
        let card = self
            .cards
            .get_mut(&id)
            .ok_or(CoreError::CardNotFound(id))?;
        card.state = state;
        self.persist()
    }

    pub fn card(&self, id: CardId) -> Result<&Card> {
        self.cards.get(&id).ok_or(CoreError::CardNotFound(id))
    }

    /// All cards in id order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    // === Decks ===

    /// Create an empty deck. Returns the stored (trimmed) name.
    pub fn create_deck(&mut self, name: &str) -> Result<String> {
        let name = validate_text("deck name", name)?;
        if self.decks.contains_key(&name) {
            return Err(CoreError::AlreadyExists(name));
        }
        self.decks.insert(name.clone(), BTreeSet::new());
        self.persist()?;
        Ok(name)
    }

    /// Rename a deck, keeping its members. Returns the stored new name.
    pub fn rename_deck(&mut self, old: &str, new: &str) -> Result<String> {
        if old == DEFAULT_DECK {
            return Err(CoreError::Forbidden(format!(
                "the '{DEFAULT_DECK}' deck cannot be renamed"
            )));
        }
        if !self.decks.contains_key(old) {
            return Err(CoreError::DeckNotFound(old.to_string()));
        }
        let new = validate_text("deck name", new)?;
        if self.decks.contains_key(&new) {
            return Err(CoreError::AlreadyExists(new));
        }
        let members = self.decks.remove(old).unwrap_or_default();
        self.decks.insert(new.clone(), members);
        self.persist()?;
        Ok(new)
    }

    /// Delete a deck, handing its cards to the default deck.
    /// Returns how many cards were transferred.
    pub fn delete_deck(&mut self, name: &str) -> Result<usize> {
        if name == DEFAULT_DECK {
            return Err(CoreError::Forbidden(format!(
                "the '{DEFAULT_DECK}' deck cannot be deleted"
            )));
        }
        let members = self
            .decks
            .remove(name)
            .ok_or_else(|| CoreError::DeckNotFound(name.to_string()))?;
        let moved = members.len();
        self.decks
            .entry(DEFAULT_DECK.to_string())
            .or_default()
            .extend(members);
        self.persist()?;
        Ok(moved)
    }

    pub fn cards_in_deck(&self, name: &str) -> Result<&BTreeSet<CardId>> {
        self.decks
            .get(name)
            .ok_or_else(|| CoreError::DeckNotFound(name.to_string()))
    }

    /// Name of the deck holding `id`.
    pub fn deck_of(&self, id: CardId) -> Result<&str> {
        if !self.cards.contains_key(&id) {
            return Err(CoreError::CardNotFound(id));
        }
        self.decks
            .iter()
            .find(|(_, members)| members.contains(&id))
            .map(|(name, _)| name.as_str())
            .ok_or_else(|| CoreError::InvalidState(format!("card {id} has no deck")))
    }

    pub fn has_deck(&self, name: &str) -> bool {
        self.decks.contains_key(name)
    }

    /// Deck names in sorted order.
    pub fn deck_names(&self) -> impl Iterator<Item = &str> {
        self.decks.keys().map(String::as_str)
    }

    /// Member and due counts for every deck.
    pub fn deck_summaries(&self, now: NaiveDateTime) -> Vec<DeckSummary> {
        self.decks
            .iter()
            .map(|(name, members)| DeckSummary {
                name: name.clone(),
                card_count: members.len(),
                due_count: members
                    .iter()
                    .filter_map(|id| self.cards.get(id))
                    .filter(|card| card.is_due(now))
                    .count(),
            })
            .collect()
    }

    /// Cards matching a deck filter and a case-insensitive text filter.
    pub fn search(&self, query: &CardQuery) -> Result<Vec<CardListing>> {
        if let Some(deck) = query.deck.as_deref() {
            if !self.decks.contains_key(deck) {
                return Err(CoreError::DeckNotFound(deck.to_string()));
            }
        }
        let needle = query
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);

        let placement: HashMap<CardId, &str> = self
            .decks
            .iter()
            .flat_map(|(name, members)| members.iter().map(move |id| (*id, name.as_str())))
            .collect();

        Ok(self
            .cards
            .values()
            .filter_map(|card| {
                let deck = placement.get(&card.id).copied()?;
                if query.deck.as_deref().is_some_and(|wanted| wanted != deck) {
                    return None;
                }
                if let Some(needle) = &needle {
                    if !card.front.to_lowercase().contains(needle)
                        && !card.back.to_lowercase().contains(needle)
                    {
                        return None;
                    }
                }
                Some(CardListing {
                    id: card.id,
                    deck: deck.to_string(),
                    front: card.front.clone(),
                    back: card.back.clone(),
                })
            })
            .collect())
    }

    // === Preferences ===

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn set_preferences(&mut self, preferences: Preferences) -> Result<()> {
        self.preferences = preferences;
        self.persist()
    }

    // === Persistence ===

    /// Encode the current collection.
    pub fn snapshot(&self) -> Snapshot {
        snapshot::encode(&self.cards, &self.decks, &self.preferences)
    }

    /// Save the current collection. Useful to retry after a failed save.
    pub fn save(&self) -> Result<()> {
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        self.gateway.save(&self.snapshot()).map_err(|e| {
            warn!(error = %e, "snapshot save failed, changes are only in memory");
            CoreError::from(e)
        })
    }
}
