//! Core flashcard engine shared by the backend service and its tests.
//!
//! Provides:
//! - Card and deck repository with write-through persistence
//! - Spaced repetition scheduling (modified SM-2)
//! - Review sessions with random, non-repeating card order
//! - Collection statistics

pub mod algorithm;
pub mod error;
pub mod persistence;
pub mod session;
pub mod stats;
pub mod store;
pub mod timestamp;
pub mod types;
pub mod validate;

pub use algorithm::{get_algorithm, SchedulingResult, SpacedRepetitionAlgorithm};
pub use error::{CoreError, PersistenceError, Result};
pub use persistence::{JsonFileGateway, MemoryGateway, PersistenceGateway, Snapshot};
pub use session::{NextCard, PresentedCard, ReviewSession, SessionState};
pub use stats::{collection_stats, CollectionStats, EaseBuckets};
pub use store::CardStore;
pub use types::{
    Card, CardId, CardListing, CardQuery, CardState, DeckSummary, Orientation, Preferences,
    Quality, DEFAULT_DECK,
};
