//! Snapshot persistence.
//!
//! The store hands the whole collection to a gateway after every mutation;
//! the gateway only decides where the bytes go.

pub mod json_file;
pub mod memory;
pub mod snapshot;

pub use json_file::JsonFileGateway;
pub use memory::MemoryGateway;
pub use snapshot::{Snapshot, StoredCard};

use crate::error::PersistenceError;

/// Storage for full collection snapshots.
pub trait PersistenceGateway {
    /// Load the last saved snapshot. Returns Ok(None) if nothing was saved yet.
    fn load(&self) -> Result<Option<Snapshot>, PersistenceError>;

    /// Replace the stored snapshot.
    /// MUST be atomic: a failed save leaves the previous snapshot intact.
    fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError>;
}
