//! In-memory gateway for tests and ephemeral stores.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::snapshot::Snapshot;
use super::PersistenceGateway;
use crate::error::PersistenceError;

#[derive(Debug, Default)]
struct MemoryState {
    snapshot: Option<Snapshot>,
    saves: usize,
    fail_loads: bool,
    fail_saves: bool,
}

/// Keeps the last saved snapshot in memory. Does NOT persist data.
///
/// Clones share the same state, so a test can keep a handle while the store
/// owns another one.
#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        let gateway = Self::default();
        gateway.state().snapshot = Some(snapshot);
        gateway
    }

    /// Last saved snapshot.
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.state().snapshot.clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.state().saves
    }

    /// Make subsequent loads fail as if the snapshot were unreadable.
    pub fn set_fail_loads(&self, fail: bool) {
        self.state().fail_loads = fail;
    }

    /// Make subsequent saves fail as if the disk were read-only.
    pub fn set_fail_saves(&self, fail: bool) {
        self.state().fail_saves = fail;
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PersistenceGateway for MemoryGateway {
    fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        let state = self.state();
        if state.fail_loads {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "snapshot unreadable").into());
        }
        Ok(state.snapshot.clone())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let mut state = self.state();
        if state.fail_saves {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "snapshot not writable").into());
        }
        state.snapshot = Some(snapshot.clone());
        state.saves += 1;
        Ok(())
    }
}
