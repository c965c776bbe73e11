//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext backed by a snapshot file in a temporary directory
//! - Helpers for reading back what the service saved

#![allow(dead_code)]

pub mod fixtures;

use std::fs;
use std::path::PathBuf;

use axum::Router;
use tempfile::TempDir;

use flashcards_backend::config::Config;
use flashcards_backend::{router, AppState};

/// Test context owning the data directory and the router.
///
/// The directory is removed when the context is dropped.
pub struct TestContext {
    pub dir: TempDir,
    pub state: AppState,
    app: Router,
}

impl TestContext {
    /// Create a context with an empty collection and the default scheduler.
    pub fn new() -> Self {
        Self::build(None, "sm2")
    }

    /// Create a context whose snapshot file already holds `snapshot`.
    pub fn with_snapshot(snapshot: &serde_json::Value) -> Self {
        Self::build(Some(snapshot), "sm2")
    }

    /// Create a context using the named scheduler.
    pub fn with_algorithm(algorithm: &str) -> Self {
        Self::build(None, algorithm)
    }

    fn build(snapshot: Option<&serde_json::Value>, algorithm: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let data_file = dir.path().join("flashcards_data.json");
        if let Some(snapshot) = snapshot {
            fs::write(&data_file, serde_json::to_vec_pretty(snapshot).unwrap())
                .expect("Failed to write snapshot");
        }

        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            data_file,
            algorithm: algorithm.to_string(),
        };
        let state = AppState::from_config(&config).expect("Failed to open collection");
        let app = router(state.clone());

        Self { dir, state, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn data_file(&self) -> PathBuf {
        self.dir.path().join("flashcards_data.json")
    }

    /// Snapshot currently on disk.
    pub fn saved_snapshot(&self) -> serde_json::Value {
        let bytes = fs::read(self.data_file()).expect("Snapshot was never saved");
        serde_json::from_slice(&bytes).expect("Snapshot is not valid JSON")
    }
}
