//! Service configuration from environment variables

use std::path::PathBuf;

use anyhow::Context;

pub const DEFAULT_DATA_FILE: &str = "flashcards_data.json";
pub const DEFAULT_ALGORITHM: &str = "sm2";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Snapshot file read at startup and rewritten after every change.
    pub data_file: PathBuf,
    /// Scheduler name accepted by `flashcard_core::get_algorithm`.
    pub algorithm: String,
}

impl Config {
    /// Read `HOST`, `PORT`, `FLASHCARDS_DATA_FILE` and `FLASHCARDS_ALGORITHM`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a port number, got '{raw}'"))?,
            None => 3000,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            data_file: lookup("FLASHCARDS_DATA_FILE")
                .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string())
                .into(),
            algorithm: lookup("FLASHCARDS_ALGORITHM")
                .unwrap_or_else(|| DEFAULT_ALGORITHM.to_string()),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
