//! JSON file gateway with atomic replace.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use super::snapshot::{to_json_bytes, Snapshot};
use super::PersistenceGateway;
use crate::error::PersistenceError;

/// Stores the snapshot as a single JSON file.
///
/// Saves write a temporary file next to the target and rename it over the
/// previous snapshot, so a crash mid-write never leaves a truncated file.
#[derive(Debug, Clone)]
pub struct JsonFileGateway {
    path: PathBuf,
}

impl JsonFileGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "snapshot".to_string());
        self.dir().join(format!(".{}-{}.tmp", name, Uuid::new_v4()))
    }
}

impl PersistenceGateway for JsonFileGateway {
    fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let snapshot = serde_json::from_slice(&bytes)?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let content = to_json_bytes(snapshot)?;
        fs::create_dir_all(self.dir())?;

        let tmp_file = self.temp_path();
        if let Err(e) = fs::write(&tmp_file, &content) {
            let _ = fs::remove_file(&tmp_file);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp_file, &self.path) {
            let _ = fs::remove_file(&tmp_file);
            return Err(e.into());
        }

        debug!(path = %self.path.display(), bytes = content.len(), "snapshot saved");
        Ok(())
    }
}
