//! Persistence for per-component statuses.
//!
//! A [`StatusGroup`](crate::StatusGroup) loads the saved mapping once at
//! construction and saves the full mapping after every status change, so
//! the aggregate survives a process restart.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::error::StatusResult;
use crate::status::Status;

/// Saved statuses keyed by component name.
pub type StatusMap = BTreeMap<String, Status>;

/// Storage backend for component statuses.
pub trait StatusStore: Send {
    /// Load the previously saved mapping; empty if nothing was saved.
    fn load(&self) -> StatusResult<StatusMap>;

    /// Replace the saved mapping.
    fn save(&self, statuses: &StatusMap) -> StatusResult<()>;
}

impl<S: StatusStore + ?Sized> StatusStore for Box<S> {
    fn load(&self) -> StatusResult<StatusMap> {
        (**self).load()
    }

    fn save(&self, statuses: &StatusMap) -> StatusResult<()> {
        (**self).save(statuses)
    }
}

/// Store that never persists anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStatusStore;

impl StatusStore for NoopStatusStore {
    fn load(&self) -> StatusResult<StatusMap> {
        Ok(StatusMap::new())
    }

    fn save(&self, _statuses: &StatusMap) -> StatusResult<()> {
        Ok(())
    }
}

/// In-memory store for development and testing.
///
/// Clones share storage: a group built from one clone sees what a group
/// built from another clone saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStatusStore {
    saved: Arc<Mutex<StatusMap>>,
}

impl MemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the currently saved mapping.
    pub fn snapshot(&self) -> StatusMap {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StatusStore for MemoryStatusStore {
    fn load(&self) -> StatusResult<StatusMap> {
        Ok(self.snapshot())
    }

    fn save(&self, statuses: &StatusMap) -> StatusResult<()> {
        *self.saved.lock().unwrap_or_else(PoisonError::into_inner) = statuses.clone();
        Ok(())
    }
}

/// Store backed by a JSON file.
///
/// The file holds `{"<component>": {"status": "<severity>", "message": "..."}}`.
#[derive(Debug, Clone)]
pub struct JsonFileStatusStore {
    path: PathBuf,
}

impl JsonFileStatusStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatusStore for JsonFileStatusStore {
    fn load(&self) -> StatusResult<StatusMap> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No saved statuses");
                return Ok(StatusMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        let statuses: StatusMap = serde_json::from_str(&contents)?;
        debug!(path = %self.path.display(), count = statuses.len(), "Loaded saved statuses");
        Ok(statuses)
    }

    fn save(&self, statuses: &StatusMap) -> StatusResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Readers never observe a partially written file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(statuses)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StatusMap {
        StatusMap::from([
            ("database".to_string(), Status::blocked("m")),
            ("webapp".to_string(), Status::active("")),
        ])
    }

    #[test]
    fn test_noop_store() {
        let store = NoopStatusStore;
        store.save(&sample()).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_memory_store_clones_share() {
        let store = MemoryStatusStore::new();
        let other = store.clone();

        store.save(&sample()).unwrap();
        assert_eq!(other.load().unwrap(), sample());
    }

    #[test]
    fn test_json_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStatusStore::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStatusStore::new(dir.path().join("state").join("statuses.json"));

        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), sample());

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["database"]["status"], "blocked");
        assert_eq!(raw["database"]["message"], "m");
    }

    #[test]
    fn test_json_store_rejects_bad_severity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statuses.json");
        fs::write(&path, r#"{"db": {"status": "degraded"}}"#).unwrap();

        let store = JsonFileStatusStore::new(path);
        assert!(store.load().is_err());
    }
}
