//! File-backed snapshot persistence

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fleet_core::{CoreError, PersistedSnapshot, SnapshotStore};

/// Stores the snapshot as one JSON file, replaced wholesale on every save.
///
/// Writes go through a temp file and a rename, so a crash mid-save never
/// leaves a half-written state file behind.
#[derive(Debug)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> fleet_core::Result<Option<PersistedSnapshot>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CoreError::Persist(format!(
                    "Failed to read state file {:?}: {}",
                    self.path, e
                )))
            }
        };

        let snapshot = serde_json::from_str(&content).map_err(|e| {
            CoreError::Persist(format!("Corrupt state file {:?}: {}", self.path, e))
        })?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &PersistedSnapshot) -> fleet_core::Result<()> {
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| CoreError::Persist(format!("Failed to encode snapshot: {}", e)))?;

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json).map_err(|e| {
            CoreError::Persist(format!("Failed to write state file {:?}: {}", tmp, e))
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            CoreError::Persist(format!(
                "Failed to replace state file {:?}: {}",
                self.path, e
            ))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use fleet_core::Sensor;

    fn snapshot() -> PersistedSnapshot {
        PersistedSnapshot {
            sensors: vec![Sensor {
                serial_number: "S1".to_string(),
                name: "Boiler".to_string(),
                kind: "pressure".to_string(),
                location: "basement".to_string(),
            }],
            last_fetch: Some(Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap()),
            ..PersistedSnapshot::default()
        }
    }

    #[test]
    fn missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(&dir.path().join("state.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(&dir.path().join("state.json"));
        store.save(&snapshot()).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.sensors.len(), 1);
        assert_eq!(loaded.sensors[0].serial_number, "S1");
        assert_eq!(loaded.last_fetch, snapshot().last_fetch);
    }

    #[test]
    fn save_overwrites_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(&dir.path().join("state.json"));
        store.save(&snapshot()).unwrap();
        store.save(&PersistedSnapshot::default()).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert!(loaded.sensors.is_empty());
        assert!(loaded.last_fetch.is_none());
    }

    #[test]
    fn corrupt_file_is_a_persist_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileSnapshotStore::new(&path);
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("Corrupt state file"));
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = FileSnapshotStore::new(&path);
        store.save(&snapshot()).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }
}
