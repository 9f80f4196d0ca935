//! Snapshot persistence abstraction

use std::sync::Mutex;

use crate::model::PersistedSnapshot;

/// Durable storage for the snapshot subset that survives restarts.
///
/// The store saves wholesale on every data change and loads once at
/// construction. Save failures are logged by the store, never surfaced as
/// store errors.
pub trait SnapshotStore: Send + Sync {
    /// Load the last saved snapshot, or `None` if nothing was saved yet.
    fn load(&self) -> crate::Result<Option<PersistedSnapshot>>;

    /// Replace the saved snapshot.
    fn save(&self, snapshot: &PersistedSnapshot) -> crate::Result<()>;
}

/// In-memory snapshot store. Used by tests and by deployments that do not
/// configure a state file.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    saved: Mutex<Option<PersistedSnapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> crate::Result<Option<PersistedSnapshot>> {
        let saved = self
            .saved
            .lock()
            .map_err(|_| crate::CoreError::Persist("snapshot lock poisoned".to_string()))?;
        Ok(saved.clone())
    }

    fn save(&self, snapshot: &PersistedSnapshot) -> crate::Result<()> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|_| crate::CoreError::Persist("snapshot lock poisoned".to_string()))?;
        *saved = Some(snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sensor;

    #[test]
    fn empty_store_loads_none() {
        let store = MemorySnapshotStore::new();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_roundtrips() {
        let store = MemorySnapshotStore::new();
        let snapshot = PersistedSnapshot {
            sensors: vec![Sensor {
                serial_number: "S1".to_string(),
                name: "Boiler".to_string(),
                kind: "pressure".to_string(),
                location: "basement".to_string(),
            }],
            ..PersistedSnapshot::default()
        };
        store.save(&snapshot).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.sensors.len(), 1);
        assert_eq!(loaded.sensors[0].serial_number, "S1");
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let store = MemorySnapshotStore::new();
        store.save(&PersistedSnapshot::default()).unwrap();

        let snapshot = PersistedSnapshot {
            sensors: vec![Sensor {
                serial_number: "S2".to_string(),
                name: "Vent".to_string(),
                kind: "airflow".to_string(),
                location: "roof".to_string(),
            }],
            ..PersistedSnapshot::default()
        };
        store.save(&snapshot).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.sensors[0].serial_number, "S2");
    }
}
