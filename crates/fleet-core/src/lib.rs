//! Fleet core - sensor data model, reconciliation, and store
//!
//! Joins independently fetched sensor and reading lists into a single
//! UI-ready fleet view and owns the refresh/error lifecycle around it.

pub mod error;
pub mod model;
pub mod persist;
pub mod reconcile;
pub mod source;
pub mod store;

pub use error::{CoreError, Result};
pub use model::{PersistedSnapshot, Reading, Sensor, SensorWithReading, Snapshot};
pub use persist::{MemorySnapshotStore, SnapshotStore};
pub use reconcile::{format_time_ago, latest_reading_for, reconcile};
pub use source::SensorDataSource;
pub use store::SensorStore;
