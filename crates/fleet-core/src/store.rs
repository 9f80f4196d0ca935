//! Sensor store: owns the cached snapshot and orchestrates fetches

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::model::Snapshot;
use crate::persist::SnapshotStore;
use crate::reconcile::reconcile;
use crate::source::SensorDataSource;

/// Which snapshot fields a fetch is going to replace.
#[derive(Debug, Clone, Copy)]
enum Target {
    Sensors,
    Readings,
    Both,
}

#[derive(Debug)]
struct Inner {
    snapshot: Snapshot,
    /// Number of fetches currently in flight. `snapshot.loading` is true
    /// iff this is non-zero.
    inflight: u32,
    /// Monotone counter for request fencing.
    next_seq: u64,
    /// Sequence number of the latest issued request writing `sensors`.
    sensors_seq: u64,
    /// Sequence number of the latest issued request writing `readings`.
    readings_seq: u64,
}

impl Inner {
    fn finish(&mut self) {
        self.inflight -= 1;
        self.snapshot.loading = self.inflight > 0;
    }
}

/// Single owner of the cached sensor and reading state.
///
/// Every action reads the current snapshot, computes the next one, and
/// publishes it atomically; observers never see a half-updated snapshot.
/// Overlapping fetches are serialized by request fencing: each fetch takes
/// a sequence number per field it will write, and a completion publishes
/// only if it is still the latest issued request for all of its fields.
/// Stale completions are discarded, so latest-issued wins regardless of
/// completion order.
pub struct SensorStore {
    source: Arc<dyn SensorDataSource>,
    persist: Option<Arc<dyn SnapshotStore>>,
    inner: RwLock<Inner>,
}

impl std::fmt::Debug for SensorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorStore").finish_non_exhaustive()
    }
}

impl SensorStore {
    /// Create a store with no persistence.
    pub fn new(source: Arc<dyn SensorDataSource>) -> Self {
        Self::with_persistence(source, None)
    }

    /// Create a store, restoring the last persisted snapshot if one exists.
    ///
    /// A restore failure is logged and the store starts empty; `loading`
    /// and `error` always start false/absent regardless of what was saved.
    pub fn with_persistence(
        source: Arc<dyn SensorDataSource>,
        persist: Option<Arc<dyn SnapshotStore>>,
    ) -> Self {
        let mut snapshot = Snapshot::default();
        if let Some(store) = &persist {
            match store.load() {
                Ok(Some(saved)) => {
                    tracing::info!(
                        "Restored snapshot: {} sensors, {} readings",
                        saved.sensors.len(),
                        saved.readings.len()
                    );
                    snapshot.sensors = saved.sensors;
                    snapshot.readings = saved.readings;
                    snapshot.sensors_with_readings = saved.sensors_with_readings;
                    snapshot.last_fetch = saved.last_fetch;
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("Failed to restore snapshot: {}", e),
            }
        }

        Self {
            source,
            persist,
            inner: RwLock::new(Inner {
                snapshot,
                inflight: 0,
                next_seq: 0,
                sensors_seq: 0,
                readings_seq: 0,
            }),
        }
    }

    /// Read the current snapshot.
    pub async fn snapshot(&self) -> Snapshot {
        self.inner.read().await.snapshot.clone()
    }

    /// Fetch the sensor list and recompute the fleet view against the
    /// existing readings. On failure the prior data stays published and
    /// only `error` changes. Cancellation discards the result entirely.
    pub async fn fetch_sensors(&self, cancel: &CancellationToken) {
        let seq = self.begin(Target::Sensors).await;

        let result = tokio::select! {
            r = self.source.sensors() => Some(r),
            _ = cancel.cancelled() => None,
        };

        let mut inner = self.inner.write().await;
        inner.finish();

        let Some(result) = result else {
            tracing::debug!("Sensor fetch cancelled, discarding result");
            return;
        };
        if inner.sensors_seq != seq {
            tracing::debug!("Discarding stale sensor fetch (seq {} superseded)", seq);
            return;
        }

        match result {
            Ok(sensors) => {
                let now = Utc::now();
                tracing::debug!("Fetched {} sensors", sensors.len());
                inner.snapshot.sensors = sensors;
                inner.snapshot.sensors_with_readings =
                    reconcile(&inner.snapshot.sensors, &inner.snapshot.readings, now);
                inner.snapshot.last_fetch = Some(now);
                self.save(&inner.snapshot);
            }
            Err(e) => {
                tracing::warn!("Sensor fetch failed: {}", e);
                inner.snapshot.error = Some(e.to_string());
            }
        }
    }

    /// Fetch the reading list and recompute the fleet view against the
    /// existing sensors. Symmetric to [`Self::fetch_sensors`].
    pub async fn fetch_readings(&self, cancel: &CancellationToken) {
        let seq = self.begin(Target::Readings).await;

        let result = tokio::select! {
            r = self.source.readings() => Some(r),
            _ = cancel.cancelled() => None,
        };

        let mut inner = self.inner.write().await;
        inner.finish();

        let Some(result) = result else {
            tracing::debug!("Reading fetch cancelled, discarding result");
            return;
        };
        if inner.readings_seq != seq {
            tracing::debug!("Discarding stale reading fetch (seq {} superseded)", seq);
            return;
        }

        match result {
            Ok(readings) => {
                let now = Utc::now();
                tracing::debug!("Fetched {} readings", readings.len());
                inner.snapshot.readings = readings;
                inner.snapshot.sensors_with_readings =
                    reconcile(&inner.snapshot.sensors, &inner.snapshot.readings, now);
                inner.snapshot.last_fetch = Some(now);
                self.save(&inner.snapshot);
            }
            Err(e) => {
                tracing::warn!("Reading fetch failed: {}", e);
                inner.snapshot.error = Some(e.to_string());
            }
        }
    }

    /// Refresh sensors and readings together.
    ///
    /// Clears the data source's cached backend-availability verdict, issues
    /// both requests concurrently, and publishes both results as a single
    /// atomic update. If either request fails nothing is published; partial
    /// updates never leave this method.
    pub async fn fetch_all(&self, cancel: &CancellationToken) {
        self.source.reset_backend_check();
        let seq = self.begin(Target::Both).await;

        let results = tokio::select! {
            r = async { tokio::join!(self.source.sensors(), self.source.readings()) } => Some(r),
            _ = cancel.cancelled() => None,
        };

        let mut inner = self.inner.write().await;
        inner.finish();

        let Some((sensors, readings)) = results else {
            tracing::debug!("Full fetch cancelled, discarding results");
            return;
        };
        if inner.sensors_seq != seq || inner.readings_seq != seq {
            tracing::debug!("Discarding stale full fetch (seq {} superseded)", seq);
            return;
        }

        match (sensors, readings) {
            (Ok(sensors), Ok(readings)) => {
                let now = Utc::now();
                tracing::debug!(
                    "Fetched {} sensors and {} readings",
                    sensors.len(),
                    readings.len()
                );
                inner.snapshot.sensors = sensors;
                inner.snapshot.readings = readings;
                inner.snapshot.sensors_with_readings =
                    reconcile(&inner.snapshot.sensors, &inner.snapshot.readings, now);
                inner.snapshot.last_fetch = Some(now);
                self.save(&inner.snapshot);
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("Full fetch failed: {}", e);
                inner.snapshot.error = Some(e.to_string());
            }
        }
    }

    /// Clear the published error. No other field is touched.
    pub async fn clear_error(&self) {
        self.inner.write().await.snapshot.error = None;
    }

    /// Discard all cached data and return to the initial empty snapshot.
    ///
    /// Also fences out any fetch still in flight, so a completion that
    /// arrives after the reset is discarded instead of resurrecting the
    /// old data. `loading` keeps reflecting fetches that are still
    /// outstanding.
    pub async fn reset(&self) {
        let mut inner = self.inner.write().await;
        inner.next_seq += 1;
        inner.sensors_seq = inner.next_seq;
        inner.readings_seq = inner.next_seq;
        inner.snapshot = Snapshot {
            loading: inner.inflight > 0,
            ..Snapshot::default()
        };
        self.save(&inner.snapshot);
    }

    /// Mark a fetch as started: bump the fence for the fields it will
    /// write, raise the loading flag, and clear any stale error.
    async fn begin(&self, target: Target) -> u64 {
        let mut inner = self.inner.write().await;
        inner.next_seq += 1;
        let seq = inner.next_seq;
        match target {
            Target::Sensors => inner.sensors_seq = seq,
            Target::Readings => inner.readings_seq = seq,
            Target::Both => {
                inner.sensors_seq = seq;
                inner.readings_seq = seq;
            }
        }
        inner.inflight += 1;
        inner.snapshot.loading = true;
        inner.snapshot.error = None;
        seq
    }

    /// Persist the durable subset. Failures are logged, never published.
    fn save(&self, snapshot: &Snapshot) {
        if let Some(store) = &self.persist {
            if let Err(e) = store.save(&snapshot.to_persisted()) {
                tracing::warn!("Failed to persist snapshot: {}", e);
            }
        }
    }
}
