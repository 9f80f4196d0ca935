//! Data source abstraction for fetching sensors and readings

use async_trait::async_trait;

use crate::model::{Reading, Sensor};

/// Abstraction over the backend that owns sensor and reading data.
///
/// Implementations own all network I/O and backend-availability tracking;
/// the store only sees lists or [`crate::CoreError::Fetch`] failures.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait SensorDataSource: Send + Sync {
    /// Fetch the full sensor list.
    async fn sensors(&self) -> crate::Result<Vec<Sensor>>;

    /// Fetch the full reading list.
    async fn readings(&self) -> crate::Result<Vec<Reading>>;

    /// Clear any cached backend-availability verdict so the next request
    /// probes the backend again. Invoked by the store before a full refresh.
    fn reset_backend_check(&self);
}
