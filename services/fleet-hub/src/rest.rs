//! REST client for the sensor backend

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use fleet_core::{CoreError, Reading, Sensor, SensorDataSource};

use crate::io::HttpClient;

const BACKEND_UNKNOWN: u8 = 0;
const BACKEND_UP: u8 = 1;
const BACKEND_DOWN: u8 = 2;

/// Data source backed by the fleet REST backend.
///
/// Before the first data request a health probe runs against the backend;
/// its verdict is cached so every subsequent request skips the probe. A
/// cached "down" verdict fails fast. The store clears the cache through
/// [`SensorDataSource::reset_backend_check`] before a full refresh.
pub struct RestDataSource {
    base_url: String,
    http: Arc<dyn HttpClient>,
    backend_state: AtomicU8,
}

impl std::fmt::Debug for RestDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestDataSource")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl RestDataSource {
    pub fn new(base_url: &str, http: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        tracing::debug!("Created RestDataSource at {}", base_url);
        Self {
            base_url,
            http,
            backend_state: AtomicU8::new(BACKEND_UNKNOWN),
        }
    }

    async fn check_backend(&self) -> fleet_core::Result<()> {
        match self.backend_state.load(Ordering::Acquire) {
            BACKEND_UP => return Ok(()),
            BACKEND_DOWN => {
                return Err(CoreError::Fetch(
                    "Backend unreachable (cached health check)".to_string(),
                ))
            }
            _ => {}
        }

        let url = format!("{}/health", self.base_url);
        match self.http.get(&url).await {
            Ok(response) if (200..300).contains(&response.status) => {
                self.backend_state.store(BACKEND_UP, Ordering::Release);
                Ok(())
            }
            Ok(response) => {
                self.backend_state.store(BACKEND_DOWN, Ordering::Release);
                Err(CoreError::Fetch(format!(
                    "Health check at {} returned status {}",
                    url, response.status
                )))
            }
            Err(e) => {
                self.backend_state.store(BACKEND_DOWN, Ordering::Release);
                Err(CoreError::Fetch(format!(
                    "Health check at {} failed: {}",
                    url, e
                )))
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> fleet_core::Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .await
            .map_err(|e| CoreError::Fetch(e.to_string()))?;

        if !(200..300).contains(&response.status) {
            return Err(CoreError::Fetch(format!(
                "GET {} returned status {}",
                url, response.status
            )));
        }

        serde_json::from_str(&response.body)
            .map_err(|e| CoreError::Fetch(format!("Malformed response from {}: {}", url, e)))
    }
}

#[async_trait]
impl SensorDataSource for RestDataSource {
    async fn sensors(&self) -> fleet_core::Result<Vec<Sensor>> {
        self.check_backend().await?;
        self.get_json("/api/sensors").await
    }

    async fn readings(&self) -> fleet_core::Result<Vec<Reading>> {
        self.check_backend().await?;
        self.get_json("/api/readings").await
    }

    fn reset_backend_check(&self) {
        self.backend_state.store(BACKEND_UNKNOWN, Ordering::Release);
    }
}
