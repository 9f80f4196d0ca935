//! Fleet Hub - sensor fleet dashboard service
//!
//! Fetches sensors and readings from the fleet backend, reconciles them
//! into a UI-ready view, persists a snapshot across restarts, and serves
//! the view over an embedded HTTP dashboard.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod io;
pub mod persist;
pub mod rest;

pub use config::{load_config, Config};
pub use error::{HubError, Result};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use fleet_core::{SensorDataSource, SensorStore, SnapshotStore};

use crate::io::ReqwestHttpClient;
use crate::persist::FileSnapshotStore;
use crate::rest::RestDataSource;

/// Run the fleet hub service with the given configuration
pub async fn run(config: Config) -> Result<()> {
    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::default());
    let cancel = CancellationToken::new();

    let source: Arc<dyn SensorDataSource> =
        Arc::new(RestDataSource::new(&config.backend.base_url, http));

    let persist: Option<Arc<dyn SnapshotStore>> = config
        .state_file
        .as_deref()
        .map(|path| Arc::new(FileSnapshotStore::new(path)) as Arc<dyn SnapshotStore>);

    let store = Arc::new(SensorStore::with_persistence(source, persist));

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl-c");
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    if config.refresh.on_start {
        tracing::info!("Running initial refresh");
        store.fetch_all(&cancel).await;
    }

    // Periodic refresh loop
    let mut refresh_handle = None;
    if config.refresh.interval_seconds > 0 {
        let store_for_refresh = Arc::clone(&store);
        let cancel_for_refresh = cancel.clone();
        let interval = Duration::from_secs(config.refresh.interval_seconds);
        refresh_handle = Some(tokio::spawn(async move {
            refresh_loop(store_for_refresh, interval, cancel_for_refresh).await;
        }));
    }

    // Start dashboard if enabled
    if config.dashboard.enabled {
        let dashboard_port = config.dashboard.port;
        let dashboard_store = Arc::clone(&store);
        let cancel_for_handlers = cancel.clone();
        let cancel_for_dashboard = cancel.clone();

        tokio::spawn(async move {
            let router = dashboard::build_router(dashboard_store, cancel_for_handlers);
            let addr = SocketAddr::from(([0, 0, 0, 0], dashboard_port));
            tracing::info!("Dashboard listening on http://{}", addr);

            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(l) => l,
                Err(e) => {
                    tracing::error!(
                        "Failed to bind dashboard to port {}: {}. Continuing without dashboard.",
                        dashboard_port,
                        e
                    );
                    return;
                }
            };

            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    cancel_for_dashboard.cancelled().await;
                })
                .await
                .ok();

            tracing::debug!("Dashboard stopped");
        });
    }

    tracing::info!("Fleet hub started");

    // Block until cancelled
    cancel.cancelled().await;
    if let Some(handle) = refresh_handle {
        let _ = handle.await;
    }
    tracing::info!("Fleet hub stopped");

    Ok(())
}

async fn refresh_loop(store: Arc<SensorStore>, interval: Duration, cancel: CancellationToken) {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = cancel.cancelled() => {
                tracing::debug!("Refresh loop cancelled");
                break;
            }
        }
        store.fetch_all(&cancel).await;
    }
}
