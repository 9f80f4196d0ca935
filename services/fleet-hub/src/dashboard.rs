//! Web dashboard with JSON API endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use fleet_core::SensorStore;

/// Dashboard application state
#[derive(Clone)]
pub struct DashboardState {
    pub store: Arc<SensorStore>,
    pub cancel: CancellationToken,
}

/// Build the dashboard axum router
pub fn build_router(store: Arc<SensorStore>, cancel: CancellationToken) -> Router {
    let dashboard_state = DashboardState { store, cancel };

    Router::new()
        .route("/", get(index_handler))
        .route("/api/fleet", get(fleet_handler))
        .route("/api/snapshot", get(snapshot_handler))
        .route("/api/refresh", post(refresh_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(dashboard_state)
}

async fn index_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let snapshot = dashboard.store.snapshot().await;

    let error_banner = match &snapshot.error {
        Some(message) => format!(
            r#"<p style="padding: 0.5rem 1rem; border-radius: 0.25rem; color: #721c24; background-color: #f8d7da;">{}</p>"#,
            message
        ),
        None => String::new(),
    };

    let fleet_rows: String = snapshot
        .sensors_with_readings
        .iter()
        .map(|entry| {
            let (label, color, bg) = if entry.is_online {
                ("Online", "#155724", "#d4edda")
            } else {
                ("Offline", "#721c24", "#f8d7da")
            };
            let value = entry
                .latest_reading
                .as_ref()
                .map(|r| format!("{} {}", r.value, r.unit))
                .unwrap_or_else(|| "-".to_string());
            format!(
                r#"<tr style="border-bottom: 1px solid #dee2e6;">
                    <td style="padding: 0.5rem;">{}</td>
                    <td style="padding: 0.5rem;">{}</td>
                    <td style="padding: 0.5rem;">{}</td>
                    <td style="padding: 0.5rem;">{}</td>
                    <td style="padding: 0.5rem;">
                        <span style="display: inline-block; padding: 0.25em 0.6em; border-radius: 0.25rem; font-size: 0.85em; font-weight: 600; color: {}; background-color: {};">{}</span>
                    </td>
                    <td style="padding: 0.5rem;">{}</td>
                    <td style="padding: 0.5rem;">{}</td>
                </tr>"#,
                entry.sensor.name,
                entry.sensor.serial_number,
                entry.sensor.kind,
                entry.sensor.location,
                color,
                bg,
                label,
                value,
                entry.last_seen,
            )
        })
        .collect();

    let last_fetch = snapshot
        .last_fetch
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "Never".to_string());

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta http-equiv="refresh" content="30">
    <title>Fleet Dashboard</title>
</head>
<body style="font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem;">
    <h1>Fleet Dashboard</h1>
    {error_banner}
    <p>Last refresh: {last_fetch}</p>
    <section>
        <h2>Sensors</h2>
        <table style="width: 100%; border-collapse: collapse;">
            <thead>
                <tr style="border-bottom: 2px solid #dee2e6;">
                    <th style="padding: 0.5rem; text-align: left;">Name</th>
                    <th style="padding: 0.5rem; text-align: left;">Serial</th>
                    <th style="padding: 0.5rem; text-align: left;">Type</th>
                    <th style="padding: 0.5rem; text-align: left;">Location</th>
                    <th style="padding: 0.5rem; text-align: left;">Status</th>
                    <th style="padding: 0.5rem; text-align: left;">Latest Value</th>
                    <th style="padding: 0.5rem; text-align: left;">Last Seen</th>
                </tr>
            </thead>
            <tbody>{fleet_rows}</tbody>
        </table>
    </section>
    <form method="post" action="/api/refresh">
        <button type="submit" style="margin-top: 1rem; padding: 0.5rem 1rem;">Refresh now</button>
    </form>
</body>
</html>"#,
        error_banner = error_banner,
        last_fetch = last_fetch,
        fleet_rows = fleet_rows,
    );

    Html(html)
}

async fn fleet_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let snapshot = dashboard.store.snapshot().await;
    axum::Json(snapshot.sensors_with_readings)
}

async fn snapshot_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let snapshot = dashboard.store.snapshot().await;
    axum::Json(serde_json::json!({
        "loading": snapshot.loading,
        "error": snapshot.error,
        "last_fetch": snapshot.last_fetch,
        "sensor_count": snapshot.sensors.len(),
        "reading_count": snapshot.readings.len(),
    }))
}

async fn refresh_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    dashboard.store.fetch_all(&dashboard.cancel).await;
    let snapshot = dashboard.store.snapshot().await;
    axum::Json(serde_json::json!({
        "error": snapshot.error,
        "sensor_count": snapshot.sensors.len(),
        "reading_count": snapshot.readings.len(),
    }))
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}
