//! Pure reconciliation of sensor and reading lists into the fleet view

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::model::{Reading, Sensor, SensorWithReading};

/// Find the most recent reading referencing the given serial number.
///
/// Tie order between readings with identical timestamps is unspecified;
/// callers must not depend on it.
pub fn latest_reading_for<'a>(serial: &str, readings: &'a [Reading]) -> Option<&'a Reading> {
    readings
        .iter()
        .filter(|r| r.serial_number == serial)
        .max_by_key(|r| r.incoming_date)
}

/// Format a timestamp as a human-readable recency string relative to `now`.
///
/// Timestamps in the future (clock skew between backend and hub) collapse
/// to "just now".
pub fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp);
    let seconds = elapsed.num_seconds();

    if seconds < 60 {
        return "just now".to_string();
    }

    let minutes = elapsed.num_minutes();
    if minutes < 60 {
        return pluralize(minutes, "minute");
    }

    let hours = elapsed.num_hours();
    if hours < 24 {
        return pluralize(hours, "hour");
    }

    let days = elapsed.num_days();
    if days < 30 {
        return pluralize(days, "day");
    }
    if days < 365 {
        return pluralize(days / 30, "month");
    }
    pluralize(days / 365, "year")
}

fn pluralize(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

/// Join a sensor list with a reading list into the ordered fleet view.
///
/// Produces exactly one entry per input sensor: nothing is added, dropped,
/// or deduplicated. A sensor is online iff any reading references it; there
/// is deliberately no staleness window (matching the backend's definition of
/// presence). Ordering: online sensors first, most recent reading first;
/// offline sensors and all remaining ties keep their input order.
pub fn reconcile(
    sensors: &[Sensor],
    readings: &[Reading],
    now: DateTime<Utc>,
) -> Vec<SensorWithReading> {
    let mut combined: Vec<SensorWithReading> = sensors
        .iter()
        .map(|sensor| {
            let latest_reading = latest_reading_for(&sensor.serial_number, readings).cloned();
            let is_online = latest_reading.is_some();
            let last_seen = latest_reading
                .as_ref()
                .map(|r| format_time_ago(r.incoming_date, now))
                .unwrap_or_else(|| "Never".to_string());
            SensorWithReading {
                sensor: sensor.clone(),
                latest_reading,
                is_online,
                last_seen,
            }
        })
        .collect();

    // Vec::sort_by is stable, which is what keeps offline sensors and
    // equal-timestamp ties in input order.
    combined.sort_by(|a, b| match (&a.latest_reading, &b.latest_reading) {
        (Some(x), Some(y)) => y.incoming_date.cmp(&x.incoming_date),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    combined
}
