//! Data model: sensors, readings, and the store snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A physical or logical measurement device, identified by serial number.
///
/// Sensors are owned by the backend; the store replaces the whole list on
/// every fetch and never edits individual entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub serial_number: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub location: String,
}

/// One timestamped measurement attributed to a sensor.
///
/// The `serial_number` is a reference, not an owning relationship; several
/// readings may point at the same sensor and the list is not assumed sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub serial_number: String,
    pub incoming_date: DateTime<Utc>,
    pub value: f64,
    #[serde(default)]
    pub unit: String,
}

/// A sensor joined with its most recent reading.
///
/// Derived in full by [`crate::reconcile::reconcile`] on every pass; never
/// patched incrementally and never the source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorWithReading {
    pub sensor: Sensor,
    pub latest_reading: Option<Reading>,
    pub is_online: bool,
    pub last_seen: String,
}

/// The complete state published by the store at a point in time.
///
/// `sensors_with_readings` is always a pure function of `sensors` and
/// `readings` as of the moment it was last computed. `loading` is true iff
/// at least one fetch is outstanding.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub sensors: Vec<Sensor>,
    pub readings: Vec<Reading>,
    pub sensors_with_readings: Vec<SensorWithReading>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_fetch: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// The durable subset of the snapshot. `loading` and `error` are
    /// transient and never persisted.
    pub fn to_persisted(&self) -> PersistedSnapshot {
        PersistedSnapshot {
            sensors: self.sensors.clone(),
            readings: self.readings.clone(),
            sensors_with_readings: self.sensors_with_readings.clone(),
            last_fetch: self.last_fetch,
        }
    }
}

/// Snapshot subset written to durable storage on every data change and
/// restored at store construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    #[serde(default)]
    pub sensors: Vec<Sensor>,
    #[serde(default)]
    pub readings: Vec<Reading>,
    #[serde(default)]
    pub sensors_with_readings: Vec<SensorWithReading>,
    #[serde(default)]
    pub last_fetch: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sensor(serial: &str) -> Sensor {
        Sensor {
            serial_number: serial.to_string(),
            name: format!("Sensor {serial}"),
            kind: "temperature".to_string(),
            location: "lab".to_string(),
        }
    }

    #[test]
    fn sensor_kind_serializes_as_type() {
        let json = serde_json::to_string(&sensor("S1")).unwrap();
        assert!(json.contains(r#""type":"temperature""#));
        assert!(!json.contains(r#""kind""#));
    }

    #[test]
    fn reading_roundtrips_through_json() {
        let reading = Reading {
            serial_number: "S1".to_string(),
            incoming_date: Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap(),
            value: 21.5,
            unit: "C".to_string(),
        };
        let json = serde_json::to_string(&reading).unwrap();
        let parsed: Reading = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, reading);
    }

    #[test]
    fn sensor_optional_fields_default() {
        let parsed: Sensor = serde_json::from_str(
            r#"{"serial_number": "S1", "name": "Boiler", "type": "pressure"}"#,
        )
        .unwrap();
        assert_eq!(parsed.location, "");
    }

    #[test]
    fn default_snapshot_is_empty() {
        let snapshot = Snapshot::default();
        assert!(snapshot.sensors.is_empty());
        assert!(snapshot.readings.is_empty());
        assert!(snapshot.sensors_with_readings.is_empty());
        assert!(!snapshot.loading);
        assert!(snapshot.error.is_none());
        assert!(snapshot.last_fetch.is_none());
    }

    #[test]
    fn to_persisted_drops_transient_fields() {
        let snapshot = Snapshot {
            sensors: vec![sensor("S1")],
            loading: true,
            error: Some("boom".to_string()),
            last_fetch: Some(Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap()),
            ..Snapshot::default()
        };
        let persisted = snapshot.to_persisted();
        assert_eq!(persisted.sensors.len(), 1);
        assert_eq!(persisted.last_fetch, snapshot.last_fetch);

        let json = serde_json::to_string(&persisted).unwrap();
        assert!(!json.contains("loading"));
        assert!(!json.contains("error"));
    }

    #[test]
    fn persisted_snapshot_tolerates_missing_fields() {
        let parsed: PersistedSnapshot = serde_json::from_str("{}").unwrap();
        assert!(parsed.sensors.is_empty());
        assert!(parsed.last_fetch.is_none());
    }
}
