//! Configuration types for the fleet hub service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    /// Path of the JSON state file. When absent, nothing is persisted and
    /// every session starts empty.
    #[serde(default)]
    pub state_file: Option<PathBuf>,
}

/// Sensor backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_dashboard_port(),
        }
    }
}

/// Periodic refresh settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between full refreshes. Zero disables the periodic loop.
    #[serde(default = "default_refresh_interval")]
    pub interval_seconds: u64,
    /// Run a full refresh immediately at startup.
    #[serde(default = "default_true")]
    pub on_start: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_refresh_interval(),
            on_start: true,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_true() -> bool {
    true
}

fn default_dashboard_port() -> u16 {
    11116
}

fn default_refresh_interval() -> u64 {
    60
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::HubError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let json = r#"{
            "backend": {
                "base_url": "http://fleet.example.com:9000"
            },
            "dashboard": {
                "enabled": false,
                "port": 9090
            },
            "refresh": {
                "interval_seconds": 15,
                "on_start": false
            },
            "state_file": "/var/lib/fleet-hub/state.json"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.backend.base_url, "http://fleet.example.com:9000");
        assert!(!config.dashboard.enabled);
        assert_eq!(config.dashboard.port, 9090);
        assert_eq!(config.refresh.interval_seconds, 15);
        assert!(!config.refresh.on_start);
        assert_eq!(
            config.state_file,
            Some(PathBuf::from("/var/lib/fleet-hub/state.json"))
        );
    }

    #[test]
    fn parse_minimal_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:8000");
        assert!(config.dashboard.enabled);
        assert_eq!(config.dashboard.port, 11116);
        assert_eq!(config.refresh.interval_seconds, 60);
        assert!(config.refresh.on_start);
        assert!(config.state_file.is_none());
    }

    #[test]
    fn parse_partial_sections() {
        let json = r#"{"dashboard": {"port": 8080}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.dashboard.enabled);
        assert_eq!(config.dashboard.port, 8080);
        assert_eq!(config.backend.base_url, "http://localhost:8000");
    }

    #[test]
    fn default_config_matches_empty_json() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, "http://localhost:8000");
        assert!(config.dashboard.enabled);
        assert_eq!(config.refresh.interval_seconds, 60);
    }

    #[test]
    fn load_config_missing_file() {
        let result = load_config(Path::new("/nonexistent/config.json"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(
            &config_path,
            r#"{"backend": {"base_url": "http://10.0.0.5:8000"}}"#,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.backend.base_url, "http://10.0.0.5:8000");
    }

    #[test]
    fn load_config_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, "not json").unwrap();

        let result = load_config(&config_path);
        assert!(result.is_err());
    }
}
