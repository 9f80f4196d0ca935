//! Error types for the fleet hub service

/// Errors that can occur in the fleet hub service
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for fleet hub operations
pub type Result<T> = std::result::Result<T, HubError>;
