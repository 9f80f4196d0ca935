//! Error types for the fleet core

/// Errors that can occur in the fleet core
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Persistence error: {0}")]
    Persist(String),
}

/// Result type alias for fleet core operations
pub type Result<T> = std::result::Result<T, CoreError>;
