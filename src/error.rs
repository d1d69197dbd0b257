//! Unified error types for the stats service.

use thiserror::Error;

/// Unified error type for the stats service.
#[derive(Error, Debug)]
pub enum StatsError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// JSON parsing or serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error on the persisted stats file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, StatsError>;
