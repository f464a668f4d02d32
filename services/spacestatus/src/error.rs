//! Error types for the space status indicator

/// Errors that can occur in the space status indicator
#[derive(Debug, thiserror::Error)]
pub enum SpaceStatusError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Notifier error: {0}")]
    Notifier(String),

    #[error("Network watcher error: {0}")]
    Network(String),
}

/// Result type alias for space status operations
pub type Result<T> = std::result::Result<T, SpaceStatusError>;
