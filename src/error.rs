//! Error types for scriptsync.

use thiserror::Error;

/// Library-level error type for scriptsync operations.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A broken internal invariant. Always a bug in the aligner, never a user error.
    #[error("Alignment invariant violated: {0}")]
    Invariant(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transcript format error: {0}")]
    TranscriptFormat(String),

    #[error("Batch job failed: {0}")]
    Batch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias for scriptsync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
