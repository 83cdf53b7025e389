//! Error types for the retainer-store crate

use thiserror::Error;

/// Result type alias using `StoreError`
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during retained-store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Record was submitted without the retain flag
    #[error("record for topic {0} is not marked as retained")]
    NotRetained(String),

    /// Backend rejected or lost a write
    #[error("write failed for topic {topic}: {reason}")]
    WriteFailed { topic: String, reason: String },

    /// Backend could not serve a lookup
    #[error("lookup failed for topic {topic}: {reason}")]
    LookupFailed { topic: String, reason: String },
}
