/// Core error types for Cadence Player
use thiserror::Error;

use crate::types::TrackId;

/// Result type alias using `CadenceError`
pub type Result<T> = std::result::Result<T, CadenceError>;

/// Core error type for Cadence Player
#[derive(Error, Debug)]
pub enum CadenceError {
    /// Two catalog entries share an identifier
    #[error("Duplicate track in catalog: {0}")]
    DuplicateTrack(TrackId),

    /// An audio sink refused to start playback
    #[error("Playback rejected: {0}")]
    PlaybackRejected(String),

    /// View name that is not home, liked or search
    #[error("Unknown view '{0}' (home, liked, search)")]
    UnknownView(String),

    /// Persistence backend errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CadenceError {
    /// Create a playback rejected error
    pub fn playback_rejected(msg: impl Into<String>) -> Self {
        Self::PlaybackRejected(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
