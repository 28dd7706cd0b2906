//! Error types for playback management

use cadence_core::TrackId;
use thiserror::Error;

/// Playback errors
///
/// Only `UnknownTrack` is ever returned from `Player::dispatch`. The other
/// kinds are logged and absorbed so the player always stays in a valid state.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Command referenced a track that is not in the catalog
    #[error("Unknown track: {0}")]
    UnknownTrack(TrackId),

    /// The sink refused to start playback
    #[error("Playback rejected for {track_id}: {reason}")]
    PlaybackRejected { track_id: TrackId, reason: String },

    /// Navigation requested on an empty active playlist
    #[error("Active playlist is empty")]
    EmptyPlaylist,

    /// Persisted snapshot could not be parsed
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// Catalog track without a registered sink
    #[error("No audio sink registered for {0}")]
    MissingSink(TrackId),

    /// Persistence gateway failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<cadence_core::CadenceError> for PlaybackError {
    fn from(err: cadence_core::CadenceError) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
