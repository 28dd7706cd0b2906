//! Core types for playback management

use cadence_core::{TrackId, View};
use cadence_storage::keys;
use serde::{Deserialize, Serialize};

/// Default volume when nothing was saved and for mute restore
pub const DEFAULT_VOLUME: f64 = 0.8;

/// Coarse playback status derived from `PlaybackState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    /// No current track
    Idle,

    /// Current track set, paused
    Loaded,

    /// Current track set, audio advancing
    Playing,
}

/// Navigation direction for `advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Previous,
}

/// Read-only snapshot of the playback state machine
///
/// Handed to the presentation layer after every transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    /// Current track, always a catalog member when set
    pub current_track_id: Option<TrackId>,

    /// Play intent; stays true if a sink silently failed to start
    pub is_playing: bool,

    /// Global volume in `[0, 1]`
    pub volume: f64,

    /// Level restored by unmute
    pub last_non_zero_volume: f64,

    /// Randomized "next" selection
    pub is_shuffle: bool,

    /// Repeat the current track on end, wrap at playlist end on next
    pub is_repeat: bool,

    /// Identifiers navigated by next/previous
    pub active_playlist: Vec<TrackId>,

    /// Position of the current track in `active_playlist`, if it is a member
    pub active_index: Option<usize>,

    /// Current page
    pub current_view: View,
}

impl PlaybackState {
    /// Derived status
    pub fn status(&self) -> PlaybackStatus {
        match (&self.current_track_id, self.is_playing) {
            (None, _) => PlaybackStatus::Idle,
            (Some(_), false) => PlaybackStatus::Loaded,
            (Some(_), true) => PlaybackStatus::Playing,
        }
    }

    /// Whether the volume is zero
    pub fn is_muted(&self) -> bool {
        self.volume == 0.0
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_track_id: None,
            is_playing: false,
            volume: DEFAULT_VOLUME,
            last_non_zero_volume: DEFAULT_VOLUME,
            is_shuffle: false,
            is_repeat: false,
            active_playlist: Vec::new(),
            active_index: None,
            current_view: View::Home,
        }
    }
}

/// Progress of the current track, for progress bars and time labels
///
/// Serializes with a derived `fraction` next to position and duration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Progress {
    /// Position in seconds
    pub position: f64,

    /// Duration in seconds, `None` until metadata is known
    pub duration: Option<f64>,
}

impl Progress {
    /// Fraction played in `[0, 1]`, 0 when the duration is unknown
    pub fn fraction(&self) -> f64 {
        match self.duration {
            Some(duration) if duration > 0.0 => (self.position / duration).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}

impl Serialize for Progress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut out = serializer.serialize_struct("Progress", 3)?;
        out.serialize_field("position", &self.position)?;
        out.serialize_field("duration", &self.duration)?;
        out.serialize_field("fraction", &self.fraction())?;
        out.end()
    }
}

/// Configuration for the player
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Volume used when no session was saved (default: 0.8)
    pub default_volume: f64,

    /// Storage key of the session snapshot
    pub session_key: String,

    /// Storage key of the liked set
    pub likes_key: String,

    /// Upper bound on shuffle re-rolls before falling back (default: 32)
    pub max_shuffle_rolls: u32,

    /// Fixed seed for reproducible shuffle (default: entropy)
    pub shuffle_seed: Option<u64>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_volume: DEFAULT_VOLUME,
            session_key: keys::SESSION_STATE.to_string(),
            likes_key: keys::LIKED_TRACKS.to_string(),
            max_shuffle_rolls: 32,
            shuffle_seed: None,
        }
    }
}
