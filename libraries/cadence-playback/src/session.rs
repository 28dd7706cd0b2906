//! Session persistence
//!
//! The subset of playback state that survives a reload, stored as one JSON
//! value. Restoring never resumes playback; `is_playing` is kept only so the
//! stored shape stays readable by older clients.

use cadence_core::{PersistenceGateway, TrackId, View};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{PlaybackError, Result};
use crate::types::{PlaybackState, DEFAULT_VOLUME};

/// Persisted session subset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSnapshot {
    /// Track that was current
    pub current_track_id: Option<TrackId>,

    /// Play intent at save time (ignored on restore)
    pub is_playing: bool,

    /// Global volume
    pub volume: f64,

    /// Shuffle flag
    pub is_shuffle: bool,

    /// Repeat flag
    pub is_repeat: bool,

    /// Position of the current track in seconds
    pub current_time: f64,

    /// Page that was open
    pub current_view: View,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            current_track_id: None,
            is_playing: false,
            volume: DEFAULT_VOLUME,
            is_shuffle: false,
            is_repeat: false,
            current_time: 0.0,
            current_view: View::Home,
        }
    }
}

impl SessionSnapshot {
    /// Snapshot `state` with the current sink at `position` seconds
    pub fn capture(state: &PlaybackState, position: f64) -> Self {
        Self {
            current_track_id: state.current_track_id.clone(),
            is_playing: state.is_playing,
            volume: state.volume,
            is_shuffle: state.is_shuffle,
            is_repeat: state.is_repeat,
            current_time: if position.is_finite() { position.max(0.0) } else { 0.0 },
            current_view: state.current_view,
        }
    }

    /// Store under `key`
    pub fn save(&self, gateway: &mut dyn PersistenceGateway, key: &str) -> Result<()> {
        let json =
            serde_json::to_string(self).map_err(|e| PlaybackError::Storage(e.to_string()))?;
        gateway.set(key, &json)?;
        debug!(key, track = ?self.current_track_id, "Saved session");
        Ok(())
    }

    /// Read the snapshot stored under `key`
    ///
    /// `None` when nothing was saved, the gateway failed, or the payload does
    /// not parse. Callers fall back to defaults.
    pub fn load(gateway: &dyn PersistenceGateway, key: &str) -> Option<Self> {
        let raw = match gateway.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key, error = %e, "Failed to read session");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                let err = PlaybackError::MalformedSnapshot(e.to_string());
                warn!(key, error = %err, "Ignoring saved session");
                None
            }
        }
    }
}
