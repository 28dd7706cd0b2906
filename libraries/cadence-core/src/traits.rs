/// Collaborator traits for Cadence Player
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::TrackId;

/// Controllable audio output for a single track
///
/// One sink exists per catalog track (a media element in the browser, a
/// simulated clock in tests). The playback core never decodes audio; it only
/// tells sinks what to do and listens to the events they report.
///
/// No `Send` bound: browser media elements live on a single thread.
pub trait AudioSink {
    /// Start or resume playback
    ///
    /// # Errors
    /// Returns `CadenceError::PlaybackRejected` when the output refuses to
    /// start (autoplay policy, missing source). Failures that surface later
    /// are reported out of band by the implementation.
    fn play(&mut self) -> Result<()>;

    /// Pause playback, keeping the position
    fn pause(&mut self);

    /// Whether the sink is currently paused
    fn is_paused(&self) -> bool;

    /// Current position in seconds
    fn position(&self) -> f64;

    /// Move to `seconds` from the start of the track
    fn set_position(&mut self, seconds: f64);

    /// Track length in seconds, `None` until metadata is known
    fn duration(&self) -> Option<f64>;

    /// Set output volume in `[0, 1]`
    fn set_volume(&mut self, volume: f64);
}

/// Events reported by audio sinks
///
/// The host forwards these to the transport controller; events from a sink
/// that is not current are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SinkEvent {
    /// Playback position advanced
    TimeUpdate {
        /// Sink owner
        track_id: TrackId,
        /// Position in seconds
        position: f64,
    },

    /// The track played to its end
    Ended {
        /// Sink owner
        track_id: TrackId,
    },

    /// Track metadata (duration) became available
    DurationKnown {
        /// Sink owner
        track_id: TrackId,
        /// Duration in seconds
        duration: f64,
    },
}

impl SinkEvent {
    /// Track whose sink emitted the event
    pub fn track_id(&self) -> &TrackId {
        match self {
            Self::TimeUpdate { track_id, .. }
            | Self::Ended { track_id }
            | Self::DurationKnown { track_id, .. } => track_id,
        }
    }
}

/// Key/value access to durable client storage
///
/// Values are opaque strings (JSON in practice). Implementations:
/// in-memory, JSON file, browser `localStorage`.
pub trait PersistenceGateway {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<G: PersistenceGateway + ?Sized> PersistenceGateway for Box<G> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
