//! Playback Events
//!
//! Event-based communication for UI synchronization. The state machine
//! queues events as transitions happen; the presentation layer drains them
//! (or just re-renders from the `PlaybackState` snapshot it is handed).

use std::collections::VecDeque;

use cadence_core::{TrackId, View};
use serde::{Deserialize, Serialize};

use crate::types::PlaybackStatus;

/// Events emitted by the playback system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlaybackEvent {
    /// Idle/loaded/playing changed
    StateChanged {
        /// The new status
        status: PlaybackStatus,
    },

    /// A different track became current
    TrackChanged {
        /// ID of the new (current) track
        track_id: TrackId,
        /// ID of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0.0-1.0)
        volume: f64,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// Shuffle toggled
    ShuffleChanged {
        /// New flag
        enabled: bool,
    },

    /// Repeat toggled
    RepeatChanged {
        /// New flag
        enabled: bool,
    },

    /// A track was liked or unliked
    LikeChanged {
        /// Affected track
        track_id: TrackId,
        /// New membership
        liked: bool,
    },

    /// View switched (active playlist may have changed)
    ViewChanged {
        /// New view
        view: View,
        /// Length of the active playlist afterwards
        playlist_len: usize,
    },

    /// Position update from the current sink
    PositionUpdate {
        /// Current position in seconds
        position: f64,
        /// Total duration in seconds, if known
        duration: Option<f64>,
    },

    /// Error occurred during playback (logged, state unchanged)
    Error {
        /// Error message
        message: String,
    },
}

/// Most events kept while nobody drains; older ones are dropped first
pub const MAX_PENDING_EVENTS: usize = 256;

/// Queue of events waiting for the presentation layer
///
/// A position update replaces a position update directly before it, and
/// the queue never holds more than [`MAX_PENDING_EVENTS`].
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    pending: VecDeque<PlaybackEvent>,
}

impl EventQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event
    pub fn push(&mut self, event: PlaybackEvent) {
        if matches!(event, PlaybackEvent::PositionUpdate { .. }) {
            if let Some(last @ PlaybackEvent::PositionUpdate { .. }) = self.pending.back_mut() {
                *last = event;
                return;
            }
        }

        if self.pending.len() == MAX_PENDING_EVENTS {
            self.pending.pop_front();
        }
        self.pending.push_back(event);
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<PlaybackEvent> {
        self.pending.drain(..).collect()
    }

    /// Whether events are waiting
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of events waiting
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
