//! Cadence Player - Playback Management
//!
//! Platform-agnostic playback and session state for Cadence Player.
//!
//! This crate provides:
//! - Audio sink registry (identifier → sink)
//! - Playback state machine (idle / loaded / playing)
//! - Transport commands (play/pause, next/previous, seek, volume, mute)
//! - Shuffle (random next, never the same track twice in a row) and repeat
//! - Liked tracks and the liked-only view
//! - Session persistence with restore-without-autoplay
//!
//! # Architecture
//!
//! `cadence-playback` never touches audio data. Each track has an
//! [`AudioSink`](cadence_core::AudioSink) supplied by the host (an `<audio>`
//! element in the browser, a [`HeadlessSink`] in tests and the CLI), and
//! state is persisted through a
//! [`PersistenceGateway`](cadence_core::PersistenceGateway). Hosts whose
//! callbacks re-enter the player share it through a [`SharedPlayer`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use cadence_core::{Catalog, Track, TrackId};
//! use cadence_playback::{Command, HeadlessSink, Player, PlayerConfig, SinkRegistry};
//! use cadence_storage::MemoryGateway;
//!
//! let catalog = Catalog::new(vec![
//!     Track::new("m1", "Blinding Lights", "The Weeknd"),
//!     Track::new("m2", "Levitating", "Dua Lipa"),
//! ])
//! .unwrap();
//!
//! let mut sinks = SinkRegistry::new();
//! for track in catalog.iter() {
//!     sinks.insert(track.id.clone(), Box::new(HeadlessSink::new(track.id.clone(), 200.0)));
//! }
//!
//! let mut player = Player::new(
//!     Arc::new(catalog),
//!     sinks,
//!     Box::new(MemoryGateway::new()),
//!     PlayerConfig::default(),
//! );
//!
//! let state = player.dispatch(Command::SelectTrack(TrackId::new("m2"))).unwrap();
//! assert!(state.is_playing);
//!
//! let state = player.dispatch(Command::Next).unwrap();
//! assert_eq!(state.current_track_id, Some(TrackId::new("m2"))); // end, no repeat
//! ```

mod error;
pub mod events;
mod headless;
mod likes;
mod machine;
mod player;
mod registry;
mod session;
mod shared;
mod shuffle;
pub mod types;
mod views;
mod volume;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use error::{PlaybackError, Result};
pub use events::{PlaybackEvent, MAX_PENDING_EVENTS};
pub use headless::HeadlessSink;
pub use likes::LikeStore;
pub use machine::PlaybackMachine;
pub use player::{Command, Player};
pub use registry::SinkRegistry;
pub use session::SessionSnapshot;
pub use shared::SharedPlayer;
pub use shuffle::ShufflePicker;
pub use types::{Direction, PlaybackState, PlaybackStatus, PlayerConfig, Progress, DEFAULT_VOLUME};
pub use views::playlist_for;
pub use volume::Volume;
