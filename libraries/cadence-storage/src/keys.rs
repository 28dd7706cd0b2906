//! Storage key constants
//!
//! Names match what earlier releases of the web player wrote to
//! `localStorage`, so existing sessions keep resuming.

/// Session snapshot (`{currentTrackId, isPlaying, volume, ...}`)
pub const SESSION_STATE: &str = "musicPlayerState";

/// Liked tracks (`{likedTrackIds: [...]}`)
pub const LIKED_TRACKS: &str = "likedTracks";
