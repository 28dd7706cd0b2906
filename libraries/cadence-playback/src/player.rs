//! Transport controller
//!
//! `Player` wires the state machine to the like store and session
//! persistence. Hosts construct it with their collaborators, feed it
//! [`Command`]s and [`SinkEvent`]s, and render the returned state.

use std::sync::Arc;

use cadence_core::{
    Catalog, PersistenceGateway, SinkEvent, SubstringFilter, Track, TrackFilter, TrackId, View,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::{
    error::Result,
    events::PlaybackEvent,
    likes::LikeStore,
    machine::PlaybackMachine,
    registry::SinkRegistry,
    session::SessionSnapshot,
    types::{Direction, PlaybackState, PlayerConfig, Progress},
    views::playlist_for,
};

/// User intent, as sent by a presentation layer
///
/// Serialized as `{"type": "selectTrack", "value": "m2"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Command {
    /// Play/pause toggle (starts the active playlist from `Idle`)
    PlayPause,
    /// Previous track, wrapping
    Previous,
    /// Next track (shuffle/repeat aware)
    Next,
    /// Seek to a fraction of the current track
    SeekTo(f64),
    /// Set the global volume
    SetVolume(f64),
    /// Mute/unmute
    ToggleMute,
    /// Flip shuffle
    ToggleShuffle,
    /// Flip repeat
    ToggleRepeat,
    /// Like/unlike a track (the current one when `None`)
    ToggleLike(Option<TrackId>),
    /// Play a specific track
    SelectTrack(TrackId),
    /// Switch page
    SetView(View),
}

type Listener = Box<dyn FnMut(&PlaybackState)>;

/// Music player session
pub struct Player {
    machine: PlaybackMachine,
    likes: LikeStore,
    gateway: Box<dyn PersistenceGateway>,
    config: PlayerConfig,
    filter: SubstringFilter,
    listeners: Vec<Listener>,
}

impl Player {
    /// Build a player and restore the saved session
    ///
    /// Likes are loaded first so a restored `Liked` view gets the right
    /// playlist. The restored track is paused; nothing plays until the user
    /// asks.
    pub fn new(
        catalog: Arc<Catalog>,
        sinks: SinkRegistry,
        gateway: Box<dyn PersistenceGateway>,
        config: PlayerConfig,
    ) -> Self {
        let likes = LikeStore::load(&*gateway, config.likes_key.clone());
        let machine = PlaybackMachine::new(catalog, sinks, &config);

        let mut player = Self {
            machine,
            likes,
            gateway,
            config,
            filter: SubstringFilter,
            listeners: Vec::new(),
        };
        player.restore_session();
        player.machine.drain_events();
        player
    }

    fn restore_session(&mut self) {
        let Some(snapshot) = SessionSnapshot::load(&*self.gateway, &self.config.session_key)
        else {
            debug!("No saved session");
            return;
        };

        self.machine.set_volume(snapshot.volume);
        self.machine.set_shuffle(snapshot.is_shuffle);
        self.machine.set_repeat(snapshot.is_repeat);
        self.apply_view(snapshot.current_view);

        if let Some(id) = &snapshot.current_track_id {
            if let Err(e) = self.machine.restore_track(id, snapshot.current_time) {
                warn!(error = %e, "Saved track is gone, starting without one");
            }
        }
        info!(
            track = ?self.machine.state().current_track_id,
            view = %snapshot.current_view,
            "Session restored"
        );
    }

    // ===== Commands =====

    /// Apply `command` and return the resulting state
    ///
    /// Commands that do not apply (next without a track, seek before the
    /// duration is known, ...) are no-ops.
    ///
    /// # Errors
    /// `UnknownTrack` when selecting a track outside the catalog.
    pub fn dispatch(&mut self, command: Command) -> Result<PlaybackState> {
        debug!(?command, "Dispatching");
        match command {
            Command::PlayPause => self.machine.toggle_play_pause(),
            Command::Previous => {
                self.machine.advance(Direction::Previous);
            }
            Command::Next => {
                self.machine.advance(Direction::Next);
            }
            Command::SeekTo(fraction) => {
                self.machine.seek(fraction);
            }
            Command::SetVolume(level) => {
                self.machine.set_volume(level);
                self.save_session();
            }
            Command::ToggleMute => {
                self.machine.toggle_mute();
                self.save_session();
            }
            Command::ToggleShuffle => {
                self.machine.toggle_shuffle();
            }
            Command::ToggleRepeat => {
                self.machine.toggle_repeat();
            }
            Command::ToggleLike(id) => self.toggle_like(id),
            Command::SelectTrack(id) => self.machine.select_track(&id)?,
            Command::SetView(view) => self.apply_view(view),
        }

        let state = self.machine.state().clone();
        self.notify(&state);
        Ok(state)
    }

    /// Forward an event from a sink
    pub fn handle_sink_event(&mut self, event: &SinkEvent) -> PlaybackState {
        match self.apply_sink_event(event) {
            Some(state) => {
                self.notify(&state);
                state
            }
            None => self.machine.state().clone(),
        }
    }

    /// Forward an event from a sink without notifying listeners
    ///
    /// `None` when the event came from a sink that is not current.
    pub fn apply_sink_event(&mut self, event: &SinkEvent) -> Option<PlaybackState> {
        self.machine
            .on_sink_event(event)
            .then(|| self.machine.state().clone())
    }

    /// Persist the session (page hide / process exit)
    pub fn unload(&mut self) {
        self.save_session();
        info!("Session saved on unload");
    }

    fn toggle_like(&mut self, id: Option<TrackId>) {
        let Some(id) = id.or_else(|| self.machine.state().current_track_id.clone()) else {
            debug!("No track to like");
            return;
        };

        let catalog = Arc::clone(self.machine.catalog());
        if !catalog.contains(&id) {
            debug!(track = %id, "Liking a track outside the catalog");
        }

        let liked = self.likes.toggle(&id);
        if let Err(e) = self.likes.save(&mut *self.gateway, &catalog) {
            error!(error = %e, "Failed to save liked tracks");
        }
        self.machine.emit(PlaybackEvent::LikeChanged {
            track_id: id.clone(),
            liked,
        });
        info!(track = %id, liked, "Like toggled");

        if self.machine.state().current_view == View::Liked {
            self.apply_view(View::Liked);
        }
    }

    fn apply_view(&mut self, view: View) {
        let playlist = playlist_for(view, self.machine.catalog(), self.likes.liked());
        self.machine.set_view(view, playlist);
    }

    fn save_session(&mut self) {
        let snapshot =
            SessionSnapshot::capture(self.machine.state(), self.machine.progress().position);
        if let Err(e) = snapshot.save(&mut *self.gateway, &self.config.session_key) {
            error!(error = %e, "Failed to save session");
        }
    }

    fn notify(&mut self, state: &PlaybackState) {
        for listener in &mut self.listeners {
            listener(state);
        }
    }

    // ===== Subscriptions =====

    /// Call `listener` with the new state after every command and every
    /// handled sink event
    pub fn subscribe(&mut self, listener: impl FnMut(&PlaybackState) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Drain pending events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        self.machine.drain_events()
    }

    // ===== Queries =====

    /// Current state
    pub fn state(&self) -> &PlaybackState {
        self.machine.state()
    }

    /// Position/duration of the current track
    pub fn progress(&self) -> Progress {
        self.machine.progress()
    }

    /// Whether `id` is liked
    pub fn is_liked(&self, id: &TrackId) -> bool {
        self.likes.is_liked(id)
    }

    /// Number of liked tracks
    pub fn liked_count(&self) -> usize {
        self.likes.len()
    }

    /// Catalog tracks matching `query`, in catalog order
    pub fn search(&self, query: &str) -> Vec<&Track> {
        self.machine
            .catalog()
            .iter()
            .filter(|track| self.filter.matches(track, query))
            .collect()
    }

    /// Current track metadata
    pub fn current_track(&self) -> Option<&Track> {
        self.state()
            .current_track_id
            .as_ref()
            .and_then(|id| self.machine.catalog().get(id))
    }

    /// The catalog
    pub fn catalog(&self) -> &Arc<Catalog> {
        self.machine.catalog()
    }

    /// Sink registry, for hosts that attach sinks after construction
    pub fn sinks_mut(&mut self) -> &mut SinkRegistry {
        self.machine.sinks_mut()
    }

    /// Configuration in use
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("machine", &self.machine)
            .field("likes", &self.likes)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
