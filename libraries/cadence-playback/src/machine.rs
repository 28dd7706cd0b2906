//! Playback state machine - core orchestration
//!
//! Owns the current track, play intent, volume, shuffle/repeat flags and the
//! active playlist, and drives the sinks in the registry accordingly.
//!
//! Status moves between `Idle` (no track), `Loaded` (track, paused) and
//! `Playing`. Invalid transitions are logged and ignored; only selecting a
//! track outside the catalog is reported to the caller.

use std::sync::Arc;

use cadence_core::{Catalog, CadenceError, SinkEvent, TrackId, View};
use tracing::{debug, info, trace, warn};

use crate::{
    error::{PlaybackError, Result},
    events::{EventQueue, PlaybackEvent},
    registry::SinkRegistry,
    shuffle::ShufflePicker,
    types::{Direction, PlaybackState, PlaybackStatus, PlayerConfig, Progress},
    volume::Volume,
};

/// Playback state machine
#[derive(Debug)]
pub struct PlaybackMachine {
    catalog: Arc<Catalog>,
    sinks: SinkRegistry,
    state: PlaybackState,
    volume: Volume,
    shuffle: ShufflePicker,
    events: EventQueue,
}

impl PlaybackMachine {
    /// Create a machine in `Idle` on the home view
    ///
    /// The active playlist starts as the whole catalog and every sink gets
    /// the configured default volume.
    pub fn new(catalog: Arc<Catalog>, sinks: SinkRegistry, config: &PlayerConfig) -> Self {
        for id in sinks.ids() {
            if !catalog.contains(id) {
                warn!(track = %id, "Sink registered for a track outside the catalog");
            }
        }

        let mut machine = Self {
            state: PlaybackState {
                active_playlist: catalog.ids(),
                ..PlaybackState::default()
            },
            catalog,
            sinks,
            volume: Volume::new(config.default_volume),
            shuffle: ShufflePicker::new(config.shuffle_seed, config.max_shuffle_rolls),
            events: EventQueue::new(),
        };
        machine.apply_volume();
        machine.events.drain();
        machine
    }

    // ===== Track selection =====

    /// Make `id` current and start it from the beginning
    ///
    /// Pauses the previous track first. A rejected `play` is logged and
    /// reported as an `Error` event; the state still says playing.
    ///
    /// # Errors
    /// `UnknownTrack` if `id` is not in the catalog (state unchanged).
    pub fn select_track(&mut self, id: &TrackId) -> Result<()> {
        if !self.catalog.contains(id) {
            debug!(track = %id, "Ignoring selection of unknown track");
            return Err(PlaybackError::UnknownTrack(id.clone()));
        }
        self.switch_to(id);
        Ok(())
    }

    /// Session restore: make `id` current, paused at `position` seconds
    ///
    /// Never calls `play`.
    ///
    /// # Errors
    /// `UnknownTrack` if `id` is not in the catalog (state unchanged).
    pub fn restore_track(&mut self, id: &TrackId, position: f64) -> Result<()> {
        if !self.catalog.contains(id) {
            return Err(PlaybackError::UnknownTrack(id.clone()));
        }
        let before = self.state.status();
        self.pause_current();

        match self.sinks.get_mut(id) {
            Some(sink) => {
                sink.pause();
                sink.set_position(if position.is_finite() { position.max(0.0) } else { 0.0 });
            }
            None => debug!(track = %id, "Restoring track without a sink"),
        }

        let previous = self.state.current_track_id.replace(id.clone());
        self.state.is_playing = false;
        self.resolve_index();

        if previous.as_ref() != Some(id) {
            self.events.push(PlaybackEvent::TrackChanged {
                track_id: id.clone(),
                previous_track_id: previous,
            });
        }
        self.finish_transition(before);
        info!(track = %id, position, "Restored track");
        Ok(())
    }

    /// Pause the old track, rewind and start the new one
    ///
    /// Returns false when `id` has no sink (nothing changes).
    fn switch_to(&mut self, id: &TrackId) -> bool {
        if !self.sinks.contains(id) {
            let err = PlaybackError::MissingSink(id.clone());
            warn!(error = %err, "Cannot select track");
            return false;
        }

        let before = self.state.status();
        if self.state.current_track_id.as_ref() != Some(id) {
            self.pause_current();
        }

        if let Some(sink) = self.sinks.get_mut(id) {
            sink.set_position(0.0);
        }
        self.start_sink(id);

        let previous = self.state.current_track_id.replace(id.clone());
        self.state.is_playing = true;
        self.resolve_index();

        if previous.as_ref() != Some(id) {
            self.events.push(PlaybackEvent::TrackChanged {
                track_id: id.clone(),
                previous_track_id: previous,
            });
        }
        self.finish_transition(before);
        info!(track = %id, index = ?self.state.active_index, "Playing track");
        true
    }

    // ===== Playback Control =====

    /// Play/pause toggle
    ///
    /// From `Idle` this starts the first track of the active playlist (no-op
    /// when it is empty). Otherwise flips the play intent of the current
    /// track.
    pub fn toggle_play_pause(&mut self) {
        let Some(current) = self.state.current_track_id.clone() else {
            match self.state.active_playlist.first().cloned() {
                Some(first) => {
                    self.switch_to(&first);
                }
                None => debug!(error = %PlaybackError::EmptyPlaylist, "Nothing to play"),
            }
            return;
        };

        let before = self.state.status();
        if self.state.is_playing {
            self.pause_current();
            self.state.is_playing = false;
        } else {
            self.start_sink(&current);
            self.state.is_playing = true;
        }
        self.finish_transition(before);
    }

    /// Move through the active playlist
    ///
    /// Returns whether a transition happened. Requires a current track and a
    /// non-empty playlist. When the current track is not in the playlist,
    /// `Next` starts at the top (anywhere when shuffling) and `Previous` at
    /// the bottom.
    pub fn advance(&mut self, direction: Direction) -> bool {
        if self.state.current_track_id.is_none() {
            debug!(?direction, "No current track to move from");
            return false;
        }

        let len = self.state.active_playlist.len();
        if len == 0 {
            debug!(?direction, error = %PlaybackError::EmptyPlaylist, "Cannot navigate");
            return false;
        }

        let target = match (direction, self.state.active_index) {
            (Direction::Previous, Some(i)) => Some((i + len - 1) % len),
            (Direction::Previous, None) => Some(len - 1),
            (Direction::Next, current) if self.state.is_shuffle => self.shuffle.pick(len, current),
            (Direction::Next, Some(i)) if i + 1 < len => Some(i + 1),
            (Direction::Next, Some(_)) if self.state.is_repeat => Some(0),
            (Direction::Next, Some(_)) => None,
            (Direction::Next, None) => Some(0),
        };

        let Some(target) = target else {
            debug!("End of playlist");
            return false;
        };

        let id = self.state.active_playlist[target].clone();
        self.switch_to(&id)
    }

    /// Current track reached its end
    ///
    /// Repeat restarts it; otherwise behaves like `Next`, and stops on the
    /// last track when there is nowhere to go.
    pub fn on_track_ended(&mut self) {
        let Some(current) = self.state.current_track_id.clone() else {
            return;
        };

        if self.state.is_repeat {
            let before = self.state.status();
            if let Some(sink) = self.sinks.get_mut(&current) {
                sink.set_position(0.0);
            }
            self.start_sink(&current);
            self.state.is_playing = true;
            self.finish_transition(before);
            debug!(track = %current, "Repeating track");
            return;
        }

        if !self.advance(Direction::Next) {
            let before = self.state.status();
            self.state.is_playing = false;
            self.finish_transition(before);
            info!(track = %current, "Playback finished");
        }
    }

    // ===== Seek =====

    /// Seek the current track to `fraction` of its duration
    ///
    /// Returns false when there is no current sink or its duration is not
    /// known yet.
    pub fn seek(&mut self, fraction: f64) -> bool {
        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };

        let Some(current) = self.state.current_track_id.clone() else {
            debug!("No current track to seek");
            return false;
        };
        let Some(sink) = self.sinks.get_mut(&current) else {
            return false;
        };
        let Some(duration) = sink.duration() else {
            debug!(track = %current, "Duration unknown, ignoring seek");
            return false;
        };

        let position = fraction * duration;
        sink.set_position(position);
        self.events.push(PlaybackEvent::PositionUpdate {
            position,
            duration: Some(duration),
        });
        true
    }

    // ===== Volume =====

    /// Set the global volume, returning the applied (clamped) level
    pub fn set_volume(&mut self, level: f64) -> f64 {
        self.volume.set_level(level);
        self.apply_volume()
    }

    /// Mute, or restore the last audible level
    pub fn toggle_mute(&mut self) -> f64 {
        self.volume.toggle_mute();
        self.apply_volume()
    }

    fn apply_volume(&mut self) -> f64 {
        let level = self.volume.level();
        self.sinks.set_volume_all(level);
        self.state.volume = level;
        self.state.last_non_zero_volume = self.volume.last_non_zero();
        self.events.push(PlaybackEvent::VolumeChanged {
            volume: level,
            is_muted: self.volume.is_muted(),
        });
        level
    }

    // ===== Shuffle & Repeat =====

    /// Flip shuffle, returning the new flag
    pub fn toggle_shuffle(&mut self) -> bool {
        self.set_shuffle(!self.state.is_shuffle);
        self.state.is_shuffle
    }

    /// Flip repeat, returning the new flag
    pub fn toggle_repeat(&mut self) -> bool {
        self.set_repeat(!self.state.is_repeat);
        self.state.is_repeat
    }

    /// Set shuffle; the playlist order is never touched
    pub fn set_shuffle(&mut self, enabled: bool) {
        if self.state.is_shuffle != enabled {
            self.state.is_shuffle = enabled;
            self.events.push(PlaybackEvent::ShuffleChanged { enabled });
        }
    }

    /// Set repeat
    pub fn set_repeat(&mut self, enabled: bool) {
        if self.state.is_repeat != enabled {
            self.state.is_repeat = enabled;
            self.events.push(PlaybackEvent::RepeatChanged { enabled });
        }
    }

    // ===== Views =====

    /// Switch to `view`, replacing the active playlist when `playlist` is set
    ///
    /// Ids outside the catalog are dropped. The current track and play
    /// intent are untouched; its index is re-resolved against the new list.
    pub fn set_view(&mut self, view: View, playlist: Option<Vec<TrackId>>) {
        self.state.current_view = view;
        if let Some(playlist) = playlist {
            let catalog = &self.catalog;
            self.state.active_playlist =
                playlist.into_iter().filter(|id| catalog.contains(id)).collect();
        }
        self.resolve_index();

        self.events.push(PlaybackEvent::ViewChanged {
            view,
            playlist_len: self.state.active_playlist.len(),
        });
        debug!(%view, tracks = self.state.active_playlist.len(), "View changed");
    }

    // ===== Sink events =====

    /// React to an event reported by a sink
    ///
    /// Returns false when the event came from a sink that is not current.
    pub fn on_sink_event(&mut self, event: &SinkEvent) -> bool {
        if self.state.current_track_id.as_ref() != Some(event.track_id()) {
            trace!(track = %event.track_id(), "Ignoring event from inactive sink");
            return false;
        }

        match event {
            SinkEvent::TimeUpdate { position, .. } => {
                let duration = self.progress().duration;
                self.events.push(PlaybackEvent::PositionUpdate {
                    position: *position,
                    duration,
                });
            }
            SinkEvent::DurationKnown { duration, .. } => {
                let position = self.progress().position;
                self.events.push(PlaybackEvent::PositionUpdate {
                    position,
                    duration: Some(*duration),
                });
            }
            SinkEvent::Ended { .. } => self.on_track_ended(),
        }
        true
    }

    // ===== State Queries =====

    /// Current state snapshot
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Position and duration of the current track
    pub fn progress(&self) -> Progress {
        self.state
            .current_track_id
            .as_ref()
            .and_then(|id| self.sinks.get(id))
            .map(|sink| Progress {
                position: sink.position(),
                duration: sink.duration(),
            })
            .unwrap_or_default()
    }

    /// Catalog the machine plays from
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Registered sinks
    pub fn sinks(&self) -> &SinkRegistry {
        &self.sinks
    }

    /// Registered sinks, for hosts that attach sinks late
    pub fn sinks_mut(&mut self) -> &mut SinkRegistry {
        &mut self.sinks
    }

    // ===== Events =====

    /// Queue an event raised outside the machine (likes)
    pub fn emit(&mut self, event: PlaybackEvent) {
        self.events.push(event);
    }

    /// Drain all pending events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        self.events.drain()
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        self.events.has_pending()
    }

    // ===== Internal =====

    fn pause_current(&mut self) {
        let Some(current) = self.state.current_track_id.as_ref() else {
            return;
        };
        if let Some(sink) = self.sinks.get_mut(current) {
            if !sink.is_paused() {
                sink.pause();
            }
        }
    }

    fn start_sink(&mut self, id: &TrackId) {
        let Some(sink) = self.sinks.get_mut(id) else {
            debug!(error = %PlaybackError::MissingSink(id.clone()), "Nothing to start");
            return;
        };
        if let Err(e) = sink.play() {
            self.reject(id, &e);
        }
    }

    fn reject(&mut self, id: &TrackId, cause: &CadenceError) {
        let err = PlaybackError::PlaybackRejected {
            track_id: id.clone(),
            reason: cause.to_string(),
        };
        warn!(error = %err, "Sink refused to play");
        self.events.push(PlaybackEvent::Error {
            message: err.to_string(),
        });
    }

    fn resolve_index(&mut self) {
        self.state.active_index = self
            .state
            .current_track_id
            .as_ref()
            .and_then(|current| self.state.active_playlist.iter().position(|id| id == current));
    }

    fn finish_transition(&mut self, before: PlaybackStatus) {
        let status = self.state.status();
        if status != before {
            self.events.push(PlaybackEvent::StateChanged { status });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSink;
    use cadence_core::{AudioSink, Track};

    fn machine_with(n: usize) -> (PlaybackMachine, Vec<HeadlessSink>) {
        let catalog = Catalog::new(
            (1..=n)
                .map(|i| Track::new(format!("m{i}"), format!("Song {i}"), "Artist"))
                .collect(),
        )
        .unwrap();

        let mut registry = SinkRegistry::new();
        let mut handles = Vec::new();
        for track in catalog.iter() {
            let sink = HeadlessSink::new(track.id.clone(), 100.0);
            handles.push(sink.clone());
            registry.insert(track.id.clone(), Box::new(sink));
        }

        let config = PlayerConfig {
            shuffle_seed: Some(11),
            ..PlayerConfig::default()
        };
        (PlaybackMachine::new(Arc::new(catalog), registry, &config), handles)
    }

    fn id(raw: &str) -> TrackId {
        TrackId::new(raw)
    }

    #[test]
    fn starts_idle_with_full_playlist() {
        let (machine, handles) = machine_with(3);
        assert_eq!(machine.state().status(), PlaybackStatus::Idle);
        assert_eq!(machine.state().active_playlist.len(), 3);
        assert_eq!(handles[0].volume(), 0.8);
        assert!(!machine.has_pending_events());
    }

    #[test]
    fn select_pauses_previous_and_plays_new() {
        let (mut machine, handles) = machine_with(3);

        machine.select_track(&id("m1")).unwrap();
        machine.select_track(&id("m2")).unwrap();

        assert!(handles[0].is_paused());
        assert!(!handles[1].is_paused());
        assert_eq!(machine.state().current_track_id, Some(id("m2")));
        assert_eq!(machine.state().active_index, Some(1));
    }

    #[test]
    fn select_rewinds_to_start() {
        let (mut machine, handles) = machine_with(2);
        let mut sink = handles[1].clone();
        sink.set_position(40.0);

        machine.select_track(&id("m2")).unwrap();
        assert_eq!(handles[1].position(), 0.0);
    }

    #[test]
    fn unknown_track_is_rejected() {
        let (mut machine, _) = machine_with(2);
        let before = machine.state().clone();

        let result = machine.select_track(&id("nope"));
        assert!(matches!(result, Err(PlaybackError::UnknownTrack(_))));
        assert_eq!(machine.state(), &before);
    }

    #[test]
    fn toggle_from_idle_starts_first_track() {
        let (mut machine, _) = machine_with(3);
        machine.toggle_play_pause();

        assert_eq!(machine.state().current_track_id, Some(id("m1")));
        assert!(machine.state().is_playing);
    }

    #[test]
    fn toggle_pauses_and_resumes() {
        let (mut machine, handles) = machine_with(3);
        machine.select_track(&id("m2")).unwrap();

        machine.toggle_play_pause();
        assert_eq!(machine.state().status(), PlaybackStatus::Loaded);
        assert!(handles[1].is_paused());

        machine.toggle_play_pause();
        assert_eq!(machine.state().status(), PlaybackStatus::Playing);
        assert!(!handles[1].is_paused());
    }

    #[test]
    fn rejected_play_keeps_optimistic_state() {
        let (mut machine, handles) = machine_with(2);
        handles[0].set_reject_play(true);

        machine.select_track(&id("m1")).unwrap();
        assert!(machine.state().is_playing);
        assert!(machine
            .drain_events()
            .iter()
            .any(|e| matches!(e, PlaybackEvent::Error { .. })));
    }

    #[test]
    fn next_stops_at_end_without_repeat() {
        let (mut machine, _) = machine_with(3);
        machine.select_track(&id("m3")).unwrap();

        assert!(!machine.advance(Direction::Next));
        assert_eq!(machine.state().current_track_id, Some(id("m3")));
    }

    #[test]
    fn next_wraps_with_repeat() {
        let (mut machine, _) = machine_with(3);
        machine.select_track(&id("m3")).unwrap();
        machine.toggle_repeat();

        assert!(machine.advance(Direction::Next));
        assert_eq!(machine.state().active_index, Some(0));
    }

    #[test]
    fn previous_always_wraps() {
        let (mut machine, _) = machine_with(4);
        machine.select_track(&id("m1")).unwrap();

        assert!(machine.advance(Direction::Previous));
        assert_eq!(machine.state().current_track_id, Some(id("m4")));
    }

    #[test]
    fn navigation_needs_current_track() {
        let (mut machine, _) = machine_with(3);
        assert!(!machine.advance(Direction::Next));
        assert!(!machine.advance(Direction::Previous));
    }

    #[test]
    fn shuffle_next_never_repeats_current() {
        let (mut machine, _) = machine_with(5);
        machine.toggle_shuffle();
        machine.select_track(&id("m3")).unwrap();

        for _ in 0..50 {
            let before = machine.state().current_track_id.clone();
            assert!(machine.advance(Direction::Next));
            assert_ne!(machine.state().current_track_id, before);
        }
    }

    #[test]
    fn ended_with_repeat_restarts_current() {
        let (mut machine, handles) = machine_with(3);
        machine.toggle_repeat();
        machine.select_track(&id("m2")).unwrap();

        let events = handles[1].tick(100.0);
        for event in &events {
            machine.on_sink_event(event);
        }

        assert_eq!(machine.state().current_track_id, Some(id("m2")));
        assert!(machine.state().is_playing);
        assert_eq!(handles[1].position(), 0.0);
        assert!(!handles[1].is_paused());
    }

    #[test]
    fn ended_on_last_track_stops() {
        let (mut machine, handles) = machine_with(2);
        machine.select_track(&id("m2")).unwrap();

        for event in handles[1].tick(100.0) {
            machine.on_sink_event(&event);
        }

        assert_eq!(machine.state().status(), PlaybackStatus::Loaded);
        assert_eq!(machine.state().current_track_id, Some(id("m2")));
    }

    #[test]
    fn ended_advances_to_next() {
        let (mut machine, handles) = machine_with(2);
        machine.select_track(&id("m1")).unwrap();

        for event in handles[0].tick(100.0) {
            machine.on_sink_event(&event);
        }
        assert_eq!(machine.state().current_track_id, Some(id("m2")));
    }

    #[test]
    fn events_from_other_sinks_are_ignored() {
        let (mut machine, _) = machine_with(2);
        machine.select_track(&id("m1")).unwrap();

        let handled = machine.on_sink_event(&SinkEvent::Ended { track_id: id("m2") });
        assert!(!handled);
        assert_eq!(machine.state().current_track_id, Some(id("m1")));
    }

    #[test]
    fn seek_uses_fraction_of_duration() {
        let (mut machine, handles) = machine_with(2);
        machine.select_track(&id("m1")).unwrap();

        assert!(machine.seek(0.25));
        assert_eq!(handles[0].position(), 25.0);

        assert!(machine.seek(7.0));
        assert_eq!(handles[0].position(), 100.0);
    }

    #[test]
    fn seek_without_duration_is_ignored() {
        let catalog = Catalog::new(vec![Track::new("m1", "One", "A")]).unwrap();
        let sink = HeadlessSink::unloaded("m1");
        let mut registry = SinkRegistry::new();
        registry.insert("m1", Box::new(sink.clone()));
        let mut machine =
            PlaybackMachine::new(Arc::new(catalog), registry, &PlayerConfig::default());

        machine.select_track(&id("m1")).unwrap();
        assert!(!machine.seek(0.5));
        assert_eq!(sink.position(), 0.0);
    }

    #[test]
    fn volume_applies_to_every_sink() {
        let (mut machine, handles) = machine_with(3);
        assert_eq!(machine.set_volume(1.5), 1.0);
        assert_eq!(machine.set_volume(0.3), 0.3);

        assert!(handles.iter().all(|sink| sink.volume() == 0.3));
        assert_eq!(machine.state().last_non_zero_volume, 0.3);
    }

    #[test]
    fn mute_round_trip() {
        let (mut machine, _) = machine_with(1);
        machine.set_volume(0.6);

        assert_eq!(machine.toggle_mute(), 0.0);
        assert!(machine.state().is_muted());
        assert_eq!(machine.toggle_mute(), 0.6);
    }

    #[test]
    fn view_change_keeps_current_track() {
        let (mut machine, _) = machine_with(4);
        machine.select_track(&id("m3")).unwrap();

        machine.set_view(View::Liked, Some(vec![id("m2"), id("m4")]));
        assert_eq!(machine.state().current_track_id, Some(id("m3")));
        assert!(machine.state().is_playing);
        assert_eq!(machine.state().active_index, None);

        // Unresolved: next starts the new playlist from the top
        assert!(machine.advance(Direction::Next));
        assert_eq!(machine.state().current_track_id, Some(id("m2")));
    }

    #[test]
    fn view_playlist_drops_unknown_ids() {
        let (mut machine, _) = machine_with(2);
        machine.set_view(View::Liked, Some(vec![id("ghost"), id("m2")]));
        assert_eq!(machine.state().active_playlist, vec![id("m2")]);
    }

    #[test]
    fn search_view_keeps_playlist() {
        let (mut machine, _) = machine_with(3);
        machine.set_view(View::Search, None);

        assert_eq!(machine.state().current_view, View::Search);
        assert_eq!(machine.state().active_playlist.len(), 3);
    }

    #[test]
    fn restore_never_plays() {
        let (mut machine, handles) = machine_with(3);
        machine.restore_track(&id("m2"), 42.0).unwrap();

        assert_eq!(machine.state().status(), PlaybackStatus::Loaded);
        assert_eq!(handles[1].play_calls(), 0);
        assert_eq!(machine.progress().position, 42.0);
    }

    #[test]
    fn missing_sink_is_a_no_op() {
        let catalog = Catalog::new(vec![Track::new("m1", "One", "A")]).unwrap();
        let mut machine = PlaybackMachine::new(
            Arc::new(catalog),
            SinkRegistry::new(),
            &PlayerConfig::default(),
        );

        machine.select_track(&id("m1")).unwrap();
        assert_eq!(machine.state().status(), PlaybackStatus::Idle);
    }
}
