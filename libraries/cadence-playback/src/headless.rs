//! Headless audio sink
//!
//! Simulates a media element without producing sound: a position that moves
//! when `tick` is called, a known (or not yet known) duration, and the same
//! events a browser would fire. Used by the CLI and by tests.

use std::cell::RefCell;
use std::rc::Rc;

use cadence_core::{AudioSink, CadenceError, SinkEvent, TrackId};

use crate::types::DEFAULT_VOLUME;

#[derive(Debug)]
struct ElementState {
    position: f64,
    duration: Option<f64>,
    paused: bool,
    volume: f64,
    play_calls: u32,
    pause_calls: u32,
    reject_play: bool,
}

/// Simulated media element
///
/// Clones share the same element, so a test can keep one handle while the
/// registry owns another.
#[derive(Debug, Clone)]
pub struct HeadlessSink {
    track_id: TrackId,
    state: Rc<RefCell<ElementState>>,
}

impl HeadlessSink {
    /// Element with known duration in seconds
    pub fn new(track_id: impl Into<TrackId>, duration: f64) -> Self {
        let sink = Self::unloaded(track_id);
        sink.state.borrow_mut().duration = Some(duration);
        sink
    }

    /// Element whose metadata has not loaded yet
    pub fn unloaded(track_id: impl Into<TrackId>) -> Self {
        Self {
            track_id: track_id.into(),
            state: Rc::new(RefCell::new(ElementState {
                position: 0.0,
                duration: None,
                paused: true,
                volume: DEFAULT_VOLUME,
                play_calls: 0,
                pause_calls: 0,
                reject_play: false,
            })),
        }
    }

    /// Track this element plays
    pub fn track_id(&self) -> &TrackId {
        &self.track_id
    }

    /// Finish loading metadata, returning the `DurationKnown` event
    pub fn load_metadata(&self, duration: f64) -> SinkEvent {
        self.state.borrow_mut().duration = Some(duration);
        SinkEvent::DurationKnown {
            track_id: self.track_id.clone(),
            duration,
        }
    }

    /// Make subsequent `play` calls fail, like an autoplay-blocked page
    pub fn set_reject_play(&self, reject: bool) {
        self.state.borrow_mut().reject_play = reject;
    }

    /// Advance the clock by `seconds`
    ///
    /// Returns the events the element would fire: a `TimeUpdate` while
    /// playing, followed by `Ended` once the position reaches the duration.
    /// A paused element, or one without metadata, fires nothing.
    pub fn tick(&self, seconds: f64) -> Vec<SinkEvent> {
        let mut state = self.state.borrow_mut();
        let Some(duration) = state.duration else {
            return Vec::new();
        };
        if state.paused || seconds <= 0.0 {
            return Vec::new();
        }

        state.position = (state.position + seconds).min(duration);
        let mut events = vec![SinkEvent::TimeUpdate {
            track_id: self.track_id.clone(),
            position: state.position,
        }];

        if state.position >= duration {
            state.paused = true;
            events.push(SinkEvent::Ended {
                track_id: self.track_id.clone(),
            });
        }
        events
    }

    /// Current element volume
    pub fn volume(&self) -> f64 {
        self.state.borrow().volume
    }

    /// Number of `play` calls received
    pub fn play_calls(&self) -> u32 {
        self.state.borrow().play_calls
    }

    /// Number of `pause` calls received
    pub fn pause_calls(&self) -> u32 {
        self.state.borrow().pause_calls
    }
}

impl AudioSink for HeadlessSink {
    fn play(&mut self) -> cadence_core::Result<()> {
        let mut state = self.state.borrow_mut();
        state.play_calls += 1;
        if state.reject_play {
            return Err(CadenceError::playback_rejected(
                "play() request was blocked by the user agent",
            ));
        }
        // Playing an ended element starts over
        if matches!(state.duration, Some(d) if state.position >= d) {
            state.position = 0.0;
        }
        state.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        let mut state = self.state.borrow_mut();
        state.pause_calls += 1;
        state.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.state.borrow().paused
    }

    fn position(&self) -> f64 {
        self.state.borrow().position
    }

    fn set_position(&mut self, seconds: f64) {
        let mut state = self.state.borrow_mut();
        let upper = state.duration.unwrap_or(f64::MAX);
        state.position = if seconds.is_finite() {
            seconds.clamp(0.0, upper)
        } else {
            0.0
        };
    }

    fn duration(&self) -> Option<f64> {
        self.state.borrow().duration.filter(|d| d.is_finite())
    }

    fn set_volume(&mut self, volume: f64) {
        self.state.borrow_mut().volume = volume;
    }
}
