//! WASM-compatible Player wrapper

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use cadence_core::{Catalog, SinkEvent, TrackId};
use cadence_storage::LocalStorageGateway;
use js_sys::Function;
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlAudioElement;

use super::sink::HtmlAudioSink;
use crate::{Command, Player, PlayerConfig, SharedPlayer, SinkRegistry};

type StateCallback = Rc<RefCell<Option<Function>>>;

/// Window events that save the session
const PAGE_EXIT_EVENTS: [&str; 2] = ["pagehide", "beforeunload"];

/// Browser player
///
/// This wraps the core `Player` with a JavaScript-friendly API. Media
/// element events are forwarded to the player as they fire, and the
/// session is saved when the page goes away.
#[wasm_bindgen]
pub struct WasmPlayer {
    inner: SharedPlayer,
    on_state_change: StateCallback,
    // Keeps the element listeners alive
    _listeners: Vec<Closure<dyn FnMut()>>,
    page_listeners: Vec<(&'static str, Closure<dyn FnMut()>)>,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Build a player from catalog JSON and an optional `PlayerConfig` object
    #[wasm_bindgen(constructor)]
    pub fn new(catalog_json: &str, config: JsValue) -> Result<WasmPlayer, JsValue> {
        console_error_panic_hook::set_once();

        let catalog = Catalog::from_json(catalog_json).map_err(to_js)?;
        let config: PlayerConfig = if config.is_undefined() || config.is_null() {
            PlayerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };

        let mut sinks = SinkRegistry::new();
        let mut elements = Vec::new();
        for track in catalog.iter() {
            let Some(src) = &track.source else {
                debug!(track = %track.id, "Track has no audio source");
                continue;
            };
            let sink = HtmlAudioSink::new(track.id.clone(), src)?;
            elements.push((track.id.clone(), sink.element().clone()));
            sinks.insert(track.id.clone(), Box::new(sink));
        }

        let inner = SharedPlayer::new(Player::new(
            Arc::new(catalog),
            sinks,
            Box::new(LocalStorageGateway),
            config,
        ));

        // Runs after the player borrow is released, so the callback may
        // call back into `state()`, `isLiked()` or `progress()`
        let on_state_change: StateCallback = Rc::new(RefCell::new(None));
        let callback = Rc::clone(&on_state_change);
        inner.subscribe(move |state| {
            let Some(cb) = callback.borrow().clone() else {
                return;
            };
            if let Ok(value) = serde_wasm_bindgen::to_value(state) {
                cb.call1(&JsValue::NULL, &value).ok();
            }
        });

        let mut listeners = Vec::new();
        for (track_id, element) in elements {
            listeners.extend(wire_element(&inner, track_id, &element));
        }

        Ok(Self {
            page_listeners: wire_page_exit(&inner)?,
            inner,
            on_state_change,
            _listeners: listeners,
        })
    }

    /// Apply a command object such as `{type: "selectTrack", value: "m2"}`
    ///
    /// Resolves to the new state; throws for unknown tracks.
    pub fn dispatch(&self, command: JsValue) -> Result<JsValue, JsValue> {
        let command: Command = serde_wasm_bindgen::from_value(command)?;
        let state = self.inner.dispatch(command).map_err(to_js)?;
        Ok(serde_wasm_bindgen::to_value(&state)?)
    }

    /// Current state
    pub fn state(&self) -> Result<JsValue, JsValue> {
        self.inner
            .with(|player| serde_wasm_bindgen::to_value(player.state()))
            .map_err(Into::into)
    }

    /// Position, duration and fraction of the current track
    pub fn progress(&self) -> Result<JsValue, JsValue> {
        let progress = self.inner.with(Player::progress);
        Ok(serde_wasm_bindgen::to_value(&progress)?)
    }

    /// Save the session
    ///
    /// Also runs on `pagehide` and `beforeunload`.
    pub fn unload(&self) {
        self.inner.with_mut(Player::unload);
    }

    /// Tracks matching `query`
    pub fn search(&self, query: &str) -> Result<JsValue, JsValue> {
        self.inner
            .with(|player| serde_wasm_bindgen::to_value(&player.search(query)))
            .map_err(Into::into)
    }

    /// Whether `track_id` is liked
    #[wasm_bindgen(js_name = isLiked)]
    pub fn is_liked(&self, track_id: &str) -> bool {
        self.inner
            .with(|player| player.is_liked(&TrackId::new(track_id)))
    }

    /// Pending playback events since the last call
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&self) -> Result<JsValue, JsValue> {
        let events = self.inner.with_mut(Player::drain_events);
        Ok(serde_wasm_bindgen::to_value(&events)?)
    }

    /// Register state change callback
    #[wasm_bindgen(js_name = onStateChange)]
    pub fn on_state_change(&self, callback: Function) {
        *self.on_state_change.borrow_mut() = Some(callback);
    }
}

impl Drop for WasmPlayer {
    fn drop(&mut self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        for (event, listener) in &self.page_listeners {
            window
                .remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
                .ok();
        }
    }
}

/// `m:ss` label for a number of seconds
#[wasm_bindgen(js_name = formatDuration)]
pub fn format_duration(seconds: f64) -> String {
    cadence_core::format_duration(seconds)
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn wire_page_exit(
    player: &SharedPlayer,
) -> Result<Vec<(&'static str, Closure<dyn FnMut()>)>, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let mut listeners = Vec::new();
    for event in PAGE_EXIT_EVENTS {
        let player = player.clone();
        let save = Closure::wrap(Box::new(move || {
            player.with_mut(Player::unload);
        }) as Box<dyn FnMut()>);
        window.add_event_listener_with_callback(event, save.as_ref().unchecked_ref())?;
        listeners.push((event, save));
    }
    Ok(listeners)
}

fn wire_element(
    player: &SharedPlayer,
    track_id: TrackId,
    element: &HtmlAudioElement,
) -> Vec<Closure<dyn FnMut()>> {
    let ended = {
        let player = player.clone();
        let track_id = track_id.clone();
        Closure::wrap(Box::new(move || {
            forward(&player, &SinkEvent::Ended {
                track_id: track_id.clone(),
            });
        }) as Box<dyn FnMut()>)
    };
    element.set_onended(Some(ended.as_ref().unchecked_ref()));

    let time_update = {
        let player = player.clone();
        let track_id = track_id.clone();
        let element = element.clone();
        Closure::wrap(Box::new(move || {
            forward(&player, &SinkEvent::TimeUpdate {
                track_id: track_id.clone(),
                position: element.current_time(),
            });
        }) as Box<dyn FnMut()>)
    };
    element.set_ontimeupdate(Some(time_update.as_ref().unchecked_ref()));

    let metadata = {
        let player = player.clone();
        let element = element.clone();
        Closure::wrap(Box::new(move || {
            let duration = element.duration();
            if duration.is_finite() {
                forward(&player, &SinkEvent::DurationKnown {
                    track_id: track_id.clone(),
                    duration,
                });
            }
        }) as Box<dyn FnMut()>)
    };
    element.set_onloadedmetadata(Some(metadata.as_ref().unchecked_ref()));

    vec![ended, time_update, metadata]
}

fn forward(player: &SharedPlayer, event: &SinkEvent) {
    if player.handle_sink_event(event).is_none() {
        debug!(track = %event.track_id(), "Media event not applied");
    }
}
