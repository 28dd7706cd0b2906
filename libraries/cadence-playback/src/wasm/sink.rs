//! `AudioSink` over an HTML media element

use cadence_core::{AudioSink, CadenceError, TrackId};
use tracing::warn;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

/// Audio element playing one catalog track
#[derive(Debug, Clone)]
pub struct HtmlAudioSink {
    track_id: TrackId,
    element: HtmlAudioElement,
}

impl HtmlAudioSink {
    /// Create a detached `<audio>` element for `src`
    pub fn new(track_id: impl Into<TrackId>, src: &str) -> Result<Self, JsValue> {
        let element = HtmlAudioElement::new_with_src(src)?;
        element.set_preload("metadata");
        Ok(Self::from_element(track_id, element))
    }

    /// Wrap an element that already exists in the page
    pub fn from_element(track_id: impl Into<TrackId>, element: HtmlAudioElement) -> Self {
        Self {
            track_id: track_id.into(),
            element,
        }
    }

    /// Track this element plays
    pub fn track_id(&self) -> &TrackId {
        &self.track_id
    }

    /// Underlying element, for wiring event listeners
    pub fn element(&self) -> &HtmlAudioElement {
        &self.element
    }
}

impl AudioSink for HtmlAudioSink {
    fn play(&mut self) -> cadence_core::Result<()> {
        let promise = self
            .element
            .play()
            .map_err(|e| CadenceError::playback_rejected(format!("{e:?}")))?;

        // Autoplay policy rejections arrive later through the promise
        let track_id = self.track_id.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                warn!(track = %track_id, error = ?e, "play() was rejected");
            }
        });
        Ok(())
    }

    fn pause(&mut self) {
        if let Err(e) = self.element.pause() {
            warn!(track = %self.track_id, error = ?e, "pause() failed");
        }
    }

    fn is_paused(&self) -> bool {
        self.element.paused()
    }

    fn position(&self) -> f64 {
        self.element.current_time()
    }

    fn set_position(&mut self, seconds: f64) {
        self.element.set_current_time(seconds);
    }

    fn duration(&self) -> Option<f64> {
        let duration = self.element.duration();
        duration.is_finite().then_some(duration)
    }

    fn set_volume(&mut self, volume: f64) {
        self.element.set_volume(volume);
    }
}
