//! WASM bindings for cadence-playback
//!
//! Runs the player in a browser: one `<audio>` element per track, session
//! and likes in `localStorage`, commands as JSON objects.

pub mod player;
pub mod sink;

pub use player::WasmPlayer;
pub use sink::HtmlAudioSink;
