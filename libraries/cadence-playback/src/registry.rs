//! Audio sink registry
//!
//! Maps track identifiers to their sinks. The state machine only ever reaches
//! a sink through its id; sinks are never compared by reference.

use std::collections::HashMap;

use cadence_core::{AudioSink, TrackId};

/// Identifier-keyed collection of audio sinks
#[derive(Default)]
pub struct SinkRegistry {
    sinks: HashMap<TrackId, Box<dyn AudioSink>>,
}

impl SinkRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the sink for `id`, returning any sink it replaces
    pub fn insert(
        &mut self,
        id: impl Into<TrackId>,
        sink: Box<dyn AudioSink>,
    ) -> Option<Box<dyn AudioSink>> {
        self.sinks.insert(id.into(), sink)
    }

    /// Sink for `id`
    pub fn get(&self, id: &TrackId) -> Option<&dyn AudioSink> {
        self.sinks.get(id).map(|sink| sink.as_ref())
    }

    /// Mutable sink for `id`
    pub fn get_mut(&mut self, id: &TrackId) -> Option<&mut (dyn AudioSink + 'static)> {
        self.sinks.get_mut(id).map(|sink| sink.as_mut())
    }

    /// Whether a sink is registered for `id`
    pub fn contains(&self, id: &TrackId) -> bool {
        self.sinks.contains_key(id)
    }

    /// Apply one volume to every sink
    pub fn set_volume_all(&mut self, volume: f64) {
        for sink in self.sinks.values_mut() {
            sink.set_volume(volume);
        }
    }

    /// Registered identifiers (unordered)
    pub fn ids(&self) -> impl Iterator<Item = &TrackId> {
        self.sinks.keys()
    }

    /// Number of registered sinks
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether no sink is registered
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl std::fmt::Debug for SinkRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkRegistry")
            .field("tracks", &self.sinks.keys().collect::<Vec<_>>())
            .finish()
    }
}
