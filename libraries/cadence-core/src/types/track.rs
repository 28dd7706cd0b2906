/// Track domain type
use serde::{Deserialize, Serialize};

use super::TrackId;

/// A catalog entry
///
/// Immutable once loaded. `artwork` and `source` are opaque references
/// (typically URLs) that only the presentation layer and the sink factory
/// interpret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Artwork reference
    #[serde(default)]
    pub artwork: Option<String>,

    /// Audio source reference handed to the sink factory
    #[serde(default)]
    pub source: Option<String>,
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(id: impl Into<TrackId>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            artwork: None,
            source: None,
        }
    }

    /// Set artwork reference
    #[must_use]
    pub fn with_artwork(mut self, artwork: impl Into<String>) -> Self {
        self.artwork = Some(artwork.into());
        self
    }

    /// Set audio source reference
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}
