/// Static song catalog
use std::collections::HashMap;

use super::{Track, TrackId};
use crate::error::{CadenceError, Result};

/// Ordered, read-only collection of tracks
///
/// Insertion order is presentation order and defines the full playlist.
/// Lookups by id go through a position index built once at construction.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
    positions: HashMap<TrackId, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate identifiers
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(tracks.len());
        for (index, track) in tracks.iter().enumerate() {
            if positions.insert(track.id.clone(), index).is_some() {
                return Err(CadenceError::DuplicateTrack(track.id.clone()));
            }
        }
        Ok(Self { tracks, positions })
    }

    /// Parse a JSON array of tracks
    pub fn from_json(json: &str) -> Result<Self> {
        let tracks: Vec<Track> = serde_json::from_str(json)?;
        Self::new(tracks)
    }

    /// Get track by id
    pub fn get(&self, id: &TrackId) -> Option<&Track> {
        self.positions.get(id).map(|&index| &self.tracks[index])
    }

    /// Check whether the catalog contains `id`
    pub fn contains(&self, id: &TrackId) -> bool {
        self.positions.contains_key(id)
    }

    /// Catalog position of `id`
    pub fn position(&self, id: &TrackId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// All identifiers in catalog order
    pub fn ids(&self) -> Vec<TrackId> {
        self.tracks.iter().map(|t| t.id.clone()).collect()
    }

    /// Iterate tracks in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::new(vec![
            Track::new("m1", "One", "A"),
            Track::new("m2", "Two", "B"),
            Track::new("m3", "Three", "C"),
        ])
        .unwrap()
    }

    #[test]
    fn preserves_insertion_order() {
        let catalog = sample();
        let ids: Vec<&str> = catalog.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2", "m3"]);
        assert_eq!(catalog.position(&TrackId::new("m3")), Some(2));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = Catalog::new(vec![Track::new("m1", "One", "A"), Track::new("m1", "Again", "B")]);
        assert!(matches!(result, Err(CadenceError::DuplicateTrack(id)) if id.as_str() == "m1"));
    }

    #[test]
    fn lookup_of_missing_track() {
        let catalog = sample();
        assert!(catalog.get(&TrackId::new("m9")).is_none());
        assert!(!catalog.contains(&TrackId::new("m9")));
    }

    #[test]
    fn parses_json_catalog() {
        let catalog = Catalog::from_json(
            r#"[
                {"id": "m1", "title": "One", "artist": "A", "source": "audio/m1.mp3"},
                {"id": "m2", "title": "Two", "artist": "B"}
            ]"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get(&TrackId::new("m1")).and_then(|t| t.source.as_deref()),
            Some("audio/m1.mp3")
        );
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        assert!(matches!(
            Catalog::from_json("{not json"),
            Err(CadenceError::Serialization(_))
        ));
    }
}
