//! Text search over the catalog
//!
//! Matching is deliberately simple: the presentation layer shows whatever the
//! filter accepts, and each result is selected on its own.

use crate::types::Track;

/// Decides whether a track matches a search query
pub trait TrackFilter {
    /// Whether `track` should be shown for `query`
    fn matches(&self, track: &Track, query: &str) -> bool;
}

/// Case-insensitive substring match on title and artist
///
/// An empty (or whitespace-only) query matches every track.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringFilter;

impl TrackFilter for SubstringFilter {
    fn matches(&self, track: &Track, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        track.title.to_lowercase().contains(&needle) || track.artist.to_lowercase().contains(&needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_title_or_artist_ignoring_case() {
        let track = Track::new("m1", "Blinding Lights", "The Weeknd");
        let filter = SubstringFilter;

        assert!(filter.matches(&track, "blinding"));
        assert!(filter.matches(&track, "WEEK"));
        assert!(!filter.matches(&track, "dua"));
    }

    #[test]
    fn blank_query_matches_everything() {
        let track = Track::new("m1", "Blinding Lights", "The Weeknd");
        assert!(SubstringFilter.matches(&track, ""));
        assert!(SubstringFilter.matches(&track, "   "));
    }
}
