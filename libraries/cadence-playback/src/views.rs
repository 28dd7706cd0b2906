//! Playlist view selector
//!
//! Derives the active playlist from the current view. Pure: reads the
//! catalog and the liked set, owns neither.

use std::collections::HashSet;

use cadence_core::{Catalog, TrackId, View};

/// Playlist that next/previous should navigate in `view`
///
/// - `Home` → whole catalog, catalog order
/// - `Liked` → liked tracks, still in catalog order so navigation is
///   deterministic
/// - `Search` → `None`: results are selected one by one, the active
///   playlist stays whatever it was
pub fn playlist_for(view: View, catalog: &Catalog, liked: &HashSet<TrackId>) -> Option<Vec<TrackId>> {
    match view {
        View::Home => Some(catalog.ids()),
        View::Liked => Some(
            catalog
                .iter()
                .filter(|track| liked.contains(&track.id))
                .map(|track| track.id.clone())
                .collect(),
        ),
        View::Search => None,
    }
}
