//! Property-based tests for catalog and formatting helpers

use cadence_core::{format_duration, Catalog, SubstringFilter, Track, TrackFilter, TrackId};
use proptest::prelude::*;
use std::collections::HashSet;

fn unique_ids() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[a-z][a-z0-9]{0,6}", 1..40)
        .prop_map(|set| set.into_iter().collect::<Vec<_>>())
}

proptest! {
    /// Property: every track is found at its insertion position
    #[test]
    fn positions_follow_insertion_order(ids in unique_ids()) {
        let tracks: Vec<Track> = ids.iter().map(|id| Track::new(id.as_str(), "Title", "Artist")).collect();
        let catalog = Catalog::new(tracks).unwrap();

        for (index, id) in ids.iter().enumerate() {
            prop_assert_eq!(catalog.position(&TrackId::new(id.as_str())), Some(index));
        }
        prop_assert_eq!(catalog.ids().len(), ids.len());
    }

    /// Property: formatted durations always look like m:ss
    #[test]
    fn format_duration_shape(seconds in -1000.0f64..100_000.0) {
        let text = format_duration(seconds);
        let (minutes, secs) = text.split_once(':').unwrap();

        prop_assert!(minutes.parse::<u64>().is_ok());
        prop_assert_eq!(secs.len(), 2);
        prop_assert!(secs.parse::<u64>().unwrap() < 60);
    }

    /// Property: a track always matches a query cut from its own title
    #[test]
    fn title_fragments_match(title in "[A-Za-z ]{1,30}", start in 0usize..30, len in 1usize..10) {
        let track = Track::new("m1", title.clone(), "Someone");
        let start = start.min(title.len() - 1);
        let end = (start + len).min(title.len());
        let fragment = &title[start..end];

        prop_assert!(SubstringFilter.matches(&track, fragment));
    }
}

#[test]
fn search_keeps_catalog_order() {
    let catalog = Catalog::new(vec![
        Track::new("m1", "Night Drive", "Chromatics"),
        Track::new("m2", "Levitating", "Dua Lipa"),
        Track::new("m3", "Nightcall", "Kavinsky"),
    ])
    .unwrap();

    let hits: Vec<&str> = catalog
        .iter()
        .filter(|t| SubstringFilter.matches(t, "night"))
        .map(|t| t.id.as_str())
        .collect();

    assert_eq!(hits, vec!["m1", "m3"]);

    let unique: HashSet<&str> = hits.into_iter().collect();
    assert_eq!(unique.len(), 2);
}
