//! Like store
//!
//! Set of liked track identifiers, persisted on every toggle as
//! `{"likedTrackIds": [...]}`.

use std::collections::HashSet;

use cadence_core::{Catalog, PersistenceGateway, TrackId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{PlaybackError, Result};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LikedPayload {
    #[serde(default)]
    liked_track_ids: Vec<TrackId>,
}

/// Liked tracks
#[derive(Debug, Clone)]
pub struct LikeStore {
    key: String,
    liked: HashSet<TrackId>,
}

impl LikeStore {
    /// Empty store persisted under `key`
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            liked: HashSet::new(),
        }
    }

    /// Load the store saved under `key`
    ///
    /// A missing, unreadable or malformed payload yields an empty set.
    pub fn load(gateway: &dyn PersistenceGateway, key: impl Into<String>) -> Self {
        let mut store = Self::new(key);

        let raw = match gateway.get(&store.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return store,
            Err(e) => {
                warn!(key = %store.key, error = %e, "Failed to read liked tracks");
                return store;
            }
        };

        match serde_json::from_str::<LikedPayload>(&raw) {
            Ok(payload) => {
                store.liked = payload.liked_track_ids.into_iter().collect();
                debug!(count = store.liked.len(), "Loaded liked tracks");
            }
            Err(e) => warn!(key = %store.key, error = %e, "Discarding malformed liked tracks"),
        }
        store
    }

    /// Write the set to `gateway`
    ///
    /// Ids are written in catalog order, ids outside the catalog after them
    /// sorted, so the stored value is stable across runs.
    pub fn save(
        &self,
        gateway: &mut dyn PersistenceGateway,
        catalog: &Catalog,
    ) -> Result<()> {
        let mut ids: Vec<TrackId> = catalog
            .iter()
            .filter(|track| self.liked.contains(&track.id))
            .map(|track| track.id.clone())
            .collect();

        let mut outside: Vec<TrackId> = self
            .liked
            .iter()
            .filter(|id| !catalog.contains(id))
            .cloned()
            .collect();
        outside.sort();
        ids.extend(outside);

        let payload = serde_json::to_string(&LikedPayload {
            liked_track_ids: ids,
        })
        .map_err(|e| PlaybackError::Storage(e.to_string()))?;
        gateway.set(&self.key, &payload)?;
        Ok(())
    }

    /// Flip membership of `id`, returning whether it is now liked
    pub fn toggle(&mut self, id: &TrackId) -> bool {
        if self.liked.remove(id) {
            false
        } else {
            self.liked.insert(id.clone());
            true
        }
    }

    /// Whether `id` is liked
    pub fn is_liked(&self, id: &TrackId) -> bool {
        self.liked.contains(id)
    }

    /// The liked set
    pub fn liked(&self) -> &HashSet<TrackId> {
        &self.liked
    }

    /// Number of liked tracks
    pub fn len(&self) -> usize {
        self.liked.len()
    }

    /// Whether nothing is liked
    pub fn is_empty(&self) -> bool {
        self.liked.is_empty()
    }

    /// Storage key
    pub fn key(&self) -> &str {
        &self.key
    }
}
