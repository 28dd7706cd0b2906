//! Browser `localStorage` gateway

use cadence_core::{CadenceError, PersistenceGateway};
use gloo_storage::{LocalStorage, Storage};

/// Gateway over `window.localStorage`
///
/// Values are stored as raw strings, the same layout the page wrote before
/// the player moved to wasm.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageGateway;

impl PersistenceGateway for LocalStorageGateway {
    fn get(&self, key: &str) -> cadence_core::Result<Option<String>> {
        let storage = LocalStorage::raw();
        storage
            .get_item(key)
            .map_err(|e| CadenceError::storage(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> cadence_core::Result<()> {
        let storage = LocalStorage::raw();
        storage
            .set_item(key, value)
            .map_err(|e| CadenceError::storage(format!("{e:?}")))
    }
}
