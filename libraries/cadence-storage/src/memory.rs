//! In-memory gateway

use std::collections::HashMap;

use cadence_core::PersistenceGateway;

/// Process-local key/value map
///
/// Cloning yields an independent copy, which is how tests simulate a page
/// reload: save with one player, hand a clone to a fresh one.
#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    entries: HashMap<String, String>,
}

impl MemoryGateway {
    /// Create an empty gateway
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove a key, returning its value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }
}

impl PersistenceGateway for MemoryGateway {
    fn get(&self, key: &str) -> cadence_core::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> cadence_core::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get() {
        let mut gateway = MemoryGateway::new();
        assert_eq!(gateway.get("k").unwrap(), None);

        gateway.set("k", "v1").unwrap();
        gateway.set("k", "v2").unwrap();

        assert_eq!(gateway.get("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(gateway.len(), 1);
    }

    #[test]
    fn clones_are_independent() {
        let mut original = MemoryGateway::new();
        original.set("k", "v").unwrap();

        let mut copy = original.clone();
        copy.set("k", "changed").unwrap();

        assert_eq!(original.get("k").unwrap().as_deref(), Some("v"));
    }
}
