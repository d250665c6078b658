//! In-memory store backend.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{Store, StoreError, StoreKey};

/// Store backed by a process-local map.
///
/// Used by tests and by sessions that should not outlive the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<StoreKey, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently holding a value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Returns true if no key holds a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("Lock poisoned".to_string())
}

impl Store for MemoryStore {
    fn read(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        let guard = self.entries.read().map_err(|_| poisoned())?;
        Ok(guard.get(&key).cloned())
    }

    fn write(&self, key: StoreKey, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .map_err(|_| poisoned())?
            .insert(key, value.to_owned());
        Ok(())
    }

    fn remove(&self, key: StoreKey) -> Result<(), StoreError> {
        self.entries.write().map_err(|_| poisoned())?.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_independent() {
        let store = MemoryStore::new();
        store.write(StoreKey::Cart, "[1]").unwrap();
        store.write(StoreKey::Wishlist, "[2]").unwrap();

        assert_eq!(store.read(StoreKey::Cart).unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.read(StoreKey::Wishlist).unwrap().as_deref(), Some("[2]"));
        assert_eq!(store.len(), 2);

        store.remove(StoreKey::Cart).unwrap();
        store.remove(StoreKey::Cart).unwrap();
        assert!(store.read(StoreKey::Cart).unwrap().is_none());
        assert_eq!(store.len(), 1);
    }
}
