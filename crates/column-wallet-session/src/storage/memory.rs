//! In-memory session store.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use column_wallet_core::traits::{SessionStore, StorageError};

/// In-memory store shared by every clone.
///
/// Clones model tabs of one origin: they all see the same slots.
/// Data is lost on restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create a new, empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots.
    ///
    /// # Errors
    /// Returns error if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self
            .slots
            .read()
            .map_err(|e| StorageError::Internal(e.to_string()))?
            .len())
    }

    /// Whether no slot is occupied.
    ///
    /// # Errors
    /// Returns error if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .slots
            .read()
            .map_err(|e| StorageError::Internal(e.to_string()))?
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots
            .write()
            .map_err(|e| StorageError::Internal(e.to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.slots
            .write()
            .map_err(|e| StorageError::Internal(e.to_string()))?
            .clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use column_wallet_core::Credentials;

    use super::*;
    use crate::storage::{ADDRESS_KEY, NETWORK_KEY, PersistedSession, persist_connection};

    #[test]
    fn test_clones_share_slots() {
        let a = MemoryStore::new();
        let b = a.clone();

        a.set(ADDRESS_KEY, "0xABC").unwrap();
        assert_eq!(b.get(ADDRESS_KEY).unwrap().as_deref(), Some("0xABC"));

        b.clear().unwrap();
        assert!(a.is_empty().unwrap());
    }

    #[test]
    fn test_persist_connection_without_network() {
        let store = MemoryStore::new();
        store.set(NETWORK_KEY, "devnet").unwrap();

        persist_connection(&store, &Credentials::new("0x1", "k"), None).unwrap();
        let persisted = PersistedSession::load(&store).unwrap();
        assert_eq!(persisted.address.as_deref(), Some("0x1"));
        assert_eq!(persisted.encryption_key.as_deref(), Some("k"));
        assert_eq!(persisted.network.as_deref(), Some("devnet"));
    }

    #[test]
    fn test_address_without_key_is_unauthenticated() {
        let store = MemoryStore::new();
        store.set(ADDRESS_KEY, "0x1").unwrap();

        let session = PersistedSession::load(&store).unwrap().to_session();
        assert!(!session.is_authenticated());
    }
}
