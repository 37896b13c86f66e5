//! Session store implementations and the persisted slot layout.

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "file")]
pub mod file;

#[cfg(feature = "memory")]
pub use memory::MemoryStore;

#[cfg(feature = "file")]
pub use file::FileStore;

use column_wallet_core::{
    Credentials, Session,
    traits::{SessionStore, StorageError},
};

/// Slot holding the wallet address.
pub const ADDRESS_KEY: &str = "col_wallet_address";
/// Slot holding the network identifier.
pub const NETWORK_KEY: &str = "col_wallet_network";
/// Slot holding the wallet encryption key.
pub const ENCRYPTION_KEY_KEY: &str = "col_wallet_enc_key";

/// Raw contents of the three persisted slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedSession {
    pub address: Option<String>,
    pub network: Option<String>,
    pub encryption_key: Option<String>,
}

impl PersistedSession {
    /// Read all slots. Empty slots read as unset.
    ///
    /// # Errors
    /// Returns error if the store cannot be read.
    pub fn load(store: &dyn SessionStore) -> Result<Self, StorageError> {
        let slot = |key: &str| -> Result<Option<String>, StorageError> {
            Ok(store.get(key)?.filter(|v| !v.is_empty()))
        };
        Ok(Self {
            address: slot(ADDRESS_KEY)?,
            network: slot(NETWORK_KEY)?,
            encryption_key: slot(ENCRYPTION_KEY_KEY)?,
        })
    }

    /// Session described by the slots.
    ///
    /// An address without its key (or the reverse) does not authenticate.
    #[must_use]
    pub fn to_session(&self) -> Session {
        let credentials = match (&self.address, &self.encryption_key) {
            (Some(address), Some(key)) => Some(Credentials::new(address, key)),
            _ => None,
        };
        Session {
            credentials,
            network: self.network.clone(),
        }
    }
}

/// Write a connection to the store. The network slot is only written when present.
///
/// # Errors
/// Returns error if a slot cannot be written.
pub fn persist_connection(
    store: &dyn SessionStore,
    credentials: &Credentials,
    network: Option<&str>,
) -> Result<(), StorageError> {
    store.set(ADDRESS_KEY, &credentials.address)?;
    store.set(ENCRYPTION_KEY_KEY, &credentials.encryption_key)?;
    if let Some(network) = network {
        store.set(NETWORK_KEY, network)?;
    }
    Ok(())
}
