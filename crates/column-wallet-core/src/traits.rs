//! Collaborator traits: persisted store, cross-tab channel, tab host and signer.

use std::sync::Arc;

use futures::stream::BoxStream;
use thiserror::Error;
use url::Url;

use crate::{BroadcastMessage, transfer::TransactionPayload};

/// Storage error.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Corrupt store: {0}")]
    Corrupt(String),
    #[error("Storage error: {0}")]
    Internal(String),
}

/// Origin-wide persisted key-value store.
///
/// Shared by every tab of the origin. Writes are plain overwrites; there is
/// no locking across tabs.
pub trait SessionStore: Send + Sync {
    /// Read a slot.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a slot.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove every slot.
    fn clear(&self) -> Result<(), StorageError>;
}

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn clear(&self) -> Result<(), StorageError> {
        (**self).clear()
    }
}

/// Signing error.
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("Wallet not connected")]
    NotConnected,
    #[error("Invalid redirect URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Payload encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Tab-local signing capability backed by the external wallet.
///
/// Signing itself happens in the wallet app; this only hands out redirect
/// URLs and holds the imported key.
pub trait SigningCapability: Send + Sync {
    /// Redirect URL asking the wallet to connect.
    ///
    /// # Errors
    /// Returns error if the URL cannot be built.
    fn connect(&self) -> Result<Url, SigningError>;

    /// Redirect URL asking the wallet to sign and submit `payload`.
    ///
    /// # Errors
    /// Returns error if no key was imported or the URL cannot be built.
    fn sign_and_submit_transaction(&self, payload: &TransactionPayload)
    -> Result<Url, SigningError>;

    /// Install an encryption key returned by the wallet.
    fn import_wallet_key(&self, key: &str);
}

/// Same-origin publish/subscribe channel between tabs.
pub trait CrossTabChannel: Send + Sync {
    /// Fire-and-forget publish to every other tab.
    fn publish(&self, message: &BroadcastMessage);

    /// Validated messages from other tabs.
    ///
    /// The stream ends once the channel is closed.
    fn subscribe(&self) -> BoxStream<'static, BroadcastMessage>;

    /// Release the subscription.
    fn close(&self);
}

/// Visible location of a tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabLocation {
    pub path: String,
    pub query: String,
    pub fragment: String,
}

impl TabLocation {
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        Self {
            path: url.path().to_string(),
            query: url.query().unwrap_or_default().to_string(),
            fragment: url.fragment().unwrap_or_default().to_string(),
        }
    }
}

/// The browser tab a session lives in.
pub trait TabHost: Send + Sync {
    /// Current location.
    fn location(&self) -> TabLocation;

    /// Replace the visible URL without adding a history entry.
    fn replace_url(&self, path: &str);

    /// Whether another window opened this tab.
    fn has_opener(&self) -> bool;

    /// Number of entries in the tab's navigation history.
    fn history_length(&self) -> usize;

    /// Attempt to close the tab.
    fn close(&self);
}
