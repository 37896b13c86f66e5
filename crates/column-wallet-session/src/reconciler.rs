//! Session reconciler: the per-tab wallet session state machine.
//!
//! Runs once per page load against the callback parameters and once per
//! inbound broadcast message. Callback transitions return the messages to
//! publish; inbound transitions never do, so messages cannot echo between tabs.

use column_wallet_core::{
    AuthState, BroadcastMessage, CallbackParameters, Credentials, LogEntry, LogKind, Session,
    TransactionRecord,
    traits::{SessionStore, SigningCapability},
};

use crate::storage::{PersistedSession, persist_connection};

/// Owner of one tab's in-memory session.
pub struct SessionReconciler<S, W>
where
    S: SessionStore,
    W: SigningCapability,
{
    store: S,
    signer: W,
    session: Session,
    log: Option<LogEntry>,
    last_tx: Option<TransactionRecord>,
}

impl<S, W> SessionReconciler<S, W>
where
    S: SessionStore,
    W: SigningCapability,
{
    /// Build the reconciler from persisted state.
    ///
    /// A persisted key is installed into the signer before anything else
    /// runs. An unreadable store hydrates as empty.
    #[must_use]
    pub fn hydrate(store: S, signer: W) -> Self {
        let persisted = PersistedSession::load(&store).unwrap_or_else(|e| {
            tracing::warn!("Failed to read persisted session: {e}");
            PersistedSession::default()
        });

        if let Some(key) = &persisted.encryption_key {
            signer.import_wallet_key(key);
        }

        let session = persisted.to_session();
        tracing::debug!(state = ?session.state(), "Hydrated session");

        Self {
            store,
            signer,
            session,
            log: None,
            last_tx: None,
        }
    }

    /// Apply the callback parameters of a page load.
    ///
    /// Log, connect and transaction transitions are checked in that order
    /// against the same parameters. Returns one message per transition that
    /// fired, to be published to other tabs.
    pub fn apply_callback(&mut self, params: &CallbackParameters) -> Vec<BroadcastMessage> {
        let mut outbound = Vec::new();
        if params.is_empty() {
            return outbound;
        }

        if let Some((status, message)) = params.status_log() {
            match LogKind::from_status(status) {
                Some(kind) => {
                    let entry = LogEntry::new(message, kind);
                    tracing::info!(%kind, "Wallet log: {message}");
                    self.log = Some(entry.clone());
                    outbound.push(BroadcastMessage::Log(entry));
                }
                None => tracing::debug!(status, "Ignoring log with unknown status"),
            }
        }

        if let Some((address, key)) = params.connection() {
            let credentials = Credentials::new(address, key);
            let network = params.network().map(str::to_string);
            self.connect(credentials.clone(), network.clone());
            outbound.push(BroadcastMessage::Connect {
                credentials,
                network,
            });
        }

        if let Some(hash) = params.transaction_hash() {
            let record = TransactionRecord::new(hash);
            tracing::info!(hash, "Transaction completed");
            self.last_tx = Some(record.clone());
            outbound.push(BroadcastMessage::TxSuccess(record));
        }

        outbound
    }

    /// Apply a message published by another tab. Never re-publishes.
    pub fn apply_broadcast(&mut self, message: BroadcastMessage) {
        tracing::debug!(kind = message.kind(), "Received broadcast");
        match message {
            BroadcastMessage::Connect {
                credentials,
                network,
            } => self.connect(credentials, network),
            BroadcastMessage::Log(entry) => self.log = Some(entry),
            BroadcastMessage::TxSuccess(record) => self.last_tx = Some(record),
        }
    }

    /// Forget the wallet in this tab and wipe persisted state.
    ///
    /// Other tabs are not told.
    pub fn logout(&mut self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear persisted session: {e}");
        }
        self.session.clear();
        self.log = None;
        tracing::info!("Logged out");
    }

    fn connect(&mut self, credentials: Credentials, network: Option<String>) {
        self.signer.import_wallet_key(&credentials.encryption_key);
        if let Err(e) = persist_connection(&self.store, &credentials, network.as_deref()) {
            tracing::warn!("Failed to persist connection: {e}");
        }
        tracing::info!(address = %credentials.address, network = ?network, "Wallet connected");
        self.session.connect(credentials, network);
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub const fn state(&self) -> AuthState {
        self.session.state()
    }

    #[must_use]
    pub const fn log(&self) -> Option<&LogEntry> {
        self.log.as_ref()
    }

    #[must_use]
    pub const fn last_transaction(&self) -> Option<&TransactionRecord> {
        self.last_tx.as_ref()
    }

    #[must_use]
    pub const fn signer(&self) -> &W {
        &self.signer
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use column_wallet_core::{
        TransactionPayload,
        traits::{SigningError, StorageError},
    };
    use url::Url;

    use super::*;
    use crate::storage::{ADDRESS_KEY, ENCRYPTION_KEY_KEY, MemoryStore, NETWORK_KEY};

    /// Signer that records imported keys.
    #[derive(Clone, Default)]
    struct RecordingSigner {
        imported: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingSigner {
        fn imported(&self) -> Vec<String> {
            self.imported.lock().unwrap().clone()
        }
    }

    impl SigningCapability for RecordingSigner {
        fn connect(&self) -> Result<Url, SigningError> {
            Ok(Url::parse("column://connect")?)
        }

        fn sign_and_submit_transaction(
            &self,
            _payload: &TransactionPayload,
        ) -> Result<Url, SigningError> {
            Ok(Url::parse("column://sign")?)
        }

        fn import_wallet_key(&self, key: &str) {
            self.imported.lock().unwrap().push(key.to_string());
        }
    }

    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Internal("broken".into()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Internal("broken".into()))
        }
        fn clear(&self) -> Result<(), StorageError> {
            Err(StorageError::Internal("broken".into()))
        }
    }

    fn reconciler() -> (SessionReconciler<MemoryStore, RecordingSigner>, MemoryStore, RecordingSigner) {
        let store = MemoryStore::new();
        let signer = RecordingSigner::default();
        let reconciler = SessionReconciler::hydrate(store.clone(), signer.clone());
        (reconciler, store, signer)
    }

    #[test]
    fn test_hydrate_installs_persisted_key() {
        let store = MemoryStore::new();
        store.set(ADDRESS_KEY, "0xABC").unwrap();
        store.set(ENCRYPTION_KEY_KEY, "KEY123").unwrap();
        let signer = RecordingSigner::default();

        let reconciler = SessionReconciler::hydrate(store, signer.clone());
        assert_eq!(signer.imported(), vec!["KEY123"]);
        assert_eq!(reconciler.state(), AuthState::Authenticated);
        assert_eq!(reconciler.session().address(), Some("0xABC"));
        assert_eq!(reconciler.session().network(), None);
    }

    #[test]
    fn test_log_callback() {
        let (mut reconciler, store, _) = reconciler();
        let outbound = reconciler.apply_callback(&CallbackParameters::parse("?status=error&log=Declined", ""));

        assert_eq!(reconciler.log(), Some(&LogEntry::new("Declined", LogKind::Error)));
        assert_eq!(reconciler.session(), &Session::default());
        assert!(store.is_empty().unwrap());
        assert_eq!(
            outbound,
            vec![BroadcastMessage::Log(LogEntry::new("Declined", LogKind::Error))]
        );
    }

    #[test]
    fn test_log_requires_both_fields() {
        let (mut reconciler, _, _) = reconciler();
        let outbound = reconciler.apply_callback(&CallbackParameters::parse("status=success", ""));
        assert!(outbound.is_empty());
        assert!(reconciler.log().is_none());
    }

    #[test]
    fn test_connect_callback() {
        let (mut reconciler, store, signer) = reconciler();
        let params = CallbackParameters::parse(
            "",
            "#address=0xABC&column_encryption_public_key=KEY123&network=testnet",
        );
        let outbound = reconciler.apply_callback(&params);

        let session = reconciler.session();
        assert_eq!(session.address(), Some("0xABC"));
        assert_eq!(session.network(), Some("testnet"));
        assert_eq!(session.encryption_key(), Some("KEY123"));
        assert_eq!(store.get(ADDRESS_KEY).unwrap().as_deref(), Some("0xABC"));
        assert_eq!(store.get(NETWORK_KEY).unwrap().as_deref(), Some("testnet"));
        assert_eq!(store.get(ENCRYPTION_KEY_KEY).unwrap().as_deref(), Some("KEY123"));
        assert_eq!(signer.imported(), vec!["KEY123"]);
        assert_eq!(
            outbound,
            vec![BroadcastMessage::Connect {
                credentials: Credentials::new("0xABC", "KEY123"),
                network: Some("testnet".into()),
            }]
        );
    }

    #[test]
    fn test_partial_connect_changes_nothing() {
        for query in ["address=0xABC", "column_encryption_public_key=KEY123&network=testnet"] {
            let (mut reconciler, store, signer) = reconciler();
            let outbound = reconciler.apply_callback(&CallbackParameters::parse(query, ""));

            assert!(outbound.is_empty());
            assert_eq!(reconciler.state(), AuthState::Unauthenticated);
            assert!(store.is_empty().unwrap());
            assert!(signer.imported().is_empty());
        }
    }

    #[test]
    fn test_empty_values_fire_nothing() {
        let (mut reconciler, store, signer) = reconciler();
        let outbound = reconciler.apply_callback(&CallbackParameters::parse(
            "address=&column_encryption_public_key=K&transaction_hash=",
            "status=error&log=",
        ));

        assert!(outbound.is_empty());
        assert_eq!(reconciler.state(), AuthState::Unauthenticated);
        assert!(reconciler.log().is_none());
        assert!(reconciler.last_transaction().is_none());
        assert!(store.is_empty().unwrap());
        assert!(signer.imported().is_empty());
    }

    #[test]
    fn test_hydrate_skips_empty_slots() {
        let store = MemoryStore::new();
        store.set(ADDRESS_KEY, "0xABC").unwrap();
        store.set(ENCRYPTION_KEY_KEY, "").unwrap();
        store.set(NETWORK_KEY, "").unwrap();
        let signer = RecordingSigner::default();

        let reconciler = SessionReconciler::hydrate(store, signer.clone());
        assert!(signer.imported().is_empty());
        assert_eq!(reconciler.state(), AuthState::Unauthenticated);
        assert_eq!(reconciler.session().network(), None);
    }

    #[test]
    fn test_tx_callback_keeps_auth_state() {
        let (mut reconciler, _, _) = reconciler();
        let outbound = reconciler.apply_callback(&CallbackParameters::parse("?transaction_hash=0xdeadbeef", ""));

        assert_eq!(reconciler.last_transaction(), Some(&TransactionRecord::new("0xdeadbeef")));
        assert_eq!(reconciler.state(), AuthState::Unauthenticated);
        assert_eq!(
            outbound,
            vec![BroadcastMessage::TxSuccess(TransactionRecord::new("0xdeadbeef"))]
        );
    }

    #[test]
    fn test_multiple_transitions_in_order() {
        let (mut reconciler, _, _) = reconciler();
        let params = CallbackParameters::parse(
            "status=success&log=Signed&transaction_hash=0x1",
            "address=0xA&column_encryption_public_key=K",
        );
        let kinds: Vec<_> = reconciler
            .apply_callback(&params)
            .iter()
            .map(BroadcastMessage::kind)
            .collect();
        assert_eq!(kinds, vec!["LOG", "CONNECT", "TX_SUCCESS"]);
    }

    #[test]
    fn test_inbound_connect_persists_and_installs() {
        let (mut reconciler, store, signer) = reconciler();
        reconciler.apply_broadcast(BroadcastMessage::Connect {
            credentials: Credentials::new("0xABC", "KEY123"),
            network: None,
        });

        assert_eq!(reconciler.session().address(), Some("0xABC"));
        assert_eq!(store.get(ENCRYPTION_KEY_KEY).unwrap().as_deref(), Some("KEY123"));
        assert_eq!(store.get(NETWORK_KEY).unwrap(), None);
        assert_eq!(signer.imported(), vec!["KEY123"]);
    }

    #[test]
    fn test_logout_clears_everything() {
        let (mut reconciler, store, _) = reconciler();
        reconciler.apply_callback(&CallbackParameters::parse(
            "status=success&log=Connected",
            "address=0xA&column_encryption_public_key=K&network=devnet",
        ));
        assert_eq!(reconciler.state(), AuthState::Authenticated);

        reconciler.logout();
        assert_eq!(reconciler.session(), &Session::default());
        assert_eq!(reconciler.state(), AuthState::Unauthenticated);
        assert!(reconciler.log().is_none());
        assert!(store.is_empty().unwrap());

        // Idempotent from the empty state too.
        reconciler.logout();
        assert_eq!(reconciler.session(), &Session::default());
    }

    #[test]
    fn test_broken_store_is_not_fatal() {
        let signer = RecordingSigner::default();
        let mut reconciler = SessionReconciler::hydrate(BrokenStore, signer.clone());
        let outbound = reconciler.apply_callback(&CallbackParameters::parse(
            "address=0xA&column_encryption_public_key=K",
            "",
        ));

        assert_eq!(outbound.len(), 1);
        assert_eq!(reconciler.state(), AuthState::Authenticated);
        assert_eq!(signer.imported(), vec!["K"]);
        reconciler.logout();
        assert_eq!(reconciler.state(), AuthState::Unauthenticated);
    }
}
