//! In-memory session model.

use serde::{Deserialize, Serialize};

/// Wallet credentials returned by a connect callback.
///
/// The address and the encryption key always travel together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Wallet account address.
    pub address: String,
    /// Encryption key installed into the signing capability.
    pub encryption_key: String,
}

impl Credentials {
    #[must_use]
    pub fn new(address: impl Into<String>, encryption_key: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            encryption_key: encryption_key.into(),
        }
    }
}

/// Authentication state derived from a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    /// No wallet address is known.
    Unauthenticated,
    /// A wallet address and its key are known.
    Authenticated,
}

/// Wallet session of one tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Connected credentials, if any.
    pub credentials: Option<Credentials>,
    /// Network identifier reported by the wallet (may be absent).
    pub network: Option<String>,
}

impl Session {
    /// Create an empty, unauthenticated session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wallet address, if connected.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.address.as_str())
    }

    /// Encryption key, if connected.
    #[must_use]
    pub fn encryption_key(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.encryption_key.as_str())
    }

    /// Network identifier, if known.
    #[must_use]
    pub fn network(&self) -> Option<&str> {
        self.network.as_deref()
    }

    #[must_use]
    pub const fn state(&self) -> AuthState {
        if self.credentials.is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.state(), AuthState::Authenticated)
    }

    /// Install credentials. The network is only replaced when one is given.
    pub fn connect(&mut self, credentials: Credentials, network: Option<String>) {
        self.credentials = Some(credentials);
        if network.is_some() {
            self.network = network;
        }
    }

    /// Reset to the empty, unauthenticated session.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Kind of a wallet status log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Success,
    Error,
}

impl LogKind {
    /// Map a callback `status` value to a log kind.
    ///
    /// Returns `None` for anything other than `success` or `error`.
    #[must_use]
    pub fn from_status(status: &str) -> Option<Self> {
        match status {
            "success" => Some(Self::Success),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status message reported by the wallet. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    pub kind: LogKind,
}

impl LogEntry {
    #[must_use]
    pub fn new(message: impl Into<String>, kind: LogKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

/// Hash of the last completed transaction. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub hash: String,
}

impl TransactionRecord {
    #[must_use]
    pub fn new(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_keeps_network_when_absent() {
        let mut session = Session::new();
        session.connect(Credentials::new("0x1", "k1"), Some("testnet".into()));
        session.connect(Credentials::new("0x2", "k2"), None);

        assert_eq!(session.address(), Some("0x2"));
        assert_eq!(session.encryption_key(), Some("k2"));
        assert_eq!(session.network(), Some("testnet"));
    }

    #[test]
    fn test_clear_resets_state() {
        let mut session = Session::new();
        session.connect(Credentials::new("0x1", "k1"), Some("devnet".into()));
        assert_eq!(session.state(), AuthState::Authenticated);

        session.clear();
        assert_eq!(session, Session::default());
        assert_eq!(session.state(), AuthState::Unauthenticated);
    }

    #[test]
    fn test_log_kind_from_status() {
        assert_eq!(LogKind::from_status("error"), Some(LogKind::Error));
        assert_eq!(LogKind::from_status("success"), Some(LogKind::Success));
        assert_eq!(LogKind::from_status("info"), None);
    }
}
