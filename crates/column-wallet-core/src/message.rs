//! Cross-tab broadcast messages.

use crate::model::{Credentials, LogEntry, TransactionRecord};

/// Message exchanged between tabs of the same origin.
///
/// Only ever built from a validated callback or a validated wire payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastMessage {
    /// A tab received wallet credentials.
    Connect {
        credentials: Credentials,
        network: Option<String>,
    },
    /// A tab received a wallet status log.
    Log(LogEntry),
    /// A tab received a completed transaction.
    TxSuccess(TransactionRecord),
}

impl BroadcastMessage {
    /// Short name used in logs and on the wire.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "CONNECT",
            Self::Log(_) => "LOG",
            Self::TxSuccess(_) => "TX_SUCCESS",
        }
    }
}
