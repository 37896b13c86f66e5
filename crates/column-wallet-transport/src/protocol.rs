//! Wire protocol for messages between tabs.

use column_wallet_core::{BroadcastMessage, Credentials, LogEntry, LogKind, TransactionRecord};
use serde::{Deserialize, Serialize};

/// Protocol error.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Empty field: {0}")]
    EmptyField(&'static str),
    #[error("Unknown log type: {0}")]
    UnknownLogKind(String),
}

/// `CONNECT` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectData {
    pub address: String,
    #[serde(default)]
    pub network: Option<String>,
    pub encryption_key: String,
}

/// `LOG` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogData {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// `TX_SUCCESS` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxData {
    pub tx_hash: String,
}

/// Message as it travels on the channel, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WireMessage {
    Connect(ConnectData),
    Log(LogData),
    TxSuccess(TxData),
}

impl WireMessage {
    /// Parse and validate a raw payload.
    ///
    /// # Errors
    /// Returns error if the payload is not a well-formed message.
    pub fn decode(raw: &str) -> Result<BroadcastMessage, ProtocolError> {
        serde_json::from_str::<Self>(raw)?.validate()
    }

    /// Serialize a message for the wire.
    ///
    /// # Errors
    /// Returns error if serialization fails.
    pub fn encode(message: &BroadcastMessage) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(&Self::from(message))?)
    }

    /// Check required fields and narrow into the closed message union.
    ///
    /// # Errors
    /// Returns error if a required field is empty or the log type is unknown.
    pub fn validate(self) -> Result<BroadcastMessage, ProtocolError> {
        match self {
            Self::Connect(data) => {
                if data.address.is_empty() {
                    return Err(ProtocolError::EmptyField("address"));
                }
                if data.encryption_key.is_empty() {
                    return Err(ProtocolError::EmptyField("encryptionKey"));
                }
                Ok(BroadcastMessage::Connect {
                    credentials: Credentials::new(data.address, data.encryption_key),
                    network: data.network.filter(|n| !n.is_empty()),
                })
            }
            Self::Log(data) => {
                let kind = LogKind::from_status(&data.kind)
                    .ok_or(ProtocolError::UnknownLogKind(data.kind))?;
                Ok(BroadcastMessage::Log(LogEntry::new(data.message, kind)))
            }
            Self::TxSuccess(data) => {
                if data.tx_hash.is_empty() {
                    return Err(ProtocolError::EmptyField("txHash"));
                }
                Ok(BroadcastMessage::TxSuccess(TransactionRecord::new(data.tx_hash)))
            }
        }
    }
}

impl From<&BroadcastMessage> for WireMessage {
    fn from(message: &BroadcastMessage) -> Self {
        match message {
            BroadcastMessage::Connect {
                credentials,
                network,
            } => Self::Connect(ConnectData {
                address: credentials.address.clone(),
                network: network.clone(),
                encryption_key: credentials.encryption_key.clone(),
            }),
            BroadcastMessage::Log(entry) => Self::Log(LogData {
                message: entry.message.clone(),
                kind: entry.kind.as_str().to_string(),
            }),
            BroadcastMessage::TxSuccess(record) => Self::TxSuccess(TxData {
                tx_hash: record.hash.clone(),
            }),
        }
    }
}
