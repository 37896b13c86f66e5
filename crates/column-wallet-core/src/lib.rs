//! Core abstractions for Column wallet session synchronization.
//!
//! This crate provides the fundamental building blocks:
//! - `Session`, `LogEntry`, `TransactionRecord` - In-memory session model
//! - `CallbackParameters` - Merged redirect parameters of a callback tab
//! - `BroadcastMessage` - Closed union of cross-tab messages
//! - `NetworkConfig` - Static Movement network table
//! - `DeepLinkWallet` - Tab-local signing capability
//! - Store, channel, host and signer traits

pub mod callback;
pub mod config;
pub mod message;
pub mod model;
pub mod network;
pub mod traits;
pub mod transfer;
pub mod wallet;

pub use callback::CallbackParameters;
pub use config::SdkConfig;
pub use message::BroadcastMessage;
pub use model::{AuthState, Credentials, LogEntry, LogKind, Session, TransactionRecord};
pub use network::{NetworkConfig, NetworkKind};
pub use traits::{CrossTabChannel, SessionStore, SigningCapability, TabHost};
pub use transfer::{TransactionPayload, TransferForm, TransferRequest};
pub use wallet::DeepLinkWallet;
