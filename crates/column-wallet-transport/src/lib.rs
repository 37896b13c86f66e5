//! Cross-tab broadcast channel.
//!
//! Provides:
//! - Wire protocol (JSON, validated into `BroadcastMessage`)
//! - `ChannelHub` - Named same-origin channels shared by tabs
//! - `TabChannel` - One tab's handle implementing `CrossTabChannel`

pub mod hub;
pub mod protocol;

pub use hub::{ChannelHub, TabChannel};
pub use protocol::{ProtocolError, WireMessage};
