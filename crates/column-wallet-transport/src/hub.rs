//! Named same-origin broadcast channels.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use column_wallet_core::{BroadcastMessage, CrossTabChannel, config::CHANNEL_NAME};
use futures::{StreamExt, future, stream::BoxStream};
use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::{BroadcastStream, errors::BroadcastStreamRecvError};
use uuid::Uuid;

use crate::protocol::WireMessage;

/// Buffered messages per channel before slow subscribers start lagging.
const CHANNEL_CAPACITY: usize = 1024;

#[derive(Clone)]
struct Envelope {
    sender: Uuid,
    payload: Arc<str>,
}

/// Registry of named channels for one origin.
///
/// Every tab of the origin opens its own [`TabChannel`] on the same hub.
/// Cloning the hub shares the registry.
#[derive(Clone, Default)]
pub struct ChannelHub {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<Envelope>>>>,
}

impl ChannelHub {
    /// Create an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a tab handle on the channel called `name`.
    #[must_use]
    pub fn open(&self, name: &str) -> TabChannel {
        let sender = {
            let mut channels = self.channels.write().unwrap_or_else(PoisonError::into_inner);
            channels
                .entry(name.to_string())
                .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
                .clone()
        };
        let (closed, _) = watch::channel(false);
        let channel = TabChannel {
            id: Uuid::new_v4(),
            name: name.to_string(),
            sender,
            closed,
        };
        tracing::debug!(channel = %channel.name, tab = %channel.id, "Opened broadcast channel");
        channel
    }

    /// Open a tab handle on the wallet channel.
    #[must_use]
    pub fn open_wallet_channel(&self) -> TabChannel {
        self.open(CHANNEL_NAME)
    }
}

/// One tab's handle on a named channel.
///
/// A tab never receives its own messages. Dropping the handle closes it.
pub struct TabChannel {
    id: Uuid,
    name: String,
    sender: broadcast::Sender<Envelope>,
    closed: watch::Sender<bool>,
}

impl TabChannel {
    /// Identifier of this tab on the channel.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Publish an unvalidated payload. Receivers validate it on arrival.
    pub fn publish_raw(&self, payload: &str) {
        if self.is_closed() {
            tracing::debug!(channel = %self.name, "Publish on closed channel ignored");
            return;
        }
        // No receivers is not an error.
        let _ = self.sender.send(Envelope {
            sender: self.id,
            payload: Arc::from(payload),
        });
    }
}

impl CrossTabChannel for TabChannel {
    fn publish(&self, message: &BroadcastMessage) {
        match WireMessage::encode(message) {
            Ok(payload) => {
                tracing::debug!(channel = %self.name, kind = message.kind(), "Publishing");
                self.publish_raw(&payload);
            }
            Err(e) => tracing::error!("Failed to serialize broadcast message: {e}"),
        }
    }

    fn subscribe(&self) -> BoxStream<'static, BroadcastMessage> {
        let own_id = self.id;
        let channel = self.name.clone();
        let mut closed = self.closed.subscribe();
        let until_closed = async move {
            let _ = closed.wait_for(|closed| *closed).await;
        };

        BroadcastStream::new(self.sender.subscribe())
            .filter_map(move |res| {
                let msg = match res {
                    Ok(envelope) if envelope.sender == own_id => None,
                    Ok(envelope) => match WireMessage::decode(&envelope.payload) {
                        Ok(msg) => Some(msg),
                        Err(e) => {
                            tracing::warn!(%channel, "Dropping invalid broadcast payload: {e}");
                            None
                        }
                    },
                    Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                        tracing::warn!(%channel, skipped, "Broadcast subscriber lagged");
                        None
                    }
                };
                future::ready(msg)
            })
            .take_until(until_closed)
            .boxed()
    }

    fn close(&self) {
        if !self.closed.send_replace(true) {
            tracing::debug!(channel = %self.name, tab = %self.id, "Closed broadcast channel");
        }
    }
}

impl Drop for TabChannel {
    fn drop(&mut self) {
        self.close();
    }
}
