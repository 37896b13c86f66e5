//! One browser tab: reconciler, cross-tab channel and cleanup wired together.

use std::sync::Arc;

use column_wallet_core::{
    AuthState, BroadcastMessage, CallbackParameters, CrossTabChannel, LogEntry, Session,
    TabHost, TransactionRecord, TransferForm,
    traits::{SessionStore, SigningCapability, SigningError},
    transfer::TransferError,
};
use futures::{StreamExt, stream::BoxStream};
use tokio::task::JoinHandle;
use url::Url;

use crate::{cleanup::CleanupPolicy, reconciler::SessionReconciler};

/// A mounted tab.
///
/// Callback parameters are applied and published during [`Tab::mount`];
/// the channel subscription is registered only afterwards, so the initial
/// load always happens before any inbound message.
pub struct Tab<S, W>
where
    S: SessionStore,
    W: SigningCapability,
{
    reconciler: SessionReconciler<S, W>,
    host: Arc<dyn TabHost>,
    channel: Option<Box<dyn CrossTabChannel>>,
    inbound: Option<BoxStream<'static, BroadcastMessage>>,
    cleanup: Option<JoinHandle<()>>,
}

impl<S, W> Tab<S, W>
where
    S: SessionStore,
    W: SigningCapability,
{
    /// Mount a tab.
    ///
    /// Without a channel the tab still reconciles locally; it just neither
    /// publishes nor receives.
    ///
    /// Must be called within a tokio runtime when the URL carries a callback,
    /// since cleanup runs as a spawned task.
    pub fn mount(
        store: S,
        signer: W,
        host: Arc<dyn TabHost>,
        channel: Option<Box<dyn CrossTabChannel>>,
        policy: &CleanupPolicy,
    ) -> Self {
        let mut reconciler = SessionReconciler::hydrate(store, signer);

        let location = host.location();
        let params = CallbackParameters::parse(&location.query, &location.fragment);
        let outbound = reconciler.apply_callback(&params);

        match &channel {
            Some(channel) => {
                for message in &outbound {
                    channel.publish(message);
                }
            }
            None if !outbound.is_empty() => {
                tracing::debug!("No cross-tab channel, callback stays local");
            }
            None => {}
        }

        let inbound = channel.as_ref().map(|channel| channel.subscribe());
        let cleanup = (!outbound.is_empty()).then(|| policy.schedule(Arc::clone(&host)));

        tracing::info!(
            state = ?reconciler.state(),
            callback = !outbound.is_empty(),
            synced = channel.is_some(),
            "Tab mounted"
        );

        Self {
            reconciler,
            host,
            channel,
            inbound,
            cleanup,
        }
    }

    /// Wait for the next message from another tab and apply it.
    ///
    /// Returns `None` once the channel is closed or absent.
    pub async fn next_inbound(&mut self) -> Option<BroadcastMessage> {
        let message = self.inbound.as_mut()?.next().await?;
        self.reconciler.apply_broadcast(message.clone());
        Some(message)
    }

    /// Apply inbound messages until the channel closes.
    pub async fn run(&mut self) {
        while self.next_inbound().await.is_some() {}
    }

    /// Release the channel subscription.
    pub fn close(&mut self) {
        self.inbound = None;
        if let Some(channel) = self.channel.take() {
            channel.close();
        }
    }

    /// Redirect URL that starts the wallet connection.
    ///
    /// # Errors
    /// Returns error if the signer cannot build the URL.
    pub fn connect(&self) -> Result<Url, SigningError> {
        self.reconciler.signer().connect()
    }

    /// Submit a transfer through this tab's signer.
    ///
    /// # Errors
    /// Returns error if the form is incomplete or the signer refuses.
    pub fn submit_transfer(&self, form: &mut TransferForm) -> Result<Url, TransferError> {
        form.submit(self.reconciler.signer())
    }

    /// Log out in this tab only.
    pub fn logout(&mut self) {
        self.reconciler.logout();
    }

    /// Take the pending cleanup task, if the load carried a callback.
    pub fn take_cleanup(&mut self) -> Option<JoinHandle<()>> {
        self.cleanup.take()
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        self.reconciler.session()
    }

    #[must_use]
    pub const fn state(&self) -> AuthState {
        self.reconciler.state()
    }

    #[must_use]
    pub const fn log(&self) -> Option<&LogEntry> {
        self.reconciler.log()
    }

    #[must_use]
    pub const fn last_transaction(&self) -> Option<&TransactionRecord> {
        self.reconciler.last_transaction()
    }

    #[must_use]
    pub fn host(&self) -> &dyn TabHost {
        self.host.as_ref()
    }

    #[must_use]
    pub const fn reconciler(&self) -> &SessionReconciler<S, W> {
        &self.reconciler
    }
}

impl<S, W> Drop for Tab<S, W>
where
    S: SessionStore,
    W: SigningCapability,
{
    fn drop(&mut self) {
        self.close();
    }
}
