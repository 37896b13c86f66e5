//! Callback tab cleanup.

use std::{sync::Arc, time::Duration};

use column_wallet_core::TabHost;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

/// Delay before the callback parameters are stripped from the URL, giving the
/// broadcast time to reach sibling tabs.
pub const DEFAULT_CLEANUP_DELAY: Duration = Duration::from_millis(500);

/// What happens to a tab after it delivered a wallet callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupPolicy {
    /// Wait before touching the URL.
    pub delay: Duration,
    /// Close tabs that look like they only exist to deliver the callback.
    /// Off unless explicitly enabled.
    pub self_close: bool,
}

impl Default for CleanupPolicy {
    fn default() -> Self {
        Self {
            delay: DEFAULT_CLEANUP_DELAY,
            self_close: false,
        }
    }
}

impl CleanupPolicy {
    /// Whether `host` should close itself after cleanup.
    ///
    /// Requires the policy to be enabled and the tab to have been opened by
    /// another window or to have no history of its own.
    #[must_use]
    pub fn should_self_close(&self, host: &dyn TabHost) -> bool {
        self.self_close && (host.has_opener() || host.history_length() <= 1)
    }

    /// Strip callback parameters after the delay, then maybe close the tab.
    ///
    /// The returned task is not meant to be cancelled.
    pub fn schedule(&self, host: Arc<dyn TabHost>) -> JoinHandle<()> {
        let policy = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(policy.delay).await;

            let path = host.location().path;
            host.replace_url(&path);
            tracing::debug!(%path, "Stripped callback parameters");

            if policy.should_self_close(host.as_ref()) {
                tracing::info!("Closing callback tab");
                host.close();
            }
        })
    }
}
