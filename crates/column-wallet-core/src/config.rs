//! Wallet SDK configuration.

use serde::{Deserialize, Serialize};

/// Default deep-link scheme of the Column wallet app.
pub const DEFAULT_WALLET_SCHEME: &str = "column";

/// Name of the same-origin cross-tab channel.
pub const CHANNEL_NAME: &str = "column_wallet_channel";

/// How the app identifies itself to the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    /// Origin of the app.
    pub app_url: String,
    /// Where the wallet redirects back to with callback parameters.
    pub redirect_link: String,
    /// Deep-link scheme of the wallet app.
    pub wallet_scheme: String,
}

impl SdkConfig {
    /// Config for an app served from `origin`, redirecting back to its root.
    #[must_use]
    pub fn for_origin(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            app_url: origin.to_string(),
            redirect_link: format!("{origin}/"),
            wallet_scheme: DEFAULT_WALLET_SCHEME.to_string(),
        }
    }
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self::for_origin("http://localhost:5173")
    }
}
