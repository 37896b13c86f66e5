//! Deep-link signing capability.

use std::sync::{PoisonError, RwLock};

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD as BASE64};
use url::Url;

use crate::{
    SdkConfig,
    traits::{SigningCapability, SigningError},
    transfer::TransactionPayload,
};

/// Signing capability that hands requests to the wallet app via deep links.
///
/// Each tab owns its own instance; keys are not shared between tabs.
#[derive(Debug)]
pub struct DeepLinkWallet {
    config: SdkConfig,
    key: RwLock<Option<String>>,
}

impl DeepLinkWallet {
    #[must_use]
    pub const fn new(config: SdkConfig) -> Self {
        Self {
            config,
            key: RwLock::new(None),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Whether a wallet key has been imported.
    #[must_use]
    pub fn has_key(&self) -> bool {
        self.key
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn deep_link(&self, action: &str) -> Result<Url, SigningError> {
        let mut url = Url::parse(&format!("{}://{action}", self.config.wallet_scheme))?;
        url.query_pairs_mut()
            .append_pair("app_url", &self.config.app_url)
            .append_pair("redirect_link", &self.config.redirect_link);
        Ok(url)
    }
}

impl SigningCapability for DeepLinkWallet {
    fn connect(&self) -> Result<Url, SigningError> {
        self.deep_link("connect")
    }

    fn sign_and_submit_transaction(
        &self,
        payload: &TransactionPayload,
    ) -> Result<Url, SigningError> {
        if !self.has_key() {
            return Err(SigningError::NotConnected);
        }

        let encoded = BASE64.encode(serde_json::to_vec(payload)?);
        let mut url = self.deep_link("sign_and_submit_transaction")?;
        url.query_pairs_mut().append_pair("payload", &encoded);
        Ok(url)
    }

    fn import_wallet_key(&self, key: &str) {
        *self.key.write().unwrap_or_else(PoisonError::into_inner) = Some(key.to_string());
    }
}
