//! Token decimals lookup with a configured fallback.

use column_wallet_core::NetworkConfig;
use serde_json::Value;

use crate::view::{HttpViewClient, LookupError, ViewClient, ViewRequest};

/// Type of the native MOVE coin.
pub const NATIVE_COIN: &str = "0x1::aptos_coin::AptosCoin";

/// Fungible-asset metadata object of the native coin.
pub const NATIVE_METADATA: &str = "0xa";

/// Decimals used when the network config has none.
pub const FALLBACK_DECIMALS: u8 = 8;

const FA_DECIMALS: &str = "0x1::fungible_asset::decimals";
const COIN_DECIMALS: &str = "0x1::coin::decimals";

/// Looks up how many decimals a token uses.
///
/// Tries the fungible-asset standard first, then the legacy coin standard.
/// Failures never surface: the configured decimals are returned instead.
pub struct DecimalsLookup<C: ViewClient = HttpViewClient> {
    client: C,
}

impl Default for DecimalsLookup {
    fn default() -> Self {
        Self::new(HttpViewClient::new())
    }
}

impl<C: ViewClient> DecimalsLookup<C> {
    #[must_use]
    pub const fn new(client: C) -> Self {
        Self { client }
    }

    /// Decimals of `token` on `network`.
    pub async fn get_decimals_for(&self, token: &str, network: &NetworkConfig) -> u8 {
        self.get_decimals(token, network.node_url, network.decimals)
            .await
    }

    /// Decimals of `token` on the node at `node_url`, or `configured` (8 when
    /// zero) if neither standard answers with a number.
    pub async fn get_decimals(&self, token: &str, node_url: &str, configured: u8) -> u8 {
        let fallback = if configured == 0 {
            FALLBACK_DECIMALS
        } else {
            configured
        };

        match self.lookup(token, node_url).await {
            Ok(Some(decimals)) => decimals,
            Ok(None) => fallback,
            Err(e) => {
                tracing::warn!(token, "Failed to detect decimals, using fallback {fallback}: {e}");
                fallback
            }
        }
    }

    async fn lookup(&self, token: &str, node_url: &str) -> Result<Option<u8>, LookupError> {
        let metadata = if token == NATIVE_COIN {
            NATIVE_METADATA
        } else {
            token
        };

        let fa = ViewRequest::new(FA_DECIMALS).argument(metadata);
        if let Some(decimals) = self.call(node_url, &fa).await? {
            return Ok(Some(decimals));
        }

        let coin = ViewRequest::new(COIN_DECIMALS).type_argument(token);
        self.call(node_url, &coin).await
    }

    // A non-success status moves on to the next standard; anything else aborts.
    async fn call(&self, node_url: &str, request: &ViewRequest) -> Result<Option<u8>, LookupError> {
        match self.client.view(node_url, request).await {
            Ok(value) => Ok(first_number(&value)),
            Err(LookupError::Status(status)) => {
                tracing::debug!(function = %request.function, status, "View call rejected");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

fn first_number(value: &Value) -> Option<u8> {
    value
        .as_array()?
        .first()?
        .as_u64()
        .and_then(|n| u8::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;

    /// Replays canned responses and records requests.
    struct Scripted {
        responses: Mutex<Vec<Result<Value, LookupError>>>,
        requests: Mutex<Vec<ViewRequest>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<Value, LookupError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().rev().collect()),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ViewClient for Scripted {
        async fn view(&self, _node_url: &str, request: &ViewRequest) -> Result<Value, LookupError> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(LookupError::Status(500)))
        }
    }

    #[tokio::test]
    async fn test_native_coin_maps_to_metadata_object() {
        let lookup = DecimalsLookup::new(Scripted::new(vec![Ok(json!([8]))]));
        assert_eq!(lookup.get_decimals(NATIVE_COIN, "http://node", 8).await, 8);

        let requests = lookup.client.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].arguments, vec![NATIVE_METADATA]);
    }

    #[tokio::test]
    async fn test_falls_through_to_coin_standard() {
        let lookup = DecimalsLookup::new(Scripted::new(vec![
            Ok(json!({"error": "not a fungible asset"})),
            Ok(json!([6])),
        ]));
        assert_eq!(lookup.get_decimals("0x42::usdc::USDC", "http://node", 8).await, 6);

        let requests = lookup.client.requests.lock().unwrap();
        assert_eq!(requests[1].function, COIN_DECIMALS);
        assert_eq!(requests[1].type_arguments, vec!["0x42::usdc::USDC"]);
        assert!(requests[1].arguments.is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_skips_coin_standard() {
        let lookup = DecimalsLookup::new(Scripted::new(vec![
            Err(LookupError::Transport("connection refused".into())),
            Ok(json!([6])),
        ]));
        assert_eq!(lookup.get_decimals("0x42::usdc::USDC", "http://node", 10).await, 10);
        assert_eq!(lookup.client.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_configured_decimals_falls_back_to_eight() {
        let lookup = DecimalsLookup::new(Scripted::new(Vec::new()));
        assert_eq!(lookup.get_decimals(NATIVE_COIN, "http://node", 0).await, 8);
    }

    #[test]
    fn test_first_number() {
        assert_eq!(first_number(&json!([6])), Some(6));
        assert_eq!(first_number(&json!(["6"])), None);
        assert_eq!(first_number(&json!([])), None);
        assert_eq!(first_number(&json!([300])), None);
    }
}
