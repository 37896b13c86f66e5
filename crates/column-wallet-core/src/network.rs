//! Static Movement network table.

use serde::{Deserialize, Serialize};

/// Known Movement networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    Mainnet,
    Testnet,
    Devnet,
}

impl NetworkKind {
    /// Network used when the wallet reports none.
    pub const DEFAULT: Self = Self::Mainnet;

    pub const ALL: [Self; 3] = [Self::Mainnet, Self::Testnet, Self::Devnet];

    /// Identifier as reported by the wallet callback.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Devnet => "devnet",
        }
    }

    /// Look up a network by its identifier.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.id() == id)
    }

    #[must_use]
    pub const fn config(self) -> &'static NetworkConfig {
        match self {
            Self::Mainnet => &MAINNET,
            Self::Testnet => &TESTNET,
            Self::Devnet => &DEVNET,
        }
    }
}

impl std::fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Connection details of one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub name: &'static str,
    pub chain_id: u64,
    pub node_url: &'static str,
    pub explorer_url: &'static str,
    pub decimals: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faucet_url: Option<&'static str>,
}

const EXPLORER_URL: &str = "https://explorer.movementlabs.xyz";

pub const MAINNET: NetworkConfig = NetworkConfig {
    name: "Movement Mainnet",
    chain_id: 126,
    node_url: "https://mainnet.movementnetwork.xyz/v1",
    explorer_url: EXPLORER_URL,
    decimals: 8,
    faucet_url: None,
};

pub const TESTNET: NetworkConfig = NetworkConfig {
    name: "Movement Testnet",
    chain_id: 30732,
    node_url: "https://testnet.movementnetwork.xyz/v1",
    explorer_url: EXPLORER_URL,
    decimals: 8,
    faucet_url: Some("https://faucet.testnet.movementnetwork.xyz/"),
};

pub const DEVNET: NetworkConfig = NetworkConfig {
    name: "Movement Devnet",
    chain_id: 30731,
    node_url: "https://devnet.movementnetwork.xyz/v1",
    explorer_url: EXPLORER_URL,
    decimals: 8,
    faucet_url: Some("https://faucet.devnet.movementnetwork.xyz/"),
};

impl NetworkConfig {
    /// Config of a network identifier, if it is a known network.
    #[must_use]
    pub fn lookup(id: &str) -> Option<&'static Self> {
        NetworkKind::from_id(id).map(NetworkKind::config)
    }

    /// Config of a network identifier, falling back to the default network.
    #[must_use]
    pub fn lookup_or_default(id: Option<&str>) -> &'static Self {
        id.and_then(Self::lookup)
            .unwrap_or_else(|| NetworkKind::DEFAULT.config())
    }

    /// Explorer page of a transaction.
    #[must_use]
    pub fn explorer_tx_url(&self, hash: &str) -> String {
        format!("{}/txn/{hash}", self.explorer_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let testnet = NetworkConfig::lookup("testnet").unwrap();
        assert_eq!(testnet.chain_id, 30732);
        assert!(testnet.faucet_url.is_some());
        assert!(NetworkConfig::lookup("localnet").is_none());
    }

    #[test]
    fn test_default_is_mainnet() {
        assert_eq!(NetworkConfig::lookup_or_default(None).chain_id, 126);
        assert_eq!(NetworkConfig::lookup_or_default(Some("nope")).chain_id, 126);
        assert_eq!(NetworkConfig::lookup_or_default(Some("devnet")).chain_id, 30731);
    }

    #[test]
    fn test_explorer_tx_url() {
        assert_eq!(
            MAINNET.explorer_tx_url("0xdead"),
            "https://explorer.movementlabs.xyz/txn/0xdead"
        );
    }
}
