//! Client configuration from the environment
//!
//! `.env` is loaded through dotenv, then `VAULT_CLIENT_*` variables pick the
//! default network and override per-network RPC URLs.

use crate::domain::entities::SupportedNetwork;
use crate::shared::constants::{
    DEFAULT_NETWORK_KEY, ENV_DEFAULT_NETWORK, ENV_RPC_PREFIX, ENV_WALLET_RPC_URL,
    SUPPORTED_NETWORKS,
};
use crate::shared::error::VaultError;
use crate::shared::types::VaultResult;
use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    pub default_network: SupportedNetwork,
    pub rpc_overrides: HashMap<SupportedNetwork, String>,
    /// JSON-RPC endpoint used as the wallet provider when no browser wallet is attached
    pub wallet_rpc_url: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_network: SupportedNetwork::Sepolia,
            rpc_overrides: HashMap::new(),
            wallet_rpc_url: None,
        }
    }
}

/// `VAULT_CLIENT_RPC_BSC_TESTNET` and friends
pub fn rpc_env_key(network: SupportedNetwork) -> String {
    format!("{}{}", ENV_RPC_PREFIX, network.key().to_ascii_uppercase())
}

impl ClientConfig {
    pub fn from_env() -> VaultResult<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> VaultResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let network_key =
            get(ENV_DEFAULT_NETWORK).unwrap_or_else(|| DEFAULT_NETWORK_KEY.to_string());
        let default_network = SupportedNetwork::from_key(&network_key).ok_or_else(|| {
            VaultError::config(format!(
                "Unknown network '{}' in {}, expected one of {}",
                network_key,
                ENV_DEFAULT_NETWORK,
                SUPPORTED_NETWORKS.join(", ")
            ))
        })?;

        let mut rpc_overrides = HashMap::new();
        for network in SupportedNetwork::ALL {
            if let Some(url) = get(&rpc_env_key(network)) {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(VaultError::config(format!(
                        "{} must be an http(s) URL",
                        rpc_env_key(network)
                    )));
                }
                rpc_overrides.insert(network, url);
            }
        }

        let config = Self {
            default_network,
            rpc_overrides,
            wallet_rpc_url: get(ENV_WALLET_RPC_URL),
        };
        log::debug!("Loaded client config: {:?}", config);
        Ok(config)
    }

    pub fn rpc_url_for(&self, network: SupportedNetwork) -> &str {
        self.rpc_overrides
            .get(&network)
            .map(String::as_str)
            .unwrap_or_else(|| network.rpc_url())
    }
}
