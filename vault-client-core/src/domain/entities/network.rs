//! Network entity for the vault client core

use crate::shared::constants::{
    NetworkConfig, BSC_MAINNET_CONFIG, BSC_TESTNET_CONFIG, ETHEREUM_MAINNET_CONFIG, SEPOLIA_CONFIG,
};
use crate::shared::types::ChainId;
use crate::shared::utils::to_hex_chain_id;
use serde::{Deserialize, Serialize};

/// Chains the vault front-end can ask a wallet to switch to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SupportedNetwork {
    EthereumMainnet,
    Sepolia,
    BscMainnet,
    BscTestnet,
}

impl SupportedNetwork {
    pub const ALL: [SupportedNetwork; 4] = [
        SupportedNetwork::EthereumMainnet,
        SupportedNetwork::Sepolia,
        SupportedNetwork::BscMainnet,
        SupportedNetwork::BscTestnet,
    ];

    pub fn config(&self) -> &'static NetworkConfig {
        match self {
            SupportedNetwork::EthereumMainnet => &ETHEREUM_MAINNET_CONFIG,
            SupportedNetwork::Sepolia => &SEPOLIA_CONFIG,
            SupportedNetwork::BscMainnet => &BSC_MAINNET_CONFIG,
            SupportedNetwork::BscTestnet => &BSC_TESTNET_CONFIG,
        }
    }

    pub fn chain_id(&self) -> ChainId {
        self.config().chain_id
    }

    pub fn hex_chain_id(&self) -> String {
        to_hex_chain_id(self.chain_id())
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Short key used in configuration (`sepolia`, `bsc_testnet`, ...)
    pub fn key(&self) -> &'static str {
        self.config().key
    }

    pub fn rpc_url(&self) -> &'static str {
        self.config().rpc_url
    }

    pub fn block_explorer(&self) -> &'static str {
        self.config().block_explorer
    }

    pub fn native_currency(&self) -> NativeCurrency {
        let config = self.config();
        NativeCurrency {
            name: config.currency_name.to_string(),
            symbol: config.currency_symbol.to_string(),
            decimals: config.currency_decimals,
        }
    }

    pub fn is_testnet(&self) -> bool {
        matches!(self, SupportedNetwork::Sepolia | SupportedNetwork::BscTestnet)
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.key().eq_ignore_ascii_case(key))
    }

    pub fn from_chain_id(chain_id: ChainId) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.chain_id() == chain_id)
    }

    /// Parameters for `wallet_addEthereumChain`, optionally with an RPC override
    pub fn add_chain_parameters(&self, rpc_url: Option<&str>) -> AddChainParameters {
        AddChainParameters {
            chain_id: self.hex_chain_id(),
            chain_name: self.name().to_string(),
            native_currency: self.native_currency(),
            rpc_urls: vec![rpc_url.unwrap_or(self.rpc_url()).to_string()],
            block_explorer_urls: vec![self.block_explorer().to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Chain definition as wallets expect it in `wallet_addEthereumChain`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParameters {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}
