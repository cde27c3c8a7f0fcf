//! Constants for the vault client core
//!
//! This module contains all constants used throughout the vault client core.

// Batch constants
/// Upper bound on entries in one multi-token operation, matching the vault's
/// per-call iteration gas limit
pub const MAX_BATCH_SIZE: usize = 25;

/// Sentinel address used in token lists for the chain's native coin
pub const NATIVE_TOKEN_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Highest token precision a 256-bit base-unit amount can carry one whole token at
pub const MAX_TOKEN_DECIMALS: u8 = 76;

// Amount rules: (max decimals for the tier, minimum amount as a power of ten)
pub const MIN_AMOUNT_TIERS: &[(u8, u8)] = &[(6, 6), (12, 9)];
pub const MIN_AMOUNT_FALLBACK_EXPONENT: u8 = 18;

// Formatter thresholds
pub const FORMAT_TINY_DECIMALS: usize = 6;
pub const FORMAT_SMALL_DECIMALS: usize = 4;
pub const FORMAT_MEDIUM_DECIMALS: usize = 2;

// Wallet provider error codes
pub const CHAIN_NOT_ADDED_ERROR_CODE: i64 = 4902;
pub const USER_REJECTED_ERROR_CODE: i64 = 4001;
pub const INTERNAL_RPC_ERROR_CODE: i64 = -32603;

// Wallet RPC methods
pub const METHOD_REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
pub const METHOD_SWITCH_CHAIN: &str = "wallet_switchEthereumChain";
pub const METHOD_ADD_CHAIN: &str = "wallet_addEthereumChain";
pub const METHOD_CHAIN_ID: &str = "eth_chainId";
pub const METHOD_SEND_TRANSACTION: &str = "eth_sendTransaction";

// Environment keys
pub const ENV_DEFAULT_NETWORK: &str = "VAULT_CLIENT_DEFAULT_NETWORK";
pub const ENV_RPC_PREFIX: &str = "VAULT_CLIENT_RPC_";
pub const ENV_WALLET_RPC_URL: &str = "VAULT_CLIENT_WALLET_RPC_URL";
pub const DEFAULT_NETWORK_KEY: &str = "sepolia";

// Supported networks
pub const SUPPORTED_NETWORKS: &[&str] = &["ethereum", "sepolia", "bsc", "bsc_testnet"];

// Network configurations
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub key: &'static str,
    pub chain_id: u64,
    pub name: &'static str,
    pub rpc_url: &'static str,
    pub block_explorer: &'static str,
    pub currency_name: &'static str,
    pub currency_symbol: &'static str,
    pub currency_decimals: u8,
}

pub static ETHEREUM_MAINNET_CONFIG: NetworkConfig = NetworkConfig {
    key: "ethereum",
    chain_id: 1,
    name: "Ethereum Mainnet",
    rpc_url: "https://eth.llamarpc.com",
    block_explorer: "https://etherscan.io",
    currency_name: "Ether",
    currency_symbol: "ETH",
    currency_decimals: 18,
};

pub static SEPOLIA_CONFIG: NetworkConfig = NetworkConfig {
    key: "sepolia",
    chain_id: 11155111,
    name: "Sepolia Testnet",
    rpc_url: "https://rpc.sepolia.org",
    block_explorer: "https://sepolia.etherscan.io",
    currency_name: "Sepolia Ether",
    currency_symbol: "ETH",
    currency_decimals: 18,
};

pub static BSC_MAINNET_CONFIG: NetworkConfig = NetworkConfig {
    key: "bsc",
    chain_id: 56,
    name: "BNB Smart Chain",
    rpc_url: "https://bsc-dataseed.binance.org",
    block_explorer: "https://bscscan.com",
    currency_name: "BNB",
    currency_symbol: "BNB",
    currency_decimals: 18,
};

pub static BSC_TESTNET_CONFIG: NetworkConfig = NetworkConfig {
    key: "bsc_testnet",
    chain_id: 97,
    name: "BNB Smart Chain Testnet",
    rpc_url: "https://data-seed-prebsc-1-s1.binance.org:8545",
    block_explorer: "https://testnet.bscscan.com",
    currency_name: "Test BNB",
    currency_symbol: "tBNB",
    currency_decimals: 18,
};

// Build information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
