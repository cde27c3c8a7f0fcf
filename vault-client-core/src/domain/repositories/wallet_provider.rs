//! Browser-wallet style request surface
//!
//! Anything that answers EIP-1193 style `request(method, params)` calls:
//! an injected extension bridge, or a JSON-RPC endpoint.

use crate::shared::error::ProviderError;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde_json::Value;

/// Wallet provider trait
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Issue one request and return its `result` value
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;
}
