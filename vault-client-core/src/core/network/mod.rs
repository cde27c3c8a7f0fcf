//! Wallet network connector
//!
//! Requests accounts from the wallet and moves it onto one of the supported
//! chains, registering the chain first when the wallet has never seen it.

use crate::domain::entities::SupportedNetwork;
use crate::domain::repositories::WalletProvider;
use crate::shared::constants::{
    METHOD_ADD_CHAIN, METHOD_CHAIN_ID, METHOD_REQUEST_ACCOUNTS, METHOD_SWITCH_CHAIN,
};
use crate::shared::error::VaultError;
use crate::shared::types::{Address, ChainId, VaultResult};
use crate::shared::utils::parse_hex_chain_id;
use serde_json::{json, Value};
use std::collections::HashMap;

/// How the wallet ended up on the requested chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    Switched,
    /// The chain was unknown and has been added; wallets switch as part of adding
    Added,
}

pub struct NetworkConnector<P: WalletProvider> {
    provider: Option<P>,
    rpc_overrides: HashMap<SupportedNetwork, String>,
}

impl<P: WalletProvider> NetworkConnector<P> {
    pub fn new(provider: Option<P>) -> Self {
        Self {
            provider,
            rpc_overrides: HashMap::new(),
        }
    }

    /// RPC URLs announced to the wallet instead of the built-in ones
    pub fn with_rpc_overrides(mut self, overrides: HashMap<SupportedNetwork, String>) -> Self {
        self.rpc_overrides = overrides;
        self
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    fn provider(&self) -> VaultResult<&P> {
        self.provider.as_ref().ok_or(VaultError::NoProvider)
    }

    pub fn rpc_url_for(&self, network: SupportedNetwork) -> &str {
        self.rpc_overrides
            .get(&network)
            .map(String::as_str)
            .unwrap_or_else(|| network.rpc_url())
    }

    pub async fn request_accounts(&self) -> VaultResult<Vec<Address>> {
        let provider = self.provider()?;
        let result = provider.request(METHOD_REQUEST_ACCOUNTS, json!([])).await?;
        let accounts: Vec<Address> = serde_json::from_value(result)?;
        log::info!("Wallet exposed {} account(s)", accounts.len());
        Ok(accounts)
    }

    pub async fn current_chain_id(&self) -> VaultResult<ChainId> {
        let provider = self.provider()?;
        let result = provider.request(METHOD_CHAIN_ID, json!([])).await?;
        let hex = result
            .as_str()
            .ok_or_else(|| VaultError::network(format!("Unexpected chain id: {}", result)))?;
        parse_hex_chain_id(hex)
    }

    /// The supported network the wallet is on, if any
    pub async fn current_network(&self) -> VaultResult<Option<SupportedNetwork>> {
        Ok(SupportedNetwork::from_chain_id(self.current_chain_id().await?))
    }

    pub async fn switch_network(&self, network: SupportedNetwork) -> VaultResult<SwitchOutcome> {
        let provider = self.provider()?;
        let chain_id = network.hex_chain_id();

        match provider
            .request(METHOD_SWITCH_CHAIN, json!([{ "chainId": chain_id }]))
            .await
        {
            Ok(_) => {
                log::info!("Switched wallet to {} ({})", network.name(), chain_id);
                Ok(SwitchOutcome::Switched)
            }
            Err(err) if err.is_chain_not_added() => {
                log::info!("{} unknown to wallet, adding it", network.name());
                let params = network.add_chain_parameters(Some(self.rpc_url_for(network)));
                let params: Value = json!([params]);
                provider.request(METHOD_ADD_CHAIN, params).await.map_err(|err| {
                    log::warn!("Adding {} failed: {}", network.name(), err);
                    VaultError::from(err)
                })?;
                Ok(SwitchOutcome::Added)
            }
            Err(err) => {
                log::warn!("Switching to {} failed: {}", network.name(), err);
                Err(err.into())
            }
        }
    }
}
