//! Vault Client Core
//!
//! Client-side logic for a multi-chain custodial vault contract: deposit,
//! withdraw and internal transfer of native coin and ERC-20 tokens, one at a
//! time or as a multi-token batch.
//!
//! ## Architecture
//!
//! - **Core**: amounts, formatting, validation, operation registry, batch
//!   orchestration, rate-limit gating, wallet network switching
//! - **Domain**: entities and the collaborator traits (wallet provider, vault
//!   gateway, token and rate-limit sources)
//! - **Infrastructure**: environment config, JSON-RPC wallet provider, vault
//!   gateway signing through the wallet
//! - **Shared**: common types, constants, errors and utilities
//!
//! ## Usage
//!
//! ```rust,no_run
//! use vault_client_core::{init_vault_client, OperationKind};
//! # async fn run(
//! #     tokens: &dyn vault_client_core::TokenSource,
//! #     limits: &dyn vault_client_core::RateLimitSource,
//! # ) -> vault_client_core::VaultResult<()> {
//! let client = init_vault_client()?;
//! let account = client.connect().await?;
//! let mut session = client
//!     .open_batch(OperationKind::Deposit, &account, tokens, limits)
//!     .await?;
//! let first = session.selectable_tokens().remove(0);
//! session.batch.add_token(first);
//! session.batch.set_amount(0, "1.5")?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod shared;

use std::sync::Arc;

pub use crate::core::amount::TokenAmount;
pub use crate::core::batch::{AddTokenOutcome, BatchSubmitter, MultiTokenBatch};
pub use crate::core::format::{format_balance, format_token_amount};
pub use crate::core::network::{NetworkConnector, SwitchOutcome};
pub use crate::core::registry::{OperationRegistry, RegistrySubmitter};
pub use crate::domain::entities::{OperationRequest, SupportedNetwork, Token, VaultCall};
pub use crate::domain::repositories::{RateLimitSource, TokenSource, VaultGateway, WalletProvider};
pub use crate::infrastructure::{ClientConfig, HttpWalletProvider, WalletVaultGateway};
pub use crate::shared::error::{ProviderError, VaultError};
pub use crate::shared::types::{
    Address, OperationKind, RateLimitStatus, TransactionHash, VaultResult,
};

pub use crate::shared::constants::{NAME, VERSION};

/// Initialize logging; safe to call more than once
pub fn init() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Build a client from `.env` and the environment, talking to the configured
/// wallet RPC endpoint when one is set
pub fn init_vault_client() -> VaultResult<VaultClient<HttpWalletProvider>> {
    let config = ClientConfig::from_env()?;
    let provider = config.wallet_rpc_url.clone().map(HttpWalletProvider::new);
    if provider.is_none() {
        log::warn!("No wallet provider configured; network switching is unavailable");
    }
    Ok(VaultClient::new(config, provider))
}

/// A batch form session together with the tokens the user can pick from
pub struct BatchSession {
    pub batch: MultiTokenBatch,
    pub available_tokens: Vec<Token>,
}

impl BatchSession {
    /// Available tokens minus those already in the batch
    pub fn selectable_tokens(&self) -> Vec<Token> {
        self.batch.selectable_tokens(&self.available_tokens)
    }
}

/// Entry point tying configuration, the operation registry and the wallet together
pub struct VaultClient<P: WalletProvider> {
    config: ClientConfig,
    registry: Arc<OperationRegistry>,
    connector: NetworkConnector<P>,
}

impl<P: WalletProvider> VaultClient<P> {
    pub fn new(config: ClientConfig, provider: Option<P>) -> Self {
        let connector =
            NetworkConnector::new(provider).with_rpc_overrides(config.rpc_overrides.clone());
        Self {
            config,
            registry: Arc::new(OperationRegistry::with_default_handlers()),
            connector,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn registry(&self) -> Arc<OperationRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn connector(&self) -> &NetworkConnector<P> {
        &self.connector
    }

    /// Ask the wallet for its accounts and move it onto the default network
    pub async fn connect(&self) -> VaultResult<Address> {
        let account = self
            .connector
            .request_accounts()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| VaultError::network("Wallet returned no accounts"))?;

        let network = self.config.default_network;
        if self.connector.current_network().await? != Some(network) {
            self.connector.switch_network(network).await?;
        }
        log::info!("Connected {} on {}", account, network.name());
        Ok(account)
    }

    pub async fn switch_network(&self, network: SupportedNetwork) -> VaultResult<SwitchOutcome> {
        self.connector.switch_network(network).await
    }

    /// Open a batch session for `account`. Deposits pick from wallet
    /// balances, withdrawals and transfers from vault balances. A rate limit
    /// that cannot be read leaves submission ungated.
    pub async fn open_batch(
        &self,
        kind: OperationKind,
        account: &str,
        tokens: &dyn TokenSource,
        limits: &dyn RateLimitSource,
    ) -> VaultResult<BatchSession> {
        let available_tokens = match kind {
            OperationKind::Deposit => tokens.wallet_tokens(account).await?,
            OperationKind::Withdraw | OperationKind::Transfer => {
                tokens.vault_tokens(account).await?
            }
        };

        let rate_limit = match limits.rate_limit_status(account).await {
            Ok(status) => Some(status),
            Err(err) => {
                log::warn!("Could not read rate limit for {}: {}", account, err);
                None
            }
        };

        let mut batch = MultiTokenBatch::new(kind);
        batch.open();
        batch.set_sender(Some(account.to_string()));
        batch.set_rate_limit(rate_limit);

        Ok(BatchSession {
            batch,
            available_tokens,
        })
    }

    /// Submitter for batch sessions, sending through `gateway`
    pub fn submitter(&self, gateway: Arc<dyn VaultGateway>) -> RegistrySubmitter {
        RegistrySubmitter::new(self.registry(), gateway)
    }

    /// Validate and send a single-token or batch request
    pub async fn execute(
        &self,
        request: &OperationRequest,
        gateway: &dyn VaultGateway,
    ) -> VaultResult<TransactionHash> {
        self.registry.dispatch(request, gateway).await
    }
}
