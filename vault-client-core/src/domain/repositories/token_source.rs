//! Token lists with balances for the acting account

use crate::domain::entities::Token;
use crate::shared::types::VaultResult;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// Token source trait
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Tokens held in the account's wallet (what can be deposited)
    async fn wallet_tokens(&self, account: &str) -> VaultResult<Vec<Token>>;

    /// Tokens held for the account inside the vault (what can be withdrawn or transferred)
    async fn vault_tokens(&self, account: &str) -> VaultResult<Vec<Token>>;
}
