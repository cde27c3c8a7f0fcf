//! Transaction submission towards the vault contract

use crate::domain::entities::VaultCall;
use crate::shared::types::{TransactionHash, VaultResult};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// Vault gateway trait
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VaultGateway: Send + Sync {
    /// Send one vault call and return the transaction hash once it is broadcast
    async fn execute(&self, call: &VaultCall) -> VaultResult<TransactionHash>;
}
