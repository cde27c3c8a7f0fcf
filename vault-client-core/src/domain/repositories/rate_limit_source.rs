//! Read-only view of the vault's per-account rate limit

use crate::shared::types::{RateLimitStatus, VaultResult};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// Rate limit source trait
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RateLimitSource: Send + Sync {
    async fn rate_limit_status(&self, account: &str) -> VaultResult<RateLimitStatus>;
}
