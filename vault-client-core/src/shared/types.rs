use serde::{Deserialize, Serialize};
use std::fmt;

// Basic types for vault operations
pub type Address = String;
pub type TransactionHash = String;
pub type ChainId = u64;

/// What the user wants the vault to do
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Deposit,
    Withdraw,
    Transfer,
}

impl OperationKind {
    /// Internal transfers move balances between vault accounts and need a recipient
    pub fn requires_recipient(&self) -> bool {
        matches!(self, OperationKind::Transfer)
    }

    pub fn label(&self) -> &'static str {
        match self {
            OperationKind::Deposit => "deposit",
            OperationKind::Withdraw => "withdraw",
            OperationKind::Transfer => "transfer",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which asset shape the operation moves
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Native,
    Token,
    MultiToken,
}

impl AssetKind {
    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::Native => "native",
            AssetKind::Token => "token",
            AssetKind::MultiToken => "multi_token",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One (token, amount) pair handed to a submission collaborator.
/// `amount` is the human decimal string the user typed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransferItem {
    pub token_address: Address,
    pub amount: String,
}

/// External per-account transaction cap, read-only on this side
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitStatus {
    pub remaining: u32,
    pub total: u32,
    #[serde(alias = "resetTime")]
    pub reset_time_epoch_ms: u64,
}

/// Lifecycle of one batch submission
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    AwaitingConfirmation(TransactionHash),
    Confirmed(TransactionHash),
    Failed(String),
}

impl SubmissionState {
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            SubmissionState::Submitting | SubmissionState::AwaitingConfirmation(_)
        )
    }
}

// Result types for better error handling
pub type VaultResult<T> = Result<T, crate::shared::error::VaultError>;
