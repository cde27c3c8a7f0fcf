//! Error handling for the vault client core
//!
//! This module defines the error types used throughout the vault client core.
//! Field-level validation problems inside a batch are not errors: they are
//! stored on the entry as display strings. `VaultError` covers everything that
//! aborts a user action.

use crate::shared::constants::{CHAIN_NOT_ADDED_ERROR_CODE, USER_REJECTED_ERROR_CODE};
use thiserror::Error;

/// Error reported by a wallet provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("provider error {code}: {message}")]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The wallet does not know the requested chain and it must be added first
    pub fn is_chain_not_added(&self) -> bool {
        self.code == CHAIN_NOT_ADDED_ERROR_CODE
    }

    pub fn is_user_rejected(&self) -> bool {
        self.code == USER_REJECTED_ERROR_CODE
    }
}

/// Vault client error type
#[derive(Error, Debug, Clone)]
pub enum VaultError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("No wallet provider detected")]
    NoProvider,

    #[error("Wallet provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Index {index} out of range for batch of {len} entries")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Batch is not ready to submit: {0}")]
    NotReady(String),

    #[error("Rate limit reached, resets in {reset_in_secs}s")]
    RateLimited { reset_in_secs: u64 },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl VaultError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn not_ready(message: impl Into<String>) -> Self {
        Self::NotReady(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedOperation(message.into())
    }

    /// Create a transaction error
    pub fn transaction(message: impl Into<String>) -> Self {
        Self::Transaction(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for VaultError {
    fn from(err: reqwest::Error) -> Self {
        Self::network(format!("HTTP error: {}", err))
    }
}

/// Revert reasons raised by the vault contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractRevert {
    InsufficientBalance,
    ZeroDeposit,
    ZeroWithdrawal,
    ZeroTransfer,
    AmountMustExceedFee,
    InvalidRecipient,
    RateLimitExceeded,
    InvalidInput,
    TooManyBalances,
}

impl ContractRevert {
    const PATTERNS: &'static [(&'static str, ContractRevert)] = &[
        ("insufficient balance", ContractRevert::InsufficientBalance),
        ("zero deposit", ContractRevert::ZeroDeposit),
        ("zero withdrawal", ContractRevert::ZeroWithdrawal),
        ("zero transfer", ContractRevert::ZeroTransfer),
        ("amount must exceed fee", ContractRevert::AmountMustExceedFee),
        ("invalid recipient", ContractRevert::InvalidRecipient),
        ("rate limit exceeded", ContractRevert::RateLimitExceeded),
        ("invalid input", ContractRevert::InvalidInput),
        ("too many balances", ContractRevert::TooManyBalances),
    ];

    /// Match a raw revert message (any case, any surrounding text)
    pub fn from_message(message: &str) -> Option<Self> {
        let lower = message.to_ascii_lowercase();
        Self::PATTERNS
            .iter()
            .find(|(pattern, _)| lower.contains(pattern))
            .map(|(_, revert)| *revert)
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            ContractRevert::InsufficientBalance => "Insufficient vault balance",
            ContractRevert::ZeroDeposit => "Deposit amount must be greater than 0",
            ContractRevert::ZeroWithdrawal => "Withdrawal amount must be greater than 0",
            ContractRevert::ZeroTransfer => "Transfer amount must be greater than 0",
            ContractRevert::AmountMustExceedFee => "Amount must be larger than the vault fee",
            ContractRevert::InvalidRecipient => "Recipient is not valid for this transfer",
            ContractRevert::RateLimitExceeded => "Too many transactions, wait for the rate limit to reset",
            ContractRevert::InvalidInput => "The vault rejected the request parameters",
            ContractRevert::TooManyBalances => "The vault cannot hold another token for this account",
        }
    }
}
