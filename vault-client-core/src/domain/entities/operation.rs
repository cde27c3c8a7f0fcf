//! Vault operations as requested by the user and as sent to the contract

use crate::domain::entities::token::Token;
use crate::shared::types::{Address, AssetKind, OperationKind};
use crate::shared::utils::is_native_address;
use ethers::types::U256;
use serde::Serialize;

/// One token line of a request, amount as typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationEntry {
    pub token: Token,
    pub amount: String,
}

impl OperationEntry {
    pub fn new(token: Token, amount: impl Into<String>) -> Self {
        Self {
            token,
            amount: amount.into(),
        }
    }
}

/// A user action before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    pub kind: OperationKind,
    pub asset: AssetKind,
    pub entries: Vec<OperationEntry>,
    pub recipient: Option<Address>,
    /// Acting account, when known; used to refuse transfers to oneself
    pub sender: Option<Address>,
}

impl OperationRequest {
    pub fn single(kind: OperationKind, token: Token, amount: impl Into<String>) -> Self {
        let asset = if token.is_native_asset() {
            AssetKind::Native
        } else {
            AssetKind::Token
        };
        Self {
            kind,
            asset,
            entries: vec![OperationEntry::new(token, amount)],
            recipient: None,
            sender: None,
        }
    }

    pub fn multi(kind: OperationKind, entries: Vec<OperationEntry>) -> Self {
        Self {
            kind,
            asset: AssetKind::MultiToken,
            entries,
            recipient: None,
            sender: None,
        }
    }

    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }
}

/// Vault entry point with base-unit arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum VaultCall {
    DepositNative { amount: U256 },
    WithdrawNative { amount: U256 },
    TransferNative { to: Address, amount: U256 },
    DepositToken { token: Address, amount: U256 },
    WithdrawToken { token: Address, amount: U256 },
    TransferToken { token: Address, to: Address, amount: U256 },
    DepositMultipleTokens { tokens: Vec<Address>, amounts: Vec<U256> },
    WithdrawMultipleTokens { tokens: Vec<Address>, amounts: Vec<U256> },
    TransferMultipleTokens { to: Address, tokens: Vec<Address>, amounts: Vec<U256> },
}

impl VaultCall {
    pub fn method_name(&self) -> &'static str {
        match self {
            VaultCall::DepositNative { .. } => "depositNative",
            VaultCall::WithdrawNative { .. } => "withdrawNative",
            VaultCall::TransferNative { .. } => "transferInternalNative",
            VaultCall::DepositToken { .. } => "depositToken",
            VaultCall::WithdrawToken { .. } => "withdrawToken",
            VaultCall::TransferToken { .. } => "transferInternalToken",
            VaultCall::DepositMultipleTokens { .. } => "depositMultipleTokens",
            VaultCall::WithdrawMultipleTokens { .. } => "withdrawMultipleTokens",
            VaultCall::TransferMultipleTokens { .. } => "transferMultipleTokensInternal",
        }
    }

    /// Native coin attached to the transaction; only deposits carry value,
    /// and a batch deposit carries the amount listed under the native sentinel
    pub fn attached_value(&self) -> U256 {
        match self {
            VaultCall::DepositNative { amount } => *amount,
            VaultCall::DepositMultipleTokens { tokens, amounts } => tokens
                .iter()
                .zip(amounts)
                .filter(|(token, _)| is_native_address(token))
                .fold(U256::zero(), |total, (_, amount)| total.saturating_add(*amount)),
            _ => U256::zero(),
        }
    }

    pub fn token_count(&self) -> usize {
        match self {
            VaultCall::DepositMultipleTokens { tokens, .. }
            | VaultCall::WithdrawMultipleTokens { tokens, .. }
            | VaultCall::TransferMultipleTokens { tokens, .. } => tokens.len(),
            _ => 1,
        }
    }
}
