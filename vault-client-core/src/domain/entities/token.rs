//! Token entity for the vault client core

use crate::core::amount::TokenAmount;
use crate::core::format::format_token_amount;
use crate::shared::constants::NATIVE_TOKEN_ADDRESS;
use crate::shared::types::Address;
use crate::shared::utils::{addresses_equal, is_native_address};
use serde::{Deserialize, Serialize};

/// Snapshot of one asset as reported by the balance source.
/// `balance` is a human decimal string for the acting account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub address: Address,
    pub symbol: String,
    pub balance: String,
    pub decimals: u8,
    #[serde(default)]
    pub is_native: bool,
}

impl Token {
    pub fn new(
        address: impl Into<String>,
        symbol: impl Into<String>,
        balance: impl Into<String>,
        decimals: u8,
    ) -> Self {
        let address = address.into();
        let is_native = is_native_address(&address);
        Self {
            address,
            symbol: symbol.into(),
            balance: balance.into(),
            decimals,
            is_native,
        }
    }

    /// The chain's native coin, listed under the zero sentinel address
    pub fn native(symbol: impl Into<String>, balance: impl Into<String>, decimals: u8) -> Self {
        Self::new(NATIVE_TOKEN_ADDRESS, symbol, balance, decimals)
    }

    pub fn is_native_asset(&self) -> bool {
        self.is_native || is_native_address(&self.address)
    }

    pub fn has_address(&self, address: &str) -> bool {
        addresses_equal(&self.address, address)
    }

    /// Balance in base units; an unreadable balance counts as zero
    pub fn balance_amount(&self) -> TokenAmount {
        TokenAmount::parse(&self.balance, self.decimals).unwrap_or_else(|err| {
            log::warn!("Unreadable {} balance {:?}: {}", self.symbol, self.balance, err);
            TokenAmount::zero(self.decimals)
        })
    }

    pub fn formatted_balance(&self) -> String {
        format_token_amount(&self.balance_amount())
    }
}
