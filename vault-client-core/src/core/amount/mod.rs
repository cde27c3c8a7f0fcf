//! Fixed-point token amounts
//!
//! Amounts and balances arrive as human decimal strings ("1.25"). They are
//! converted to integer base units scaled by the token's decimals before any
//! comparison, so an 18-decimal balance never loses precision.

use crate::shared::constants::{
    MAX_TOKEN_DECIMALS, MIN_AMOUNT_FALLBACK_EXPONENT, MIN_AMOUNT_TIERS,
};
use ethers::types::U256;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountParseError {
    #[error("amount is empty")]
    Empty,
    #[error("amount is not a plain decimal number")]
    Malformed,
    #[error("amount has more than {decimals} decimal places")]
    TooPrecise { decimals: u8 },
    #[error("amount is too large")]
    Overflow,
    #[error("token precision of {decimals} decimals is not supported")]
    UnsupportedDecimals { decimals: u8 },
}

/// Quantity of one token in base units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenAmount {
    raw: U256,
    decimals: u8,
}

/// `10^exponent`, or `None` when it does not fit in 256 bits
pub fn pow10(exponent: u32) -> Option<U256> {
    let ten = U256::from(10u8);
    let mut value = U256::one();
    for _ in 0..exponent {
        value = value.checked_mul(ten)?;
    }
    Some(value)
}

impl TokenAmount {
    pub fn from_raw(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    pub fn zero(decimals: u8) -> Self {
        Self::from_raw(U256::zero(), decimals)
    }

    /// Parse a human decimal string (`12`, `12.5`, `.5`).
    /// Signs, exponents and separators are rejected. Fractional digits beyond
    /// `decimals` are accepted only when they are zeros.
    pub fn parse(input: &str, decimals: u8) -> Result<Self, AmountParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AmountParseError::Empty);
        }
        if decimals > MAX_TOKEN_DECIMALS {
            return Err(AmountParseError::UnsupportedDecimals { decimals });
        }

        let (whole, mut fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(AmountParseError::Malformed);
        }
        let is_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if !is_digits(whole) || !is_digits(fraction) {
            return Err(AmountParseError::Malformed);
        }

        let scale = decimals as usize;
        if fraction.len() > scale {
            let (kept, extra) = fraction.split_at(scale);
            if extra.chars().any(|c| c != '0') {
                return Err(AmountParseError::TooPrecise { decimals });
            }
            fraction = kept;
        }

        let mut digits = String::with_capacity(whole.len() + scale);
        digits.push_str(whole);
        digits.push_str(fraction);
        digits.extend(std::iter::repeat('0').take(scale - fraction.len()));

        let significant = digits.trim_start_matches('0');
        if significant.is_empty() {
            return Ok(Self::zero(decimals));
        }
        let raw = U256::from_dec_str(significant).map_err(|_| AmountParseError::Overflow)?;
        Ok(Self::from_raw(raw, decimals))
    }

    /// Smallest amount the vault front-end accepts for a token with `decimals`:
    /// 10^-6 up to 6 decimals, 10^-9 up to 12, 10^-18 otherwise, never below
    /// one base unit.
    pub fn minimum_for_decimals(decimals: u8) -> Self {
        let exponent = MIN_AMOUNT_TIERS
            .iter()
            .find(|(max_decimals, _)| decimals <= *max_decimals)
            .map(|(_, exponent)| *exponent)
            .unwrap_or(MIN_AMOUNT_FALLBACK_EXPONENT);

        let raw = if decimals > exponent {
            pow10(u32::from(decimals - exponent)).unwrap_or(U256::MAX)
        } else {
            U256::one()
        };
        Self::from_raw(raw, decimals)
    }

    pub fn raw(&self) -> U256 {
        self.raw
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// Integer part and fractional base units
    pub fn split(&self) -> (U256, U256) {
        match pow10(u32::from(self.decimals)) {
            Some(unit) => self.raw.div_mod(unit),
            // 10^decimals exceeds any U256, so everything is fractional
            None => (U256::zero(), self.raw),
        }
    }

    pub fn is_integral(&self) -> bool {
        self.split().1.is_zero()
    }

    /// Exact decimal representation with trailing zeros removed
    pub fn to_decimal_string(&self) -> String {
        let (whole, fraction) = self.split();
        if fraction.is_zero() {
            return whole.to_string();
        }
        let padded = format!("{:0>width$}", fraction.to_string(), width = self.decimals as usize);
        format!("{}.{}", whole, padded.trim_end_matches('0'))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}
