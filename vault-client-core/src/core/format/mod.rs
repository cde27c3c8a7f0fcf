//! Balance display formatting
//!
//! Pure helpers turning balances into the short strings shown next to tokens.
//! Zero is `0`, whole numbers print as integers, and the rest pick a precision
//! by magnitude: 6 places under 0.0001, 4 under 1, 2 under 1000 (a `.00`
//! result collapses to the integer), integer truncation from 1000 up.

use crate::core::amount::{pow10, AmountParseError, TokenAmount};
use crate::shared::constants::{
    FORMAT_MEDIUM_DECIMALS, FORMAT_SMALL_DECIMALS, FORMAT_TINY_DECIMALS, MAX_TOKEN_DECIMALS,
};
use ethers::types::U256;

/// Format a decimal balance string. Unreadable input shows as `0`.
pub fn format_balance(balance: &str, decimals: u8) -> String {
    let fraction_digits = balance
        .trim()
        .split_once('.')
        .map(|(_, fraction)| fraction.len())
        .unwrap_or(0);
    let scale = decimals.max(fraction_digits.min(MAX_TOKEN_DECIMALS as usize) as u8);

    match TokenAmount::parse(balance, scale) {
        Ok(amount) => format_token_amount(&amount),
        Err(err @ AmountParseError::UnsupportedDecimals { .. }) => {
            log::warn!("Cannot display balance {:?}: {}", balance, err);
            "0".to_string()
        }
        Err(err) => {
            log::debug!("Unreadable balance {:?}: {}", balance, err);
            "0".to_string()
        }
    }
}

pub fn format_token_amount(amount: &TokenAmount) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let (whole, _) = amount.split();
    if amount.is_integral() {
        return whole.to_string();
    }

    if whole.is_zero() {
        if is_below_ten_thousandth(amount) {
            return to_fixed(amount, FORMAT_TINY_DECIMALS);
        }
        return to_fixed(amount, FORMAT_SMALL_DECIMALS);
    }

    if whole < U256::from(1000u64) {
        let fixed = to_fixed(amount, FORMAT_MEDIUM_DECIMALS);
        return match fixed.strip_suffix(".00") {
            Some(integer) => integer.to_string(),
            None => fixed,
        };
    }

    whole.to_string()
}

/// `amount < 0.0001`, compared in base units
fn is_below_ten_thousandth(amount: &TokenAmount) -> bool {
    let Some(unit) = pow10(u32::from(amount.decimals())) else {
        return true;
    };
    match amount.raw().checked_mul(U256::from(10_000u64)) {
        Some(scaled) => scaled < unit,
        None => false,
    }
}

/// Round half-up to `places` fractional digits and render with exactly that many
fn to_fixed(amount: &TokenAmount, places: usize) -> String {
    let decimals = amount.decimals() as usize;
    let scaled = if decimals <= places {
        pow10((places - decimals) as u32)
            .and_then(|factor| amount.raw().checked_mul(factor))
            .unwrap_or(U256::MAX)
    } else {
        match pow10((decimals - places) as u32) {
            Some(divisor) => {
                let (quotient, remainder) = amount.raw().div_mod(divisor);
                if remainder.saturating_mul(U256::from(2u8)) >= divisor {
                    quotient.saturating_add(U256::one())
                } else {
                    quotient
                }
            }
            None => U256::zero(),
        }
    };

    let unit = pow10(places as u32).unwrap_or(U256::one());
    let (whole, fraction) = scaled.div_mod(unit);
    format!("{}.{:0>width$}", whole, fraction.to_string(), width = places)
}
