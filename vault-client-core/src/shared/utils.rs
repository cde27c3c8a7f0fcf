//! Utility functions for the vault client core
//!
//! This module contains common utility functions used throughout the vault client core.

use crate::shared::constants::NATIVE_TOKEN_ADDRESS;
use crate::shared::error::VaultError;
use std::time::{SystemTime, UNIX_EPOCH};

/// Get current timestamp in milliseconds
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| std::time::Duration::from_secs(0))
        .as_millis() as u64
}

/// Validate Ethereum address format (`0x` followed by 40 hex digits, no checksum)
pub fn validate_ethereum_address(address: &str) -> Result<(), VaultError> {
    if !address.starts_with("0x") {
        return Err(VaultError::validation("Address must start with 0x"));
    }

    if address.len() != 42 {
        return Err(VaultError::validation("Address must be 42 characters long"));
    }

    // Check if all characters after 0x are valid hex
    if !address[2..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(VaultError::validation("Address contains invalid hex characters"));
    }

    Ok(())
}

pub fn is_valid_address(address: &str) -> bool {
    validate_ethereum_address(address).is_ok()
}

/// Addresses compare without regard to checksum casing
pub fn addresses_equal(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

pub fn is_native_address(address: &str) -> bool {
    addresses_equal(address, NATIVE_TOKEN_ADDRESS)
}

/// Hex chain id as wallets expect it (`0xaa36a7`, no zero padding)
pub fn to_hex_chain_id(chain_id: u64) -> String {
    format!("0x{:x}", chain_id)
}

pub fn parse_hex_chain_id(value: &str) -> Result<u64, VaultError> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| VaultError::validation(format!("Chain id must be hex: {}", value)))?;
    u64::from_str_radix(digits, 16)
        .map_err(|_| VaultError::validation(format!("Invalid hex chain id: {}", value)))
}
