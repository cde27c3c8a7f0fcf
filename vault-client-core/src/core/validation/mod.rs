//! Form validation shared by every vault operation
//!
//! Single-token and multi-token deposit, withdraw and transfer all validate
//! through these functions. Failures are field-level messages, never errors.

use crate::core::amount::{AmountParseError, TokenAmount};
use crate::domain::entities::{OperationRequest, Token};
use crate::shared::constants::MAX_BATCH_SIZE;
use crate::shared::types::{AssetKind, OperationKind};
use crate::shared::utils::{addresses_equal, is_valid_address};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an amount field is not acceptable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountIssue {
    Required,
    Invalid,
    TooPrecise { decimals: u8 },
    NotPositive,
    BelowMinimum { minimum: TokenAmount },
    ExceedsBalance,
    UnsupportedDecimals { decimals: u8 },
}

impl fmt::Display for AmountIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountIssue::Required => write!(f, "Amount is required"),
            AmountIssue::Invalid => write!(f, "Invalid amount"),
            AmountIssue::TooPrecise { decimals } => {
                write!(f, "Maximum {} decimal places", decimals)
            }
            AmountIssue::NotPositive => write!(f, "Amount must be greater than 0"),
            AmountIssue::BelowMinimum { minimum } => write!(f, "Minimum amount is {}", minimum),
            AmountIssue::ExceedsBalance => write!(f, "Insufficient balance"),
            AmountIssue::UnsupportedDecimals { decimals } => {
                write!(f, "Unsupported token precision ({} decimals)", decimals)
            }
        }
    }
}

/// Why a recipient field is not acceptable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientIssue {
    Required,
    InvalidFormat,
    SelfTransfer,
}

impl fmt::Display for RecipientIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipientIssue::Required => write!(f, "Recipient address is required"),
            RecipientIssue::InvalidFormat => write!(f, "Invalid recipient address"),
            RecipientIssue::SelfTransfer => write!(f, "Cannot transfer to yourself"),
        }
    }
}

/// Outcome of validating a whole request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn reject(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(message.into());
    }
}

/// Check one amount against the token's minimum and its known balance
pub fn validate_amount(amount: &str, token: &Token) -> Result<TokenAmount, AmountIssue> {
    let parsed = TokenAmount::parse(amount, token.decimals).map_err(|err| match err {
        AmountParseError::Empty => AmountIssue::Required,
        AmountParseError::TooPrecise { decimals } => AmountIssue::TooPrecise { decimals },
        AmountParseError::Malformed | AmountParseError::Overflow => AmountIssue::Invalid,
        AmountParseError::UnsupportedDecimals { decimals } => {
            AmountIssue::UnsupportedDecimals { decimals }
        }
    })?;

    if parsed.is_zero() {
        return Err(AmountIssue::NotPositive);
    }

    let minimum = TokenAmount::minimum_for_decimals(token.decimals);
    if parsed.raw() < minimum.raw() {
        return Err(AmountIssue::BelowMinimum { minimum });
    }

    if parsed.raw() > token.balance_amount().raw() {
        return Err(AmountIssue::ExceedsBalance);
    }

    Ok(parsed)
}

/// Recipient must be `0x` + 40 hex digits and, when the sender is known, someone else
pub fn validate_recipient(recipient: &str, sender: Option<&str>) -> Result<(), RecipientIssue> {
    if recipient.is_empty() {
        return Err(RecipientIssue::Required);
    }
    if !is_valid_address(recipient) {
        return Err(RecipientIssue::InvalidFormat);
    }
    if sender.is_some_and(|sender| addresses_equal(sender, recipient)) {
        return Err(RecipientIssue::SelfTransfer);
    }
    Ok(())
}

/// Index of the first token whose address already appeared earlier in the list
pub fn find_duplicate_token<'a, I>(tokens: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a Token>,
{
    let mut seen: Vec<String> = Vec::new();
    for (index, token) in tokens.into_iter().enumerate() {
        let key = token.address.to_ascii_lowercase();
        if seen.contains(&key) {
            return Some(index);
        }
        seen.push(key);
    }
    None
}

/// Validate a complete request; collects every problem rather than stopping at the first
pub fn validate_request(request: &OperationRequest) -> ValidationReport {
    let mut report = ValidationReport::ok();

    if request.entries.is_empty() {
        report.reject("Select at least one token");
    }

    match request.asset {
        AssetKind::Native | AssetKind::Token if request.entries.len() > 1 => {
            report.reject("Single-asset operations take exactly one token");
        }
        AssetKind::MultiToken if request.entries.len() > MAX_BATCH_SIZE => {
            report.reject(format!("At most {} tokens per batch", MAX_BATCH_SIZE));
        }
        _ => {}
    }

    for entry in &request.entries {
        let native = entry.token.is_native_asset();
        match request.asset {
            AssetKind::Native if !native => {
                report.reject(format!("{} is not the native coin", entry.token.symbol));
            }
            AssetKind::Token if native => {
                report.reject(format!(
                    "{} must use a native {} operation",
                    entry.token.symbol, request.kind
                ));
            }
            AssetKind::MultiToken if native && request.kind == OperationKind::Transfer => {
                report.reject(format!("{} cannot be transferred in a batch", entry.token.symbol));
            }
            _ => {}
        }

        if let Err(issue) = validate_amount(&entry.amount, &entry.token) {
            report.reject(format!("{}: {}", entry.token.symbol, issue));
        }
    }

    if find_duplicate_token(request.entries.iter().map(|e| &e.token)).is_some() {
        report.reject("Each token can only appear once");
    }

    if request.kind.requires_recipient() {
        let recipient = request.recipient.as_deref().unwrap_or("");
        if let Err(issue) = validate_recipient(recipient, request.sender.as_deref()) {
            report.reject(issue.to_string());
        }
    }

    if !report.valid {
        log::debug!(
            "Rejected {} {} request: {:?}",
            request.asset,
            request.kind,
            report.errors
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::OperationEntry;
    use proptest::prelude::*;

    const RECIPIENT: &str = "0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6";

    fn usdc(balance: &str) -> Token {
        Token::new("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", "USDC", balance, 6)
    }

    fn dai(balance: &str) -> Token {
        Token::new("0x6B175474E89094C44Da98b954EedeAC495271d0F", "DAI", balance, 18)
    }

    #[test]
    fn test_amount_messages() {
        let token = usdc("100");
        assert_eq!(validate_amount("", &token), Err(AmountIssue::Required));
        assert_eq!(validate_amount("abc", &token), Err(AmountIssue::Invalid));
        assert_eq!(validate_amount("0", &token), Err(AmountIssue::NotPositive));
        assert_eq!(validate_amount("0.0000001", &token), Err(AmountIssue::TooPrecise { decimals: 6 }));
        assert_eq!(validate_amount("100.000001", &token), Err(AmountIssue::ExceedsBalance));
        assert!(validate_amount("100", &token).is_ok());

        assert_eq!(AmountIssue::ExceedsBalance.to_string(), "Insufficient balance");
    }

    #[test]
    fn test_oversized_precision_is_rejected() {
        let token = Token::new("0x6B175474E89094C44Da98b954EedeAC495271d0F", "HUGE", "1.5", 77);
        let issue = validate_amount("1", &token).unwrap_err();
        assert_eq!(issue, AmountIssue::UnsupportedDecimals { decimals: 77 });
        assert_eq!(issue.to_string(), "Unsupported token precision (77 decimals)");
    }

    #[test]
    fn test_minimum_applies_to_high_precision_tokens() {
        let token = Token::new("0x6B175474E89094C44Da98b954EedeAC495271d0F", "WBTC24", "1", 24);
        let issue = validate_amount("0.0000000000000000001", &token).unwrap_err();
        assert_eq!(issue.to_string(), "Minimum amount is 0.000000000000000001");
        assert!(validate_amount("0.000000000000000001", &token).is_ok());
    }

    #[test]
    fn test_balance_compare_is_exact() {
        // Floats would call these equal
        let token = dai("1.000000000000000001");
        assert!(validate_amount("1.000000000000000001", &token).is_ok());
        assert_eq!(
            validate_amount("1.000000000000000002", &token),
            Err(AmountIssue::ExceedsBalance)
        );
    }

    #[test]
    fn test_recipient_rules() {
        assert_eq!(validate_recipient("", None), Err(RecipientIssue::Required));
        assert_eq!(validate_recipient("0x1234", None), Err(RecipientIssue::InvalidFormat));
        assert_eq!(
            validate_recipient(RECIPIENT, Some(&RECIPIENT.to_lowercase())),
            Err(RecipientIssue::SelfTransfer)
        );
        assert!(validate_recipient(RECIPIENT, None).is_ok());
    }

    #[test]
    fn test_find_duplicate_token_ignores_case() {
        let a = usdc("1");
        let mut b = usdc("2");
        b.address = b.address.to_lowercase();
        let tokens = vec![dai("1"), a, b];
        assert_eq!(find_duplicate_token(&tokens), Some(2));
        assert_eq!(find_duplicate_token(&tokens[..2]), None);
    }

    #[test]
    fn test_validate_request_collects_errors() {
        let request = OperationRequest::multi(
            OperationKind::Transfer,
            vec![
                OperationEntry::new(usdc("5"), "10"),
                OperationEntry::new(Token::native("ETH", "1", 18), "0.1"),
            ],
        );
        let report = validate_request(&request);

        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e == "USDC: Insufficient balance"));
        assert!(report.errors.iter().any(|e| e == "ETH cannot be transferred in a batch"));
        assert!(report.errors.iter().any(|e| e == "Recipient address is required"));
    }

    #[test]
    fn test_validate_request_accepts_good_transfer() {
        let request = OperationRequest::multi(
            OperationKind::Transfer,
            vec![
                OperationEntry::new(usdc("5"), "1.5"),
                OperationEntry::new(dai("2"), "2"),
            ],
        )
        .with_recipient(RECIPIENT);

        assert_eq!(validate_request(&request), ValidationReport::ok());
    }

    #[test]
    fn test_single_native_request() {
        let good = OperationRequest::single(OperationKind::Deposit, Token::native("BNB", "3", 18), "1");
        assert!(validate_request(&good).valid);

        let mut wrong_asset = good.clone();
        wrong_asset.entries[0].token = usdc("3");
        assert!(!validate_request(&wrong_asset).valid);
    }

    proptest! {
        #[test]
        fn prop_minimum_is_accepted_and_one_unit_less_is_not(decimals in 0u8..=30) {
            let minimum = TokenAmount::minimum_for_decimals(decimals);
            let token = Token::new(RECIPIENT, "TKN", "1000000", decimals);

            prop_assert!(validate_amount(&minimum.to_decimal_string(), &token).is_ok());

            let below = TokenAmount::from_raw(minimum.raw() - ethers::types::U256::one(), decimals);
            prop_assert!(validate_amount(&below.to_decimal_string(), &token).is_err());
        }
    }
}
