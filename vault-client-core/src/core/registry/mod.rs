//! Operation registry
//!
//! Maps every (operation kind, asset kind) pair to the handler that validates
//! the request and turns it into a vault call. The table is built once by the
//! owner and passed around explicitly.

use crate::core::amount::TokenAmount;
use crate::core::batch::{BatchSubmission, BatchSubmitter};
use crate::core::validation::{validate_request, ValidationReport};
use crate::domain::entities::{OperationEntry, OperationRequest, VaultCall};
use crate::domain::repositories::VaultGateway;
use crate::shared::error::VaultError;
use crate::shared::types::{Address, AssetKind, OperationKind, TransactionHash, VaultResult};
use async_trait::async_trait;
use ethers::types::U256;
use std::collections::HashMap;
use std::sync::Arc;

/// Validates and encodes one kind of vault operation
pub trait OperationHandler: Send + Sync {
    fn kind(&self) -> OperationKind;

    fn asset(&self) -> AssetKind;

    fn validate(&self, request: &OperationRequest) -> ValidationReport {
        validate_request(request)
    }

    /// Build the contract call. Only called on requests that passed `validate`.
    fn to_call(&self, request: &OperationRequest) -> VaultResult<VaultCall>;
}

fn base_units(entry: &OperationEntry) -> VaultResult<U256> {
    TokenAmount::parse(&entry.amount, entry.token.decimals)
        .map(|amount| amount.raw())
        .map_err(|err| VaultError::validation(format!("{}: {}", entry.token.symbol, err)))
}

fn single_entry(request: &OperationRequest) -> VaultResult<&OperationEntry> {
    match request.entries.as_slice() {
        [entry] => Ok(entry),
        entries => Err(VaultError::validation(format!(
            "Expected exactly one token, got {}",
            entries.len()
        ))),
    }
}

fn recipient(request: &OperationRequest) -> VaultResult<Address> {
    request
        .recipient
        .clone()
        .ok_or_else(|| VaultError::validation("Recipient address is required"))
}

pub struct NativeHandler {
    kind: OperationKind,
}

impl NativeHandler {
    pub fn new(kind: OperationKind) -> Self {
        Self { kind }
    }
}

impl OperationHandler for NativeHandler {
    fn kind(&self) -> OperationKind {
        self.kind
    }

    fn asset(&self) -> AssetKind {
        AssetKind::Native
    }

    fn to_call(&self, request: &OperationRequest) -> VaultResult<VaultCall> {
        let amount = base_units(single_entry(request)?)?;
        Ok(match self.kind {
            OperationKind::Deposit => VaultCall::DepositNative { amount },
            OperationKind::Withdraw => VaultCall::WithdrawNative { amount },
            OperationKind::Transfer => VaultCall::TransferNative {
                to: recipient(request)?,
                amount,
            },
        })
    }
}

pub struct TokenHandler {
    kind: OperationKind,
}

impl TokenHandler {
    pub fn new(kind: OperationKind) -> Self {
        Self { kind }
    }
}

impl OperationHandler for TokenHandler {
    fn kind(&self) -> OperationKind {
        self.kind
    }

    fn asset(&self) -> AssetKind {
        AssetKind::Token
    }

    fn to_call(&self, request: &OperationRequest) -> VaultResult<VaultCall> {
        let entry = single_entry(request)?;
        let token = entry.token.address.clone();
        let amount = base_units(entry)?;
        Ok(match self.kind {
            OperationKind::Deposit => VaultCall::DepositToken { token, amount },
            OperationKind::Withdraw => VaultCall::WithdrawToken { token, amount },
            OperationKind::Transfer => VaultCall::TransferToken {
                token,
                to: recipient(request)?,
                amount,
            },
        })
    }
}

pub struct MultiTokenHandler {
    kind: OperationKind,
}

impl MultiTokenHandler {
    pub fn new(kind: OperationKind) -> Self {
        Self { kind }
    }
}

impl OperationHandler for MultiTokenHandler {
    fn kind(&self) -> OperationKind {
        self.kind
    }

    fn asset(&self) -> AssetKind {
        AssetKind::MultiToken
    }

    fn to_call(&self, request: &OperationRequest) -> VaultResult<VaultCall> {
        let tokens = request
            .entries
            .iter()
            .map(|entry| entry.token.address.clone())
            .collect();
        let amounts = request
            .entries
            .iter()
            .map(base_units)
            .collect::<VaultResult<Vec<_>>>()?;

        Ok(match self.kind {
            OperationKind::Deposit => VaultCall::DepositMultipleTokens { tokens, amounts },
            OperationKind::Withdraw => VaultCall::WithdrawMultipleTokens { tokens, amounts },
            OperationKind::Transfer => VaultCall::TransferMultipleTokens {
                to: recipient(request)?,
                tokens,
                amounts,
            },
        })
    }
}

/// Dispatch table from (operation, asset) to handler
#[derive(Default)]
pub struct OperationRegistry {
    handlers: HashMap<(OperationKind, AssetKind), Box<dyn OperationHandler>>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry covering deposit, withdraw and transfer for native, single and multi-token assets
    pub fn with_default_handlers() -> Self {
        let mut registry = Self::new();
        for kind in [OperationKind::Deposit, OperationKind::Withdraw, OperationKind::Transfer] {
            registry.register(Box::new(NativeHandler::new(kind)));
            registry.register(Box::new(TokenHandler::new(kind)));
            registry.register(Box::new(MultiTokenHandler::new(kind)));
        }
        registry
    }

    /// Add a handler, returning the one it replaces
    pub fn register(
        &mut self,
        handler: Box<dyn OperationHandler>,
    ) -> Option<Box<dyn OperationHandler>> {
        self.handlers.insert((handler.kind(), handler.asset()), handler)
    }

    pub fn handler(&self, kind: OperationKind, asset: AssetKind) -> Option<&dyn OperationHandler> {
        self.handlers.get(&(kind, asset)).map(|handler| handler.as_ref())
    }

    pub fn supports(&self, kind: OperationKind, asset: AssetKind) -> bool {
        self.handlers.contains_key(&(kind, asset))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Validate a request and build its vault call without sending anything
    pub fn prepare(&self, request: &OperationRequest) -> VaultResult<VaultCall> {
        let handler = self.handler(request.kind, request.asset).ok_or_else(|| {
            VaultError::unsupported(format!("{} {}", request.asset, request.kind))
        })?;

        let report = handler.validate(request);
        if !report.valid {
            return Err(VaultError::validation(report.errors.join("; ")));
        }
        handler.to_call(request)
    }

    pub async fn dispatch(
        &self,
        request: &OperationRequest,
        gateway: &dyn VaultGateway,
    ) -> VaultResult<TransactionHash> {
        let call = self.prepare(request)?;
        log::info!(
            "Dispatching {} with {} token(s)",
            call.method_name(),
            call.token_count()
        );
        match gateway.execute(&call).await {
            Ok(hash) => {
                log::info!("{} broadcast as {}", call.method_name(), hash);
                Ok(hash)
            }
            Err(err) => {
                log::warn!("{} failed: {}", call.method_name(), err);
                Err(err)
            }
        }
    }
}

/// Batch submitter that routes through the registry to the vault gateway
pub struct RegistrySubmitter {
    registry: Arc<OperationRegistry>,
    gateway: Arc<dyn VaultGateway>,
}

impl RegistrySubmitter {
    pub fn new(registry: Arc<OperationRegistry>, gateway: Arc<dyn VaultGateway>) -> Self {
        Self { registry, gateway }
    }
}

#[async_trait]
impl BatchSubmitter for RegistrySubmitter {
    async fn submit_batch(&self, submission: &BatchSubmission) -> VaultResult<TransactionHash> {
        let request = submission.to_request()?;
        self.registry.dispatch(&request, self.gateway.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Token;
    use crate::domain::repositories::MockVaultGateway;

    const RECIPIENT: &str = "0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6";

    fn usdc() -> Token {
        Token::new("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", "USDC", "50", 6)
    }

    fn dai() -> Token {
        Token::new("0x6B175474E89094C44Da98b954EedeAC495271d0F", "DAI", "50", 18)
    }

    #[test]
    fn test_default_registry_covers_every_pair() {
        let registry = OperationRegistry::with_default_handlers();
        assert_eq!(registry.len(), 9);
        for kind in [OperationKind::Deposit, OperationKind::Withdraw, OperationKind::Transfer] {
            for asset in [AssetKind::Native, AssetKind::Token, AssetKind::MultiToken] {
                assert!(registry.supports(kind, asset), "missing {asset} {kind}");
            }
        }
    }

    #[test]
    fn test_empty_registry_rejects_everything() {
        let registry = OperationRegistry::new();
        let request = OperationRequest::single(OperationKind::Deposit, usdc(), "1");
        assert!(matches!(
            registry.prepare(&request),
            Err(VaultError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_prepare_native_deposit() {
        let registry = OperationRegistry::with_default_handlers();
        let request = OperationRequest::single(OperationKind::Deposit, Token::native("ETH", "2", 18), "1.5");
        let call = registry.prepare(&request).expect("valid deposit");
        assert_eq!(
            call,
            VaultCall::DepositNative {
                amount: U256::from(1_500_000_000_000_000_000u128)
            }
        );
    }

    #[test]
    fn test_prepare_multi_transfer() {
        let registry = OperationRegistry::with_default_handlers();
        let request = OperationRequest::multi(
            OperationKind::Transfer,
            vec![OperationEntry::new(usdc(), "2.5"), OperationEntry::new(dai(), "0.1")],
        )
        .with_recipient(RECIPIENT);

        let call = registry.prepare(&request).expect("valid transfer");
        assert_eq!(
            call,
            VaultCall::TransferMultipleTokens {
                to: RECIPIENT.to_string(),
                tokens: vec![usdc().address, dai().address],
                amounts: vec![U256::from(2_500_000u64), U256::from(100_000_000_000_000_000u128)],
            }
        );
    }

    #[test]
    fn test_prepare_reports_validation_errors() {
        let registry = OperationRegistry::with_default_handlers();
        let request = OperationRequest::single(OperationKind::Withdraw, usdc(), "51");
        match registry.prepare(&request) {
            Err(VaultError::Validation(message)) => assert!(message.contains("Insufficient balance")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_register_replaces_handler() {
        let mut registry = OperationRegistry::with_default_handlers();
        let previous = registry.register(Box::new(TokenHandler::new(OperationKind::Deposit)));
        assert!(previous.is_some());
        assert_eq!(registry.len(), 9);
    }

    #[tokio::test]
    async fn test_dispatch_forwards_to_gateway() {
        let registry = OperationRegistry::with_default_handlers();
        let mut gateway = MockVaultGateway::new();
        gateway
            .expect_execute()
            .withf(|call| matches!(call, VaultCall::WithdrawToken { .. }))
            .times(1)
            .returning(|_| Ok("0xfeed".to_string()));

        let request = OperationRequest::single(OperationKind::Withdraw, usdc(), "10");
        let hash = registry.dispatch(&request, &gateway).await.expect("dispatch");
        assert_eq!(hash, "0xfeed");
    }

    #[tokio::test]
    async fn test_dispatch_skips_gateway_on_invalid_request() {
        let registry = OperationRegistry::with_default_handlers();
        let mut gateway = MockVaultGateway::new();
        gateway.expect_execute().times(0);

        let request = OperationRequest::single(OperationKind::Transfer, usdc(), "10");
        assert!(registry.dispatch(&request, &gateway).await.is_err());
    }
}
