//! Vault gateway that signs through the wallet
//!
//! Encodes each `VaultCall` as contract calldata and hands it to the wallet
//! with `eth_sendTransaction`; the wallet signs and broadcasts.

use crate::domain::entities::VaultCall;
use crate::domain::repositories::{VaultGateway, WalletProvider};
use crate::shared::constants::METHOD_SEND_TRANSACTION;
use crate::shared::error::{ContractRevert, ProviderError, VaultError};
use crate::shared::types::{Address, TransactionHash, VaultResult};
use crate::shared::utils::validate_ethereum_address;
use async_trait::async_trait;
use ethers::abi::{self, Token as AbiToken};
use ethers::types::{Bytes, H160, U256};
use ethers::utils::id;
use serde_json::json;

fn signature(call: &VaultCall) -> &'static str {
    match call {
        VaultCall::DepositNative { .. } => "depositNative()",
        VaultCall::WithdrawNative { .. } => "withdrawNative(uint256)",
        VaultCall::TransferNative { .. } => "transferInternalNative(address,uint256)",
        VaultCall::DepositToken { .. } => "depositToken(address,uint256)",
        VaultCall::WithdrawToken { .. } => "withdrawToken(address,uint256)",
        VaultCall::TransferToken { .. } => "transferInternalToken(address,address,uint256)",
        VaultCall::DepositMultipleTokens { .. } => "depositMultipleTokens(address[],uint256[])",
        VaultCall::WithdrawMultipleTokens { .. } => "withdrawMultipleTokens(address[],uint256[])",
        VaultCall::TransferMultipleTokens { .. } => {
            "transferMultipleTokensInternal(address,address[],uint256[])"
        }
    }
}

fn address_token(address: &str) -> VaultResult<AbiToken> {
    validate_ethereum_address(address)?;
    let parsed: H160 = address
        .parse()
        .map_err(|_| VaultError::validation(format!("Invalid address: {}", address)))?;
    Ok(AbiToken::Address(parsed))
}

fn address_array(addresses: &[Address]) -> VaultResult<AbiToken> {
    let tokens = addresses
        .iter()
        .map(|address| address_token(address))
        .collect::<VaultResult<Vec<_>>>()?;
    Ok(AbiToken::Array(tokens))
}

fn amount_array(amounts: &[U256]) -> AbiToken {
    AbiToken::Array(amounts.iter().copied().map(AbiToken::Uint).collect())
}

/// Selector followed by the ABI-encoded arguments
pub fn encode_call(call: &VaultCall) -> VaultResult<Bytes> {
    let args = match call {
        VaultCall::DepositNative { .. } => vec![],
        VaultCall::WithdrawNative { amount } => vec![AbiToken::Uint(*amount)],
        VaultCall::TransferNative { to, amount } => {
            vec![address_token(to)?, AbiToken::Uint(*amount)]
        }
        VaultCall::DepositToken { token, amount } | VaultCall::WithdrawToken { token, amount } => {
            vec![address_token(token)?, AbiToken::Uint(*amount)]
        }
        VaultCall::TransferToken { token, to, amount } => {
            vec![address_token(token)?, address_token(to)?, AbiToken::Uint(*amount)]
        }
        VaultCall::DepositMultipleTokens { tokens, amounts }
        | VaultCall::WithdrawMultipleTokens { tokens, amounts } => {
            vec![address_array(tokens)?, amount_array(amounts)]
        }
        VaultCall::TransferMultipleTokens { to, tokens, amounts } => {
            vec![address_token(to)?, address_array(tokens)?, amount_array(amounts)]
        }
    };

    let mut data = id(signature(call)).to_vec();
    data.extend(abi::encode(&args));
    Ok(Bytes::from(data))
}

fn map_send_error(err: ProviderError) -> VaultError {
    match ContractRevert::from_message(&err.message) {
        Some(revert) => VaultError::transaction(revert.user_message()),
        None => VaultError::Provider(err),
    }
}

pub struct WalletVaultGateway<P: WalletProvider> {
    provider: P,
    vault_address: Address,
    from: Address,
}

impl<P: WalletProvider> WalletVaultGateway<P> {
    pub fn new(
        provider: P,
        vault_address: impl Into<String>,
        from: impl Into<String>,
    ) -> VaultResult<Self> {
        let vault_address = vault_address.into();
        let from = from.into();
        validate_ethereum_address(&vault_address)?;
        validate_ethereum_address(&from)?;
        Ok(Self {
            provider,
            vault_address,
            from,
        })
    }

    pub fn vault_address(&self) -> &str {
        &self.vault_address
    }
}

#[async_trait]
impl<P: WalletProvider> VaultGateway for WalletVaultGateway<P> {
    async fn execute(&self, call: &VaultCall) -> VaultResult<TransactionHash> {
        let data = encode_call(call)?;
        let tx = json!({
            "from": self.from,
            "to": self.vault_address(),
            "data": data,
            "value": call.attached_value(),
        });

        let result = self
            .provider
            .request(METHOD_SEND_TRANSACTION, json!([tx]))
            .await
            .map_err(map_send_error)?;

        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| VaultError::transaction("No transaction hash returned"))
    }
}
