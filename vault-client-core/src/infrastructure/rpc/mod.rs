//! JSON-RPC wallet provider over HTTP
//!
//! Lets the client run against a node or a signer proxy instead of an
//! injected browser wallet.

use crate::domain::repositories::WalletProvider;
use crate::shared::constants::INTERNAL_RPC_ERROR_CODE;
use crate::shared::error::ProviderError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

pub struct HttpWalletProvider {
    client: Client,
    rpc_url: String,
    next_id: AtomicU64,
}

impl HttpWalletProvider {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            rpc_url: rpc_url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

/// Split a JSON-RPC 2.0 response into its result or its error object
pub fn parse_rpc_response(response: Value) -> Result<Value, ProviderError> {
    if let Some(error) = response.get("error") {
        let code = error
            .get("code")
            .and_then(Value::as_i64)
            .unwrap_or(INTERNAL_RPC_ERROR_CODE);
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown RPC error");
        return Err(ProviderError::new(code, message));
    }

    match response.get("result") {
        Some(result) => Ok(result.clone()),
        None => Err(ProviderError::new(
            INTERNAL_RPC_ERROR_CODE,
            "Response carries neither result nor error",
        )),
    }
}

#[async_trait]
impl WalletProvider for HttpWalletProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id
        });

        log::debug!("RPC {} #{} -> {}", method, id, self.rpc_url);
        let resp = self
            .client
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                ProviderError::new(
                    INTERNAL_RPC_ERROR_CODE,
                    format!("Failed to send request: {}", e),
                )
            })?;
        let resp_json: Value = resp
            .json()
            .await
            .map_err(|e| {
                ProviderError::new(INTERNAL_RPC_ERROR_CODE, format!("Invalid response: {}", e))
            })?;

        parse_rpc_response(resp_json)
    }
}
