//! RPC transport for talking to the precompile.
//!
//! [`PrecompileTransport`] is the seam between the harness and the network:
//! it speaks only in addresses, calldata and raw return bytes. [`RpcClient`]
//! implements it on top of `ethers_providers::Provider<Http>`.

use async_trait::async_trait;
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{Address, Bytes, TransactionRequest, U256};
use ethers_providers::{Http, Middleware, Provider, ProviderError};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::error::{HarnessError, Result};

/// Failure reported by a transport, before any operation context is attached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<ProviderError> for TransportError {
    fn from(error: ProviderError) -> Self {
        TransportError(classify_error(&error))
    }
}

/// Result type for transport calls.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Read-only JSON-RPC surface the harness needs.
///
/// Every method is a single round trip; implementations must not retry.
#[async_trait]
pub trait PrecompileTransport: Send + Sync {
    /// `eth_chainId`
    async fn chain_id(&self) -> TransportResult<u64>;

    /// `eth_blockNumber`
    async fn block_number(&self) -> TransportResult<u64>;

    /// `eth_call` against `to` with pre-encoded calldata.
    async fn call(&self, to: Address, calldata: Bytes) -> TransportResult<Bytes>;

    /// `eth_estimateGas` for the same call.
    async fn estimate_gas(&self, to: Address, calldata: Bytes) -> TransportResult<U256>;

    /// `eth_getCode`
    async fn code_at(&self, address: Address) -> TransportResult<Bytes>;

    /// `eth_getBalance`
    async fn balance_of(&self, address: Address) -> TransportResult<U256>;
}

/// HTTP JSON-RPC client.
///
/// # Example
///
/// ```rust,no_run
/// use futchain_harness::{PrecompileTransport, RpcClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = RpcClient::new("http://localhost:8545")?;
///     println!("chain {}", client.chain_id().await?);
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct RpcClient {
    provider: Arc<Provider<Http>>,
    url: String,
}

impl RpcClient {
    /// Create a client for an HTTP endpoint.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRpcUrl` if the URL cannot be parsed. No request is
    /// made until the first call.
    pub fn new(rpc_url: &str) -> Result<Self> {
        let provider =
            Provider::<Http>::try_from(rpc_url).map_err(|e| HarnessError::InvalidRpcUrl {
                url: rpc_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            provider: Arc::new(provider),
            url: rpc_url.to_string(),
        })
    }

    /// The endpoint this client talks to.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn request(to: Address, calldata: Bytes) -> TypedTransaction {
        TransactionRequest::new().to(to).data(calldata).into()
    }
}

#[async_trait]
impl PrecompileTransport for RpcClient {
    async fn chain_id(&self) -> TransportResult<u64> {
        let id = self.provider.get_chainid().await?;
        Ok(id.low_u64())
    }

    async fn block_number(&self) -> TransportResult<u64> {
        let n = self.provider.get_block_number().await?;
        Ok(n.as_u64())
    }

    async fn call(&self, to: Address, calldata: Bytes) -> TransportResult<Bytes> {
        debug!(%to, calldata = %calldata, "eth_call");
        let tx = Self::request(to, calldata);
        Ok(self.provider.call(&tx, None).await?)
    }

    async fn estimate_gas(&self, to: Address, calldata: Bytes) -> TransportResult<U256> {
        debug!(%to, calldata = %calldata, "eth_estimateGas");
        let tx = Self::request(to, calldata);
        Ok(self.provider.estimate_gas(&tx, None).await?)
    }

    async fn code_at(&self, address: Address) -> TransportResult<Bytes> {
        Ok(self.provider.get_code(address, None).await?)
    }

    async fn balance_of(&self, address: Address) -> TransportResult<U256> {
        Ok(self.provider.get_balance(address, None).await?)
    }
}

/// Reduce an ethers error to a message worth showing to the operator.
fn classify_error(error: &ProviderError) -> String {
    let message = error.to_string();
    let lower = message.to_lowercase();

    if lower.contains("connection refused") || lower.contains("error sending request") {
        return format!("endpoint unreachable ({})", message);
    }

    if lower.contains("rate limit") || lower.contains("too many requests") {
        return "Rate limited by RPC provider. Try again later.".to_string();
    }

    message
}
