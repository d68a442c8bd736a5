//! Typed read access to the precompile.
//!
//! [`PrecompileReader`] pairs a transport with the interface description and
//! exposes one method per precompile function, plus the connectivity probe
//! and the gas/raw-call/debug inspectors. Every method is a single attempt:
//! failures are returned to the caller with the operation and id attached.

use ethers_core::types::{Address, Bytes};
use tracing::debug;

use crate::abi::{PrecompileAbi, PRECOMPILE_ADDRESS};
use crate::error::{HarnessError, Result};
use crate::rpc::{PrecompileTransport, TransportError};
use crate::types::{ChainStatus, League, Match, Operation, PrecompileInfo, RawCallReport, Team};

/// Number of returned bytes shown by the raw-call inspector.
pub const RAW_PREVIEW_BYTES: usize = 32;

/// Reader for the precompile at a fixed address.
pub struct PrecompileReader<T> {
    transport: T,
    abi: PrecompileAbi,
    address: Address,
}

impl<T: PrecompileTransport> PrecompileReader<T> {
    /// Reader for the precompile at its well-known address.
    pub fn new(transport: T, abi: PrecompileAbi) -> Result<Self> {
        Self::with_address(transport, abi, PRECOMPILE_ADDRESS)
    }

    /// Reader for a precompile deployed elsewhere.
    pub fn with_address(transport: T, abi: PrecompileAbi, address: &str) -> Result<Self> {
        let address = address
            .parse::<Address>()
            .map_err(|_| HarnessError::InvalidAddress {
                address: address.to_string(),
            })?;

        Ok(Self {
            transport,
            abi,
            address,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn abi(&self) -> &PrecompileAbi {
        &self.abi
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Check that the endpoint answers and report which chain it serves.
    ///
    /// Any failure here is a `Connectivity` error.
    pub async fn probe(&self) -> Result<ChainStatus> {
        let block_number = self
            .transport
            .block_number()
            .await
            .map_err(HarnessError::connectivity)?;
        let chain_id = self
            .transport
            .chain_id()
            .await
            .map_err(HarnessError::connectivity)?;

        debug!(chain_id, block_number, "connected");
        Ok(ChainStatus {
            chain_id,
            block_number,
        })
    }

    pub async fn read_match(&self, id: u64) -> Result<Match> {
        let op = Operation::GetMatch(id);
        let data = self.call(op).await?;
        self.abi.decode_match(id, &data)
    }

    pub async fn read_league(&self, id: u64) -> Result<League> {
        let op = Operation::GetLeague(id);
        let data = self.call(op).await?;
        self.abi.decode_league(id, &data)
    }

    pub async fn read_team(&self, id: u64) -> Result<Team> {
        let op = Operation::GetTeam(id);
        let data = self.call(op).await?;
        self.abi.decode_team(id, &data)
    }

    /// Ids of every match the contract reports as not yet finished, in
    /// contract order. May be empty.
    pub async fn read_unfinished_matches(&self) -> Result<Vec<u64>> {
        let data = self.call(Operation::GetUnfinishedMatches).await?;
        self.abi.decode_unfinished(&data)
    }

    /// Run `op` and discard the decoded result.
    ///
    /// Used by the latency sampler, which only cares whether the call and
    /// its decoding succeeded.
    pub async fn invoke(&self, op: Operation) -> Result<()> {
        match op {
            Operation::GetMatch(id) => self.read_match(id).await.map(drop),
            Operation::GetLeague(id) => self.read_league(id).await.map(drop),
            Operation::GetTeam(id) => self.read_team(id).await.map(drop),
            Operation::GetUnfinishedMatches => self.read_unfinished_matches().await.map(drop),
        }
    }

    /// Gas the node would charge for `op`.
    pub async fn estimate_gas(&self, op: Operation) -> Result<u64> {
        let calldata = self.abi.encode(op)?;
        let gas = self
            .transport
            .estimate_gas(self.address, calldata)
            .await
            .map_err(|e| self.lookup_error(op, e))?;
        Ok(gas.low_u64())
    }

    /// Send the encoded call and report the undecoded answer.
    pub async fn raw_call(&self, op: Operation) -> Result<RawCallReport> {
        let calldata = self.abi.encode(op)?;
        let response = self
            .transport
            .call(self.address, calldata.clone())
            .await
            .map_err(|e| self.lookup_error(op, e))?;

        let shown = response.len().min(RAW_PREVIEW_BYTES);
        Ok(RawCallReport {
            operation: op,
            calldata,
            response_len: response.len(),
            preview: format!("0x{}", hex::encode(&response[..shown])),
        })
    }

    /// Code and balance held at the precompile address.
    pub async fn debug_info(&self) -> Result<PrecompileInfo> {
        let code = self
            .transport
            .code_at(self.address)
            .await
            .map_err(|e| HarnessError::lookup("eth_getCode", None, e))?;
        let balance_wei = self
            .transport
            .balance_of(self.address)
            .await
            .map_err(|e| HarnessError::lookup("eth_getBalance", None, e))?;

        Ok(PrecompileInfo {
            address: self.address,
            code,
            balance_wei,
        })
    }

    async fn call(&self, op: Operation) -> Result<Bytes> {
        let calldata = self.abi.encode(op)?;
        debug!(operation = %op, "calling precompile");

        self.transport
            .call(self.address, calldata)
            .await
            .map_err(|e| self.lookup_error(op, e))
    }

    fn lookup_error(&self, op: Operation, error: TransportError) -> HarnessError {
        debug!(operation = %op, error = %error, "precompile call failed");
        HarnessError::lookup(op.name(), op.argument(), error)
    }
}
