//! # Futchain Harness
//!
//! **Discovery and cross-reference checks for the Futchain sports-data precompile**
//!
//! The precompile at `0x…0807` answers four read-only calls: `getMatch`,
//! `getLeague`, `getTeam` and `getUnfinishedMatches`. This crate discovers
//! live match ids from the last one, follows each match to its league and
//! teams, and measures gas and latency along the way.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futchain_harness::{PrecompileAbi, PrecompileReader, RpcClient, Suite, SuiteOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RpcClient::new("http://localhost:8545")?;
//!     let reader = PrecompileReader::new(client, PrecompileAbi::embedded()?)?;
//!
//!     let report = Suite::new(&reader, SuiteOptions::default()).run().await?;
//!     println!("chain {} at block {}", report.chain.chain_id, report.chain.block_number);
//!     println!("{} non-fatal failures", report.failures());
//!
//!     Ok(())
//! }
//! ```

pub mod abi;
pub mod driver;
pub mod error;
pub mod reader;
pub mod rpc;
pub mod sampler;
pub mod suite;
pub mod types;

// Re-export main types for convenience
pub use abi::{PrecompileAbi, PRECOMPILE_ADDRESS};
pub use driver::{CrossReferenceDriver, CrossReferenceReport, MatchTrace, SkipReason, Step};
pub use error::HarnessError;
pub use reader::PrecompileReader;
pub use rpc::{PrecompileTransport, RpcClient, TransportError, TransportResult};
pub use sampler::{LatencyReport, LatencySampler, LatencyStats};
pub use suite::{Defaults, Phase, PhaseEvent, Suite, SuiteOptions, SuiteReport};
pub use types::{ChainStatus, League, Match, Operation, PrecompileInfo, RawCallReport, Team};
