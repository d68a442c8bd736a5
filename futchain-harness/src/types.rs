//! Typed records returned by the precompile and by the harness itself.
//!
//! Every call result is decoded into one of these at the RPC boundary, so
//! downstream logic never touches raw ABI tokens.

use ethers_core::types::{Address, Bytes, U256};
use ethers_core::utils::format_ether;
use serde::{Serialize, Serializer};
use std::fmt;

/// A single fixture as reported by `getMatch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub id: u64,
    pub league_id: u64,
    /// Display name, usually "Home - Away".
    pub name: String,
    /// Kick-off time as a display string (e.g. "09.09.2025 20:45").
    pub time: String,
    pub home_id: u64,
    pub home_name: String,
    pub home_score: u64,
    pub away_id: u64,
    pub away_name: String,
    pub away_score: u64,
    pub started: bool,
    pub finished: bool,
    pub cancelled: bool,
}

impl Match {
    /// League id, or `None` when the contract reports zero.
    pub fn league(&self) -> Option<u64> {
        non_zero(self.league_id)
    }

    /// Home team id, or `None` when the contract reports zero.
    pub fn home_team(&self) -> Option<u64> {
        non_zero(self.home_id)
    }

    /// Away team id, or `None` when the contract reports zero.
    pub fn away_team(&self) -> Option<u64> {
        non_zero(self.away_id)
    }

    /// Human-readable status derived from the three flags.
    pub fn status(&self) -> &'static str {
        if self.cancelled {
            "cancelled"
        } else if self.finished {
            "finished"
        } else if self.started {
            "live"
        } else {
            "scheduled"
        }
    }
}

/// A competition as reported by `getLeague`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct League {
    pub id: u64,
    pub name: String,
    pub group_name: String,
}

/// A club as reported by `getTeam`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    pub id: u64,
    pub name: String,
}

/// Identity of the chain behind the RPC endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChainStatus {
    pub chain_id: u64,
    pub block_number: u64,
}

/// State of the precompile account itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrecompileInfo {
    pub address: Address,
    /// Deployed code; precompiles usually report none.
    pub code: Bytes,
    pub balance_wei: U256,
}

impl PrecompileInfo {
    /// Balance formatted in ether.
    pub fn balance_ether(&self) -> String {
        format_ether(self.balance_wei)
    }
}

/// Result of sending already-encoded calldata without decoding the answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawCallReport {
    pub operation: Operation,
    pub calldata: Bytes,
    /// Length of the returned payload in bytes.
    pub response_len: usize,
    /// Hex of the first 32 returned bytes.
    pub preview: String,
}

/// One of the four calls the precompile exposes, with its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetMatch(u64),
    GetLeague(u64),
    GetTeam(u64),
    GetUnfinishedMatches,
}

impl Operation {
    /// ABI function name.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::GetMatch(_) => "getMatch",
            Operation::GetLeague(_) => "getLeague",
            Operation::GetTeam(_) => "getTeam",
            Operation::GetUnfinishedMatches => "getUnfinishedMatches",
        }
    }

    /// The id argument, if the function takes one.
    pub fn argument(&self) -> Option<u64> {
        match *self {
            Operation::GetMatch(id) | Operation::GetLeague(id) | Operation::GetTeam(id) => Some(id),
            Operation::GetUnfinishedMatches => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.argument() {
            Some(id) => write!(f, "{}({})", self.name(), id),
            None => write!(f, "{}()", self.name()),
        }
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn non_zero(id: u64) -> Option<u64> {
    (id > 0).then_some(id)
}
