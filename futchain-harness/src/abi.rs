//! Interface description of the Futchain precompile.
//!
//! Wraps an `ethers_core::abi::Abi` and turns it into the two things the
//! harness needs: calldata for an [`Operation`] and typed records from the
//! bytes the precompile returns.

use ethers_core::abi::{Abi, Function, Token};
use ethers_core::types::{Bytes, U256};
use std::path::Path;
use std::vec::IntoIter;

use crate::error::{HarnessError, Result};
use crate::types::{League, Match, Operation, Team};

/// Well-known address the chain runtime routes to the precompile.
pub const PRECOMPILE_ADDRESS: &str = "0x0000000000000000000000000000000000000807";

/// Functions the harness invokes; a description missing any of them is rejected.
pub const REQUIRED_FUNCTIONS: [&str; 4] =
    ["getMatch", "getLeague", "getTeam", "getUnfinishedMatches"];

const EMBEDDED_ABI: &str = include_str!("../abi/futchain.json");

/// Loaded interface description.
#[derive(Debug, Clone)]
pub struct PrecompileAbi {
    abi: Abi,
}

impl PrecompileAbi {
    /// The description shipped with the crate.
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_ABI)
    }

    /// Parse a JSON ABI.
    pub fn from_json(json: &str) -> Result<Self> {
        let abi: Abi = serde_json::from_str(json).map_err(HarnessError::abi)?;

        for name in REQUIRED_FUNCTIONS {
            if abi.function(name).is_err() {
                return Err(HarnessError::abi(format!("function '{}' is missing", name)));
            }
        }

        Ok(Self { abi })
    }

    /// Read and parse a JSON ABI file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| HarnessError::abi(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Names of every function in the description, sorted by name.
    pub fn function_names(&self) -> Vec<&str> {
        self.abi.functions().map(|f| f.name.as_str()).collect()
    }

    /// Look up a function by name.
    pub fn function(&self, name: &str) -> Result<&Function> {
        self.abi.function(name).map_err(HarnessError::abi)
    }

    /// Encode calldata (selector followed by arguments) for `op`.
    pub fn encode(&self, op: Operation) -> Result<Bytes> {
        let function = self.function(op.name())?;
        let args: Vec<Token> = op
            .argument()
            .map(|id| Token::Uint(U256::from(id)))
            .into_iter()
            .collect();

        function
            .encode_input(&args)
            .map(Bytes::from)
            .map_err(|e| HarnessError::lookup(op.name(), op.argument(), e))
    }

    /// Recover the operation encoded in `calldata`.
    pub fn decode_call(&self, calldata: &[u8]) -> Result<Operation> {
        if calldata.len() < 4 {
            return Err(HarnessError::abi("calldata shorter than a selector"));
        }
        let (selector, args) = calldata.split_at(4);

        for name in REQUIRED_FUNCTIONS {
            let function = self.function(name)?;
            if function.short_signature()[..] != *selector {
                continue;
            }

            let tokens = function.decode_input(args).map_err(HarnessError::abi)?;
            let id = match tokens.first() {
                Some(Token::Uint(v)) => Some(to_u64(*v).ok_or_else(|| {
                    HarnessError::abi(format!("{} argument exceeds u64", name))
                })?),
                _ => None,
            };

            return match (name, id) {
                ("getMatch", Some(id)) => Ok(Operation::GetMatch(id)),
                ("getLeague", Some(id)) => Ok(Operation::GetLeague(id)),
                ("getTeam", Some(id)) => Ok(Operation::GetTeam(id)),
                ("getUnfinishedMatches", None) => Ok(Operation::GetUnfinishedMatches),
                _ => Err(HarnessError::abi(format!("unexpected arguments for {}", name))),
            };
        }

        Err(HarnessError::abi(format!(
            "unknown selector 0x{}",
            hex::encode(selector)
        )))
    }

    /// Decode a `getMatch` result.
    pub fn decode_match(&self, id: u64, data: &[u8]) -> Result<Match> {
        let mut f = self.fields(Operation::GetMatch(id), data, 13)?;
        Ok(Match {
            id: f.uint("id")?,
            league_id: f.uint("leagueId")?,
            name: f.string("name")?,
            time: f.string("time")?,
            home_id: f.uint("homeId")?,
            away_id: f.uint("awayId")?,
            home_score: f.uint("homeScore")?,
            away_score: f.uint("awayScore")?,
            home_name: f.string("homeName")?,
            away_name: f.string("awayName")?,
            started: f.boolean("started")?,
            finished: f.boolean("finished")?,
            cancelled: f.boolean("cancelled")?,
        })
    }

    /// Decode a `getLeague` result.
    pub fn decode_league(&self, id: u64, data: &[u8]) -> Result<League> {
        let mut f = self.fields(Operation::GetLeague(id), data, 3)?;
        Ok(League {
            id: f.uint("id")?,
            name: f.string("name")?,
            group_name: f.string("groupName")?,
        })
    }

    /// Decode a `getTeam` result.
    pub fn decode_team(&self, id: u64, data: &[u8]) -> Result<Team> {
        let mut f = self.fields(Operation::GetTeam(id), data, 2)?;
        Ok(Team {
            id: f.uint("id")?,
            name: f.string("name")?,
        })
    }

    /// Decode a `getUnfinishedMatches` result.
    pub fn decode_unfinished(&self, data: &[u8]) -> Result<Vec<u64>> {
        let op = Operation::GetUnfinishedMatches;
        let tokens = self.decode_output(op, data)?;

        match tokens.into_iter().next() {
            Some(Token::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Token::Uint(v) => to_u64(v)
                        .ok_or_else(|| HarnessError::lookup(op.name(), None, "match id exceeds u64")),
                    other => Err(HarnessError::lookup(
                        op.name(),
                        None,
                        format!("expected uint, got {:?}", other),
                    )),
                })
                .collect(),
            other => Err(HarnessError::lookup(
                op.name(),
                None,
                format!("expected uint256[], got {:?}", other),
            )),
        }
    }

    fn decode_output(&self, op: Operation, data: &[u8]) -> Result<Vec<Token>> {
        self.function(op.name())?
            .decode_output(data)
            .map_err(|e| HarnessError::lookup(op.name(), op.argument(), format!("decode: {}", e)))
    }

    /// Decode `data` and unwrap the single-tuple output shape if present.
    fn fields(&self, op: Operation, data: &[u8], expected: usize) -> Result<Fields> {
        let mut tokens = self.decode_output(op, data)?;

        if tokens.len() == 1 && matches!(tokens[0], Token::Tuple(_)) {
            if let Some(Token::Tuple(inner)) = tokens.pop() {
                tokens = inner;
            }
        }

        if tokens.len() != expected {
            return Err(HarnessError::lookup(
                op.name(),
                op.argument(),
                format!("expected {} fields, got {}", expected, tokens.len()),
            ));
        }

        Ok(Fields {
            op,
            tokens: tokens.into_iter(),
        })
    }
}

/// Sequential reader over decoded output fields.
struct Fields {
    op: Operation,
    tokens: IntoIter<Token>,
}

impl Fields {
    fn uint(&mut self, field: &str) -> Result<u64> {
        match self.tokens.next() {
            Some(Token::Uint(v)) => to_u64(v).ok_or_else(|| self.error(field, "value exceeds u64")),
            other => Err(self.mismatch(field, "uint", other)),
        }
    }

    fn string(&mut self, field: &str) -> Result<String> {
        match self.tokens.next() {
            Some(Token::String(s)) => Ok(s),
            other => Err(self.mismatch(field, "string", other)),
        }
    }

    fn boolean(&mut self, field: &str) -> Result<bool> {
        match self.tokens.next() {
            Some(Token::Bool(b)) => Ok(b),
            other => Err(self.mismatch(field, "bool", other)),
        }
    }

    fn mismatch(&self, field: &str, expected: &str, got: Option<Token>) -> HarnessError {
        self.error(field, &format!("expected {}, got {:?}", expected, got))
    }

    fn error(&self, field: &str, reason: &str) -> HarnessError {
        HarnessError::lookup(
            self.op.name(),
            self.op.argument(),
            format!("field '{}': {}", field, reason),
        )
    }
}

fn to_u64(v: U256) -> Option<u64> {
    (v <= U256::from(u64::MAX)).then(|| v.as_u64())
}
