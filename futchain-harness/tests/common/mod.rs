//! Scripted in-memory precompile used by the integration tests.
//!
//! Decodes real calldata with the embedded ABI, answers with real ABI
//! encodings, and logs every request so tests can count lookups.

#![allow(dead_code)]

use async_trait::async_trait;
use ethers_core::abi::{encode, Token};
use ethers_core::types::{Address, Bytes, U256};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use futchain_harness::{
    League, Match, Operation, PrecompileAbi, PrecompileReader, PrecompileTransport, Team,
    TransportError, TransportResult,
};

pub struct ScriptedPrecompile {
    abi: PrecompileAbi,
    chain_id: u64,
    block_number: u64,
    matches: HashMap<u64, Match>,
    leagues: HashMap<u64, League>,
    teams: HashMap<u64, Team>,
    unfinished: Option<Vec<u64>>,
    broken: HashSet<Operation>,
    offline: bool,
    log: Mutex<Vec<String>>,
}

impl ScriptedPrecompile {
    pub fn new() -> Self {
        Self {
            abi: PrecompileAbi::embedded().unwrap(),
            chain_id: 9000,
            block_number: 1234,
            matches: HashMap::new(),
            leagues: HashMap::new(),
            teams: HashMap::new(),
            unfinished: Some(Vec::new()),
            broken: HashSet::new(),
            offline: false,
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn with_match(mut self, m: Match) -> Self {
        self.matches.insert(m.id, m);
        self
    }

    pub fn with_league(mut self, id: u64, name: &str, group_name: &str) -> Self {
        self.leagues.insert(
            id,
            League {
                id,
                name: name.into(),
                group_name: group_name.into(),
            },
        );
        self
    }

    pub fn with_team(mut self, id: u64, name: &str) -> Self {
        self.teams.insert(
            id,
            Team {
                id,
                name: name.into(),
            },
        );
        self
    }

    pub fn with_unfinished(mut self, ids: Vec<u64>) -> Self {
        self.unfinished = Some(ids);
        self
    }

    /// Discovery reverts.
    pub fn without_discovery(mut self) -> Self {
        self.unfinished = None;
        self
    }

    /// Every call for `op` reverts even if the entity exists.
    pub fn breaking(mut self, op: Operation) -> Self {
        self.broken.insert(op);
        self
    }

    /// The endpoint refuses every request.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    pub fn reader(self) -> PrecompileReader<Self> {
        let abi = self.abi.clone();
        PrecompileReader::new(self, abi).unwrap()
    }

    /// Every request seen, in order, e.g. `eth_call getTeam(9)`.
    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// Precompile calls issued through `eth_call`, in order.
    pub fn calls(&self) -> Vec<String> {
        self.log()
            .into_iter()
            .filter_map(|l| l.strip_prefix("eth_call ").map(str::to_string))
            .collect()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, entry: String) -> TransportResult<()> {
        self.log.lock().unwrap().push(entry);
        if self.offline {
            return Err(TransportError("endpoint unreachable (connection refused)".into()));
        }
        Ok(())
    }

    fn answer(&self, op: Operation) -> TransportResult<Vec<u8>> {
        let revert = |what: &str| TransportError(format!("execution reverted: failed to get {}", what));

        if self.broken.contains(&op) {
            return Err(revert(op.name()));
        }

        let tokens = match op {
            Operation::GetMatch(id) => {
                let m = self.matches.get(&id).ok_or_else(|| revert("match"))?;
                Token::Tuple(vec![
                    uint(m.id),
                    uint(m.league_id),
                    Token::String(m.name.clone()),
                    Token::String(m.time.clone()),
                    uint(m.home_id),
                    uint(m.away_id),
                    uint(m.home_score),
                    uint(m.away_score),
                    Token::String(m.home_name.clone()),
                    Token::String(m.away_name.clone()),
                    Token::Bool(m.started),
                    Token::Bool(m.finished),
                    Token::Bool(m.cancelled),
                ])
            }
            Operation::GetLeague(id) => {
                let l = self.leagues.get(&id).ok_or_else(|| revert("league"))?;
                Token::Tuple(vec![
                    uint(l.id),
                    Token::String(l.name.clone()),
                    Token::String(l.group_name.clone()),
                ])
            }
            Operation::GetTeam(id) => {
                let t = self.teams.get(&id).ok_or_else(|| revert("team"))?;
                Token::Tuple(vec![uint(t.id), Token::String(t.name.clone())])
            }
            Operation::GetUnfinishedMatches => {
                let ids = self
                    .unfinished
                    .as_ref()
                    .ok_or_else(|| revert("unfinished matches"))?;
                Token::Array(ids.iter().map(|id| uint(*id)).collect())
            }
        };

        Ok(encode(&[tokens]))
    }

    fn decode(&self, calldata: &[u8]) -> TransportResult<Operation> {
        self.abi
            .decode_call(calldata)
            .map_err(|e| TransportError(e.to_string()))
    }
}

#[async_trait]
impl PrecompileTransport for ScriptedPrecompile {
    async fn chain_id(&self) -> TransportResult<u64> {
        self.record("eth_chainId".into())?;
        Ok(self.chain_id)
    }

    async fn block_number(&self) -> TransportResult<u64> {
        self.record("eth_blockNumber".into())?;
        Ok(self.block_number)
    }

    async fn call(&self, _to: Address, calldata: Bytes) -> TransportResult<Bytes> {
        let op = self.decode(&calldata)?;
        self.record(format!("eth_call {}", op))?;
        self.answer(op).map(Bytes::from)
    }

    async fn estimate_gas(&self, _to: Address, calldata: Bytes) -> TransportResult<U256> {
        let op = self.decode(&calldata)?;
        self.record(format!("eth_estimateGas {}", op))?;
        self.answer(op)?;
        Ok(U256::from(21_000 + 16 * calldata.len() as u64))
    }

    async fn code_at(&self, _address: Address) -> TransportResult<Bytes> {
        self.record("eth_getCode".into())?;
        Ok(Bytes::new())
    }

    async fn balance_of(&self, _address: Address) -> TransportResult<U256> {
        self.record("eth_getBalance".into())?;
        Ok(U256::zero())
    }
}

pub fn uint(v: u64) -> Token {
    Token::Uint(U256::from(v))
}

/// A scheduled match with the given league and teams.
pub fn fixture(id: u64, league_id: u64, home_id: u64, away_id: u64) -> Match {
    Match {
        id,
        league_id,
        name: format!("Team {} - Team {}", home_id, away_id),
        time: "09.09.2025 20:45".into(),
        home_id,
        home_name: format!("Team {}", home_id),
        home_score: 0,
        away_id,
        away_name: format!("Team {}", away_id),
        away_score: 0,
        started: false,
        finished: false,
        cancelled: false,
    }
}
