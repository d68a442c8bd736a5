#![allow(dead_code)]

use assert_cmd::Command;
use ethers_core::abi::{encode, Token};
use ethers_core::types::{Bytes, U256};
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use futchain_harness::{Operation, PrecompileAbi};

const SHIPPED_ABI: &str = include_str!("../../../futchain-harness/abi/futchain.json");

pub struct TestEnv {
    pub server: MockServer,
    pub home_dir: TempDir,
}

impl TestEnv {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
            home_dir: TempDir::new().unwrap(),
        }
    }

    /// The probe binary pointed at the mock node.
    pub fn probe(&self) -> Command {
        self.probe_at(&self.server.uri())
    }

    /// The probe binary pointed at `url`.
    pub fn probe_at(&self, url: &str) -> Command {
        let mut cmd = self.bare();
        cmd.arg("--rpc-url").arg(url);
        cmd
    }

    /// The probe binary with a clean environment and no endpoint flag.
    pub fn bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("futchain-probe").unwrap();
        cmd.env("HOME", self.home_dir.path());
        cmd.env_remove("FUTCHAIN_RPC_URL");
        cmd.env_remove("FUTCHAIN_PRECOMPILE_ADDRESS");
        cmd.env_remove("FUTCHAIN_ABI_PATH");
        cmd.env_remove("RUST_LOG");
        cmd.env("NO_COLOR", "1");
        cmd
    }

    /// Write the shipped ABI, minus the functions named in `without`.
    pub fn write_abi(&self, without: &[&str]) -> PathBuf {
        let mut abi: Vec<serde_json::Value> = serde_json::from_str(SHIPPED_ABI).unwrap();
        abi.retain(|entry| {
            entry["name"]
                .as_str()
                .map_or(true, |name| !without.contains(&name))
        });

        let path = self.home_dir.path().join("futchain.json");
        std::fs::write(&path, serde_json::to_string(&abi).unwrap()).unwrap();
        path
    }

    /// A node with one live match (42), its league and both teams.
    pub async fn mock_season(&self) {
        self.mock_chain().await;
        self.mock_call(Operation::GetUnfinishedMatches, ids_output(&[42]))
            .await;
        self.mock_call(Operation::GetMatch(42), match_output(42, 5, 9, 11))
            .await;
        self.mock_call(Operation::GetLeague(5), league_output(5, "Premier", "Group A"))
            .await;
        self.mock_call(Operation::GetTeam(9), team_output(9, "Lions"))
            .await;
        self.mock_call(Operation::GetTeam(11), team_output(11, "Tigers"))
            .await;
    }

    /// Answer a JSON-RPC method regardless of its params.
    pub async fn mock_rpc(&self, method_name: &str, result: serde_json::Value) {
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({ "method": method_name })))
            .respond_with(rpc_result(result))
            .mount(&self.server)
            .await;
    }

    /// A reachable node on chain 9000 at block 1234.
    pub async fn mock_chain(&self) {
        self.mock_rpc("eth_chainId", serde_json::json!("0x2328")).await;
        self.mock_rpc("eth_blockNumber", serde_json::json!("0x4d2")).await;
        self.mock_rpc("eth_getCode", serde_json::json!("0x")).await;
        self.mock_rpc("eth_getBalance", serde_json::json!("0x0")).await;
        self.mock_rpc("eth_estimateGas", serde_json::json!("0x5208")).await;
    }

    /// Answer `eth_call` for `op` with ABI-encoded `output`.
    pub async fn mock_call(&self, op: Operation, output: Token) {
        let calldata = PrecompileAbi::embedded().unwrap().encode(op).unwrap();
        let returned = Bytes::from(encode(&[output])).to_string();

        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({ "method": "eth_call" })))
            .and(body_string_contains(calldata.to_string()))
            .respond_with(rpc_result(serde_json::json!(returned)))
            .mount(&self.server)
            .await;
    }
}

fn rpc_result(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": result
    }))
}

pub fn uint(v: u64) -> Token {
    Token::Uint(U256::from(v))
}

pub fn match_output(id: u64, league_id: u64, home_id: u64, away_id: u64) -> Token {
    Token::Tuple(vec![
        uint(id),
        uint(league_id),
        Token::String(format!("Team {} - Team {}", home_id, away_id)),
        Token::String("09.09.2025 20:45".into()),
        uint(home_id),
        uint(away_id),
        uint(1),
        uint(0),
        Token::String(format!("Team {}", home_id)),
        Token::String(format!("Team {}", away_id)),
        Token::Bool(true),
        Token::Bool(false),
        Token::Bool(false),
    ])
}

pub fn league_output(id: u64, name: &str, group: &str) -> Token {
    Token::Tuple(vec![
        uint(id),
        Token::String(name.into()),
        Token::String(group.into()),
    ])
}

pub fn team_output(id: u64, name: &str) -> Token {
    Token::Tuple(vec![uint(id), Token::String(name.into())])
}

pub fn ids_output(ids: &[u64]) -> Token {
    Token::Array(ids.iter().map(|id| uint(*id)).collect())
}
