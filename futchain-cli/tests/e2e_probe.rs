mod common;
use common::TestEnv;
use predicates::prelude::*;

#[tokio::test]
async fn test_help_lists_commands() {
    let env = TestEnv::new().await;
    env.probe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("cross"))
        .stdout(predicate::str::contains("--rpc-url"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_probe_reports_chain() {
    let env = TestEnv::new().await;
    env.mock_chain().await;

    env.probe()
        .arg("probe")
        .assert()
        .success()
        .stdout(predicate::str::contains("Connected to chain 9000, block 1234"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_probe_json() {
    let env = TestEnv::new().await;
    env.mock_chain().await;

    let output = env.probe().arg("--json").arg("probe").output().unwrap();
    assert!(output.status.success());

    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["chain_id"], 9000);
    assert_eq!(status["block_number"], 1234);
}

#[tokio::test]
async fn test_probe_unreachable_endpoint() {
    let env = TestEnv::new().await;
    env.probe_at("http://127.0.0.1:1")
        .arg("probe")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot proceed without connection"));
}

#[tokio::test]
async fn test_invalid_rpc_url() {
    let env = TestEnv::new().await;
    env.probe_at("not a url")
        .arg("probe")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid RPC URL"));
}

#[tokio::test]
async fn test_invalid_config_file() {
    let env = TestEnv::new().await;
    let path = env.home_dir.path().join("probe.toml");
    std::fs::write(&path, "endpoint = \"http://x\"").unwrap();

    env.probe()
        .arg("--config")
        .arg(&path)
        .arg("probe")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid config"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_config_file_supplies_endpoint() {
    let env = TestEnv::new().await;
    env.mock_chain().await;
    let path = env.home_dir.path().join("probe.toml");
    std::fs::write(&path, format!("rpc_url = \"{}\"", env.server.uri())).unwrap();

    // The flag wins over the file.
    env.probe_at("http://127.0.0.1:1")
        .arg("--config")
        .arg(&path)
        .arg("probe")
        .assert()
        .code(1);

    env.bare()
        .arg("--config")
        .arg(&path)
        .arg("probe")
        .assert()
        .success()
        .stdout(predicate::str::contains("chain 9000"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_debug_shows_abi_functions() {
    let env = TestEnv::new().await;
    env.mock_chain().await;

    env.probe()
        .arg("debug")
        .assert()
        .success()
        .stdout(predicate::str::contains("getUnfinishedMatches"))
        .stdout(predicate::str::contains("0x0000000000000000000000000000000000000807"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_endpoint_from_environment() {
    let env = TestEnv::new().await;
    env.mock_chain().await;

    env.bare()
        .env("FUTCHAIN_RPC_URL", env.server.uri())
        .arg("probe")
        .assert()
        .success()
        .stdout(predicate::str::contains("Connected to chain 9000, block 1234"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_flag_wins_over_environment() {
    let env = TestEnv::new().await;
    env.mock_chain().await;

    env.probe()
        .env("FUTCHAIN_RPC_URL", "http://127.0.0.1:1")
        .arg("probe")
        .assert()
        .success();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_abi_file_is_used() {
    let env = TestEnv::new().await;
    env.mock_chain().await;
    let path = env.write_abi(&[]);

    env.probe()
        .arg("--abi")
        .arg(&path)
        .arg("debug")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "getLeague, getMatch, getTeam, getUnfinishedMatches",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_incomplete_abi_is_fatal() {
    let env = TestEnv::new().await;
    env.mock_chain().await;
    let path = env.write_abi(&["getTeam"]);

    let output = env
        .probe()
        .arg("--abi")
        .arg(&path)
        .arg("run")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(combined.matches("function 'getTeam' is missing").count(), 1);
    assert!(!combined.contains("Step 1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_abi_path_from_environment() {
    let env = TestEnv::new().await;
    env.mock_chain().await;
    let path = env.write_abi(&["getUnfinishedMatches"]);

    env.probe()
        .env("FUTCHAIN_ABI_PATH", &path)
        .arg("probe")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "function 'getUnfinishedMatches' is missing",
        ));
}
