//! CLI command implementations.

pub mod bench;
pub mod cross;
pub mod entity;
pub mod gas;
pub mod probe;
pub mod raw;
pub mod run;

use serde::Serialize;

use futchain_harness::suite::read_match_with_defaults;
use futchain_harness::{
    ChainStatus, Defaults, HarnessError, PrecompileAbi, PrecompileReader, RpcClient,
};

use crate::config::Settings;
use crate::output;

/// Exit code when the endpoint cannot be used at all.
pub const EXIT_FATAL: i32 = 1;

/// Exit code when a standalone command's own lookup failed.
pub const EXIT_LOOKUP_FAILED: i32 = 2;

/// Resolved settings plus output mode, shared by every command.
pub struct Context {
    pub settings: Settings,
    pub json: bool,
}

/// JSON envelope for single-result commands.
#[derive(Serialize)]
struct JsonOutput<'a, T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    chain: Option<ChainStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a HarnessError>,
}

/// Build a reader from the resolved settings.
pub fn build_reader(settings: &Settings) -> Result<PrecompileReader<RpcClient>, HarnessError> {
    let abi = match &settings.abi_path {
        Some(path) => PrecompileAbi::from_file(path)?,
        None => PrecompileAbi::embedded()?,
    };
    let client = RpcClient::new(&settings.rpc_url)?;
    PrecompileReader::with_address(client, abi, &settings.precompile_address)
}

/// Build the reader and probe the endpoint.
///
/// Reports the failure exactly once and returns `None` if nothing else may
/// run.
pub async fn connect(ctx: &Context) -> Option<(PrecompileReader<RpcClient>, ChainStatus)> {
    if !ctx.json {
        output::info(&format!("Connecting to {}...", ctx.settings.rpc_url));
    }

    let probed = match build_reader(&ctx.settings) {
        Ok(reader) => reader.probe().await.map(|status| (reader, status)),
        Err(e) => Err(e),
    };

    match probed {
        Ok((reader, status)) => {
            if !ctx.json {
                output::success(&format!(
                    "Connected to chain {}, block {}",
                    status.chain_id, status.block_number
                ));
            }
            Some((reader, status))
        }
        Err(e) => {
            fatal(ctx, &e);
            None
        }
    }
}

/// Report a condition that stops the run.
pub fn fatal(ctx: &Context, e: &HarnessError) {
    if ctx.json {
        output::json(&JsonOutput::<()> {
            success: false,
            chain: None,
            data: None,
            error: Some(e),
        });
    } else {
        match e {
            HarnessError::Connectivity { .. } => {
                output::error(&format!("Cannot proceed without connection: {}", e));
                output::hint("Check that the node is running or pass --rpc-url.");
            }
            _ => output::error(&format!("Cannot proceed: {}", e)),
        }
    }
}

/// Print the result of a single lookup and pick the exit code.
pub fn report<T: Serialize>(
    ctx: &Context,
    chain: ChainStatus,
    result: &Result<T, HarnessError>,
    human: impl FnOnce(&T),
) -> i32 {
    if ctx.json {
        output::json(&JsonOutput {
            success: result.is_ok(),
            chain: Some(chain),
            data: result.as_ref().ok(),
            error: result.as_ref().err(),
        });
    } else {
        match result {
            Ok(value) => human(value),
            Err(e) => output::error(&e.to_string()),
        }
    }

    if result.is_ok() {
        0
    } else {
        EXIT_LOOKUP_FAILED
    }
}

/// Current match id from discovery; falls back to the built-in default.
pub async fn discover_defaults(ctx: &Context, reader: &PrecompileReader<RpcClient>) -> Defaults {
    match reader.read_unfinished_matches().await {
        Ok(ids) => {
            let defaults = Defaults::default().with_discovery(&ids);
            if !ctx.json && !ids.is_empty() {
                output::info(&format!("Using match ID {}", defaults.match_id));
            }
            defaults
        }
        Err(e) => {
            if !ctx.json {
                output::warn(&format!("Discovery failed, using default ids: {}", e));
            }
            Defaults::default()
        }
    }
}

/// Current match, league and team ids from discovery and the current match.
pub async fn resolve_defaults(ctx: &Context, reader: &PrecompileReader<RpcClient>) -> Defaults {
    let defaults = discover_defaults(ctx, reader).await;
    let (fixture, defaults) = read_match_with_defaults(reader, defaults).await;

    if !ctx.json {
        match fixture {
            Ok(_) => output::info(&format!(
                "Using league ID {} and team ID {}",
                defaults.league_id, defaults.team_id
            )),
            Err(e) => output::warn(&format!("Current match unavailable: {}", e)),
        }
    }
    defaults
}
