//! Probe and debug command implementations.

use serde::Serialize;

use futchain_harness::PrecompileInfo;

use super::{connect, report, Context};
use crate::output;

/// Run the probe command.
pub async fn run(ctx: &Context) -> i32 {
    let Some((_, status)) = connect(ctx).await else {
        return super::EXIT_FATAL;
    };

    if ctx.json {
        output::json(&status);
    }
    0
}

#[derive(Serialize)]
struct DebugOutput<'a> {
    rpc_url: &'a str,
    abi_functions: Vec<&'a str>,
    #[serde(flatten)]
    info: &'a PrecompileInfo,
}

/// Run the debug command.
pub async fn debug(ctx: &Context) -> i32 {
    let Some((reader, status)) = connect(ctx).await else {
        return super::EXIT_FATAL;
    };

    if !ctx.json {
        output::header("Debug Information");
        output::kv("Precompile address", &format!("{:?}", reader.address()));
        output::kv("RPC URL", &ctx.settings.rpc_url);
        output::kv("ABI functions", &reader.abi().function_names().join(", "));
    }

    let info = reader.debug_info().await;

    if ctx.json {
        let functions = reader.abi().function_names();
        let data = info.as_ref().map_err(|e| e.clone()).map(|info| DebugOutput {
            rpc_url: &ctx.settings.rpc_url,
            abi_functions: functions,
            info,
        });
        return report(ctx, status, &data, |_| {});
    }

    match info {
        Ok(info) => {
            output::precompile_info(&info);
            0
        }
        Err(e) => {
            output::warn(&format!("Address check failed: {}", e));
            super::EXIT_LOOKUP_FAILED
        }
    }
}
