//! Gas command implementation.

use futchain_harness::suite::{estimate_all, OperationResult};

use super::{connect, resolve_defaults, Context};
use crate::output;

/// Run the gas command.
pub async fn run(ctx: &Context) -> i32 {
    let Some((reader, _)) = connect(ctx).await else {
        return super::EXIT_FATAL;
    };

    let defaults = resolve_defaults(ctx, &reader).await;
    let estimates = estimate_all(&reader, &defaults).await;

    if ctx.json {
        output::json(&estimates);
    } else {
        print(&estimates);
    }
    0
}

pub const HEADER: &str = "Gas Estimation";

pub fn print(estimates: &[OperationResult<u64>]) {
    output::header(HEADER);
    print_rows(estimates);
}

/// Print one line per estimate.
pub fn print_rows(estimates: &[OperationResult<u64>]) {
    for estimate in estimates {
        match &estimate.result {
            Ok(gas) => output::kv(&estimate.operation.to_string(), &format!("{} gas", gas)),
            Err(e) => output::warn(&format!("{}: estimation failed - {}", estimate.operation, e)),
        }
    }
}

