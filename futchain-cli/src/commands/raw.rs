//! Raw call command implementation.

use futchain_harness::suite::{raw_call_all, OperationResult};
use futchain_harness::RawCallReport;

use super::{connect, resolve_defaults, Context};
use crate::output;

/// Run the raw command.
pub async fn run(ctx: &Context) -> i32 {
    let Some((reader, _)) = connect(ctx).await else {
        return super::EXIT_FATAL;
    };

    let defaults = resolve_defaults(ctx, &reader).await;
    let calls = raw_call_all(&reader, &defaults).await;

    if ctx.json {
        output::json(&calls);
    } else {
        print(&calls);
    }
    0
}

pub const HEADER: &str = "Raw Calls";

pub fn print(calls: &[OperationResult<RawCallReport>]) {
    output::header(HEADER);
    print_rows(calls);
}

/// Print calldata and the undecoded answer for each call.
pub fn print_rows(calls: &[OperationResult<RawCallReport>]) {
    for call in calls {
        match &call.result {
            Ok(report) => output::raw_call(report),
            Err(e) => output::warn(&format!("{}: raw call failed - {}", call.operation, e)),
        }
    }
}
