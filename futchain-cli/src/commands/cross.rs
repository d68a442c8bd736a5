//! Cross-reference command implementation.

use clap::Args;

use futchain_harness::driver::working_set;
use futchain_harness::{CrossReferenceDriver, CrossReferenceReport};

use super::{connect, Context};
use crate::output;

/// Arguments for the cross command.
#[derive(Args)]
pub struct CrossArgs {
    /// Match ids to follow; the first five unfinished matches when omitted
    pub ids: Vec<u64>,
}

/// Run the cross command.
pub async fn run(ctx: &Context, args: CrossArgs) -> i32 {
    let Some((reader, _)) = connect(ctx).await else {
        return super::EXIT_FATAL;
    };

    let ids = if args.ids.is_empty() {
        let discovered = match reader.read_unfinished_matches().await {
            Ok(ids) => ids,
            Err(e) => {
                if !ctx.json {
                    output::warn(&format!("Discovery failed: {}", e));
                }
                Vec::new()
            }
        };
        working_set(&discovered)
    } else {
        args.ids
    };

    let report = CrossReferenceDriver::new(&reader).run(&ids).await;

    if ctx.json {
        output::json(&report);
    } else {
        print(&report);
    }
    0
}

pub const HEADER: &str = "Cross-Reference";

pub fn print(report: &CrossReferenceReport) {
    output::header(HEADER);
    print_rows(report);
}

/// Print every trace followed by a one-line tally.
pub fn print_rows(report: &CrossReferenceReport) {
    output::info(&format!(
        "Testing with match IDs: [{}]",
        report
            .match_ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    ));
    for trace in &report.traces {
        output::trace(trace);
    }

    let failures = report.failures();
    if failures == 0 {
        output::success(&format!("{} matches cross-referenced", report.traces.len()));
    } else {
        output::warn(&format!(
            "{} matches cross-referenced, {} lookups failed",
            report.traces.len(),
            failures
        ));
    }
}
