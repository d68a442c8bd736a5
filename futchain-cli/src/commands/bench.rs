//! Bench command implementation.

use clap::Args;

use futchain_harness::suite::sample_all;
use futchain_harness::{LatencyReport, LatencySampler};

use super::{connect, resolve_defaults, Context};
use crate::output;

/// Arguments for the bench command.
#[derive(Args)]
pub struct BenchArgs {
    /// Iterations per function [default: 10]
    #[arg(short, long)]
    pub iterations: Option<u32>,
}

/// Run the bench command.
pub async fn run(ctx: &Context) -> i32 {
    let Some((reader, _)) = connect(ctx).await else {
        return super::EXIT_FATAL;
    };

    let defaults = resolve_defaults(ctx, &reader).await;
    let sampler = LatencySampler::new(ctx.settings.iterations);
    let reports = sample_all(&reader, &defaults, &sampler).await;

    if ctx.json {
        output::json(&reports);
    } else {
        print(&reports);
    }
    0
}

pub const HEADER: &str = "Performance";

pub fn print(reports: &[LatencyReport]) {
    output::header(HEADER);
    print_rows(reports);
}

/// Print timing statistics per function.
pub fn print_rows(reports: &[LatencyReport]) {
    for report in reports {
        output::latency(report);
    }
}
