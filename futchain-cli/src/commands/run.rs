//! Run command implementation.

use clap::Args;

use futchain_harness::{Phase, PhaseEvent, Suite, SuiteOptions, SuiteReport};

use super::{bench, build_reader, cross, fatal, gas, raw, Context};
use crate::output;

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Latency iterations per function [default: 10]
    #[arg(short, long)]
    pub iterations: Option<u32>,
}

/// Run the full suite.
pub async fn run(ctx: &Context) -> i32 {
    let reader = match build_reader(&ctx.settings) {
        Ok(r) => r,
        Err(e) => {
            fatal(ctx, &e);
            return super::EXIT_FATAL;
        }
    };

    let options = SuiteOptions {
        iterations: ctx.settings.iterations,
        ..SuiteOptions::default()
    };
    let suite = Suite::new(&reader, options);

    let outcome = if ctx.json {
        suite.run().await
    } else {
        output::header("Futchain Precompile Test Suite");
        output::info(&format!("Connecting to {}...", ctx.settings.rpc_url));

        let functions = reader.abi().function_names();
        suite
            .run_observed(|event| print_event(ctx, &functions, event))
            .await
    };

    let report = match outcome {
        Ok(report) => report,
        Err(e) => {
            fatal(ctx, &e);
            return super::EXIT_FATAL;
        }
    };

    if ctx.json {
        output::json(&report);
    } else {
        print_summary(&report);
    }
    0
}

fn title(phase: Phase) -> Option<&'static str> {
    match phase {
        Phase::Connectivity => None,
        Phase::DebugInfo => Some("Debug Information"),
        Phase::Discovery => Some("Step 1: Discovering live matches"),
        Phase::EntityReads => Some("Step 2: Reading current entities"),
        Phase::GasEstimation => Some(gas::HEADER),
        Phase::RawCalls => Some(raw::HEADER),
        Phase::Latency => Some(bench::HEADER),
        Phase::CrossReference => Some(cross::HEADER),
    }
}

fn print_event(ctx: &Context, abi_functions: &[&str], event: PhaseEvent<'_>) {
    match event {
        PhaseEvent::Started(phase) => {
            if let Some(title) = title(phase) {
                output::header(title);
            }
        }
        PhaseEvent::Connected(chain) => output::success(&format!(
            "Connected to chain {}, block {}",
            chain.chain_id, chain.block_number
        )),
        PhaseEvent::DebugInfo(info) => {
            output::kv("RPC URL", &ctx.settings.rpc_url);
            output::kv("ABI functions", &abi_functions.join(", "));
            match info {
                Ok(info) => {
                    output::kv("Precompile address", &format!("{:?}", info.address));
                    output::precompile_info(info);
                }
                Err(e) => output::warn(&format!("Address check failed: {}", e)),
            }
        }
        PhaseEvent::Discovery { result, defaults } => match result {
            Ok(ids) => {
                output::match_ids(ids);
                if !ids.is_empty() {
                    output::info(&format!("Using match ID {}", defaults.match_id));
                }
            }
            Err(e) => output::error(&e.to_string()),
        },
        PhaseEvent::EntityReads {
            fixture,
            league,
            team,
        } => {
            match fixture {
                Ok(m) => output::fixture(m),
                Err(e) => output::error(&e.to_string()),
            }
            match league {
                Ok(l) => output::league(l),
                Err(e) => output::error(&e.to_string()),
            }
            match team {
                Ok(t) => output::team(t),
                Err(e) => output::error(&e.to_string()),
            }
        }
        PhaseEvent::GasEstimation(estimates) => gas::print_rows(estimates),
        PhaseEvent::RawCalls(calls) => raw::print_rows(calls),
        PhaseEvent::Latency(reports) => bench::print_rows(reports),
        PhaseEvent::CrossReference(report) => cross::print_rows(report),
    }
}

fn print_summary(report: &SuiteReport) {
    println!();
    let failures = report.failures();
    if failures == 0 {
        output::success("All tests completed!");
    } else {
        output::success(&format!(
            "All tests completed with {} non-fatal failures.",
            failures
        ));
    }
}
