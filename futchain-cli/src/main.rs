//! Futchain precompile probe
//!
//! Terminal-first diagnostics for the sports-data precompile.

mod commands;
mod config;
mod output;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::Context;
use config::{FileConfig, Overrides, Settings};

#[derive(Parser)]
#[command(name = "futchain-probe")]
#[command(version)]
#[command(about = "Futchain precompile probe - sports-data precompile diagnostics", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// JSON-RPC endpoint
    #[arg(long, global = true, env = "FUTCHAIN_RPC_URL")]
    rpc_url: Option<String>,

    /// Precompile address
    #[arg(long, global = true, env = "FUTCHAIN_PRECOMPILE_ADDRESS")]
    address: Option<String>,

    /// JSON ABI to use instead of the built-in interface description
    #[arg(long, global = true, env = "FUTCHAIN_ABI_PATH")]
    abi: Option<PathBuf>,

    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every phase in order, from connectivity to the cross-reference pass
    Run(commands::run::RunArgs),

    /// Check that the RPC endpoint is reachable
    Probe,

    /// Show code, balance and ABI functions of the precompile
    Debug,

    /// List the ids of unfinished matches
    Unfinished,

    /// Read one match (defaults to the first unfinished match)
    Match(commands::entity::EntityArgs),

    /// Read one league (defaults to the current match's league)
    League(commands::entity::EntityArgs),

    /// Read one team (defaults to the current match's home team)
    Team(commands::entity::EntityArgs),

    /// Estimate gas for each precompile function
    Gas,

    /// Send encoded calls and inspect the undecoded answers
    Raw,

    /// Measure call latency over repeated invocations
    Bench(commands::bench::BenchArgs),

    /// Follow matches to their league and teams
    Cross(commands::cross::CrossArgs),
}

impl Commands {
    fn iterations(&self) -> Option<u32> {
        match self {
            Commands::Run(args) => args.iterations,
            Commands::Bench(args) => args.iterations,
            _ => None,
        }
    }
}

fn init_tracing(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new("futchain_harness=debug,futchain_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose, cli.global.log_json);

    let file = match &cli.global.config {
        Some(path) => match FileConfig::load(path) {
            Ok(f) => f,
            Err(e) => {
                output::error(&e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };

    let overrides = Overrides {
        rpc_url: cli.global.rpc_url.clone(),
        precompile_address: cli.global.address.clone(),
        abi_path: cli.global.abi.clone(),
        iterations: cli.command.iterations(),
    };

    let ctx = Context {
        settings: Settings::resolve(file, overrides),
        json: cli.global.json,
    };
    tracing::debug!(settings = ?ctx.settings, "settings resolved");

    let exit_code = match cli.command {
        Commands::Run(_) => commands::run::run(&ctx).await,
        Commands::Probe => commands::probe::run(&ctx).await,
        Commands::Debug => commands::probe::debug(&ctx).await,
        Commands::Unfinished => commands::entity::unfinished(&ctx).await,
        Commands::Match(args) => commands::entity::fixture(&ctx, args).await,
        Commands::League(args) => commands::entity::league(&ctx, args).await,
        Commands::Team(args) => commands::entity::team(&ctx, args).await,
        Commands::Gas => commands::gas::run(&ctx).await,
        Commands::Raw => commands::raw::run(&ctx).await,
        Commands::Bench(_) => commands::bench::run(&ctx).await,
        Commands::Cross(args) => commands::cross::run(&ctx, args).await,
    };

    std::process::exit(exit_code);
}
