//! Terminal output formatting.

use colored::Colorize;
use serde::Serialize;

use futchain_harness::{
    LatencyReport, League, Match, MatchTrace, PrecompileInfo, RawCallReport, SkipReason, Step,
    Team,
};

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg.green());
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg.red());
}

/// Print an info message.
pub fn info(msg: &str) {
    println!("{} {}", "→".cyan(), msg);
}

/// Print a warning message.
pub fn warn(msg: &str) {
    println!("{} {}", "!".yellow().bold(), msg.yellow());
}

/// Print a header.
pub fn header(msg: &str) {
    println!("\n{}", msg.white().bold());
    println!("{}", "─".repeat(msg.chars().count()).dimmed());
}

/// Print a key-value pair.
pub fn kv(key: &str, value: &str) {
    println!("  {} {}", format!("{}:", key).dimmed(), value);
}

/// Print a helpful hint.
pub fn hint(msg: &str) {
    println!("{} {}", "💡".dimmed(), msg.dimmed());
}

/// Print any report as pretty JSON.
pub fn json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => error(&format!("Cannot serialize report: {}", e)),
    }
}

pub fn fixture(m: &Match) {
    success(&format!("Match {} received", m.id));
    kv("Name", &m.name);
    kv("League ID", &m.league_id.to_string());
    kv("Time", &m.time);
    kv("Home", &format!("{} (id {}) score {}", m.home_name, m.home_id, m.home_score));
    kv("Away", &format!("{} (id {}) score {}", m.away_name, m.away_id, m.away_score));
    kv(
        "Status",
        &format!(
            "{} (started={}, finished={}, cancelled={})",
            m.status(),
            m.started,
            m.finished,
            m.cancelled
        ),
    );
}

pub fn league(l: &League) {
    success(&format!("League {} received", l.id));
    kv("Name", &l.name);
    kv("Group", &l.group_name);
}

pub fn team(t: &Team) {
    success(&format!("Team {} received", t.id));
    kv("Name", &t.name);
}

pub fn match_ids(ids: &[u64]) {
    success(&format!("{} unfinished matches", ids.len()));
    if !ids.is_empty() {
        let shown: Vec<String> = ids.iter().take(10).map(u64::to_string).collect();
        let more = if ids.len() > 10 { ", ..." } else { "" };
        kv("IDs", &format!("[{}{}]", shown.join(", "), more));
    }
}

pub fn precompile_info(info: &PrecompileInfo) {
    let code = if info.code.is_empty() {
        "none".to_string()
    } else {
        format!("{} ({} bytes)", info.code, info.code.len())
    };
    kv("Code at address", &code);
    kv("Balance", &format!("{} ETH", info.balance_ether()));
}

pub fn raw_call(report: &RawCallReport) {
    println!("  {}", report.operation.to_string().bold());
    kv("  Call data", &report.calldata.to_string());
    kv("  Raw result", &format!("{}...", report.preview));
    kv("  Result length", &format!("{} bytes", report.response_len));
}

pub fn latency(report: &LatencyReport) {
    println!(
        "  {} ({} iterations)",
        report.label.bold(),
        report.iterations
    );
    for failure in &report.failures {
        println!(
            "    {} iteration {} failed: {}",
            "!".yellow(),
            failure.iteration,
            failure.error.dimmed()
        );
    }
    match &report.stats {
        Some(s) => println!(
            "    Average: {:.2}ms, Min: {:.2}ms, Max: {:.2}ms ({} samples)",
            millis(s.average),
            millis(s.min),
            millis(s.max),
            s.samples
        ),
        None => println!("    {}", "no successful iterations".red()),
    }
}

pub fn trace(t: &MatchTrace) {
    header(&format!("Match {}", t.match_id));
    step("match", &t.fixture, |m| format!("{} ({}, {})", m.name, m.time, m.status()));
    step("league", &t.league, |l| format!("{} / {}", l.name, l.group_name));
    step("home team", &t.home_team, |team| format!("{} (id {})", team.name, team.id));
    step("away team", &t.away_team, |team| format!("{} (id {})", team.name, team.id));
}

fn step<T>(what: &str, step: &Step<T>, describe: impl Fn(&T) -> String) {
    match step {
        Step::Fetched(v) => success(&format!("{}: {}", what, describe(v))),
        Step::Failed(e) => error(&format!("{}: {}", what, e)),
        Step::Skipped(reason) => println!(
            "{} {}",
            "-".dimmed(),
            format!("{}: skipped ({})", what, skip_reason(*reason)).dimmed()
        ),
    }
}

fn skip_reason(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::MatchUnavailable => "match unavailable",
        SkipReason::ZeroId => "id is 0",
        SkipReason::SameAsHome => "same as home team",
    }
}

fn millis(d: std::time::Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
