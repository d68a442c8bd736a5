//! The full diagnostic run.
//!
//! Phases execute in a fixed order, one call at a time. Only the
//! connectivity probe can stop the run; every later phase records its
//! failures and hands over to the next one.

use serde::Serialize;
use std::fmt;
use tracing::info;

use crate::driver::{working_set_of, CrossReferenceDriver, CrossReferenceReport, WORKING_SET_SIZE};
use crate::error::{HarnessError, Result};
use crate::reader::PrecompileReader;
use crate::rpc::PrecompileTransport;
use crate::sampler::{LatencyReport, LatencySampler, DEFAULT_ITERATIONS};
use crate::types::{ChainStatus, League, Match, Operation, PrecompileInfo, RawCallReport, Team};

/// Ids used when a single-entity call is not given one explicitly.
///
/// Starts at 1 for everything and is refined from discovery and from the
/// first match read. Passed by value; nothing global is mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Defaults {
    pub match_id: u64,
    pub league_id: u64,
    pub team_id: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            match_id: 1,
            league_id: 1,
            team_id: 1,
        }
    }
}

impl Defaults {
    /// Take the first discovered match as the current one.
    pub fn with_discovery(self, match_ids: &[u64]) -> Self {
        match match_ids.first() {
            Some(&match_id) => Self { match_id, ..self },
            None => self,
        }
    }

    /// Take the league and home team of `fixture`, ignoring zero ids.
    pub fn with_match(self, fixture: &Match) -> Self {
        Self {
            league_id: fixture.league().unwrap_or(self.league_id),
            team_id: fixture.home_team().unwrap_or(self.team_id),
            ..self
        }
    }

    /// The four precompile calls, parameterised with these ids.
    pub fn operations(&self) -> [Operation; 4] {
        [
            Operation::GetMatch(self.match_id),
            Operation::GetLeague(self.league_id),
            Operation::GetTeam(self.team_id),
            Operation::GetUnfinishedMatches,
        ]
    }
}

/// Stages of a full run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Connectivity,
    DebugInfo,
    Discovery,
    EntityReads,
    GasEstimation,
    RawCalls,
    Latency,
    CrossReference,
}

impl Phase {
    pub const ALL: [Phase; 8] = [
        Phase::Connectivity,
        Phase::DebugInfo,
        Phase::Discovery,
        Phase::EntityReads,
        Phase::GasEstimation,
        Phase::RawCalls,
        Phase::Latency,
        Phase::CrossReference,
    ];
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Connectivity => "connectivity",
            Phase::DebugInfo => "debug info",
            Phase::Discovery => "discovery",
            Phase::EntityReads => "entity reads",
            Phase::GasEstimation => "gas estimation",
            Phase::RawCalls => "raw calls",
            Phase::Latency => "latency",
            Phase::CrossReference => "cross-reference",
        };
        f.write_str(name)
    }
}

/// Result of one call in a per-operation phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationResult<T> {
    pub operation: Operation,
    pub result: std::result::Result<T, HarnessError>,
}

/// Everything a full run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteReport {
    pub chain: ChainStatus,
    pub debug_info: std::result::Result<PrecompileInfo, HarnessError>,
    pub discovery: std::result::Result<Vec<u64>, HarnessError>,
    /// Defaults after discovery and the first match read.
    pub defaults: Defaults,
    pub fixture: std::result::Result<Match, HarnessError>,
    pub league: std::result::Result<League, HarnessError>,
    pub team: std::result::Result<Team, HarnessError>,
    pub gas: Vec<OperationResult<u64>>,
    pub raw_calls: Vec<OperationResult<RawCallReport>>,
    pub latency: Vec<LatencyReport>,
    pub cross_reference: CrossReferenceReport,
    /// Phases that ran, in order.
    pub phases: Vec<Phase>,
}

impl SuiteReport {
    /// Number of non-fatal failures recorded across all phases.
    pub fn failures(&self) -> usize {
        let singles = [
            self.debug_info.is_err(),
            self.discovery.is_err(),
            self.fixture.is_err(),
            self.league.is_err(),
            self.team.is_err(),
        ]
        .into_iter()
        .filter(|f| *f)
        .count();

        singles
            + self.gas.iter().filter(|g| g.result.is_err()).count()
            + self.raw_calls.iter().filter(|r| r.result.is_err()).count()
            + self.latency.iter().map(|l| l.failures.len()).sum::<usize>()
            + self.cross_reference.failures()
    }
}

/// Tunables for a run.
#[derive(Debug, Clone, Copy)]
pub struct SuiteOptions {
    pub iterations: u32,
    pub working_set_size: usize,
}

impl Default for SuiteOptions {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            working_set_size: WORKING_SET_SIZE,
        }
    }
}

/// Progress of a run, reported as it happens.
///
/// `Started` precedes the work of each phase; the other variants carry
/// what the phase produced once it is done.
#[derive(Debug, Clone, Copy)]
pub enum PhaseEvent<'r> {
    Started(Phase),
    Connected(&'r ChainStatus),
    DebugInfo(&'r Result<PrecompileInfo>),
    Discovery {
        result: &'r Result<Vec<u64>>,
        defaults: &'r Defaults,
    },
    EntityReads {
        fixture: &'r Result<Match>,
        league: &'r Result<League>,
        team: &'r Result<Team>,
    },
    GasEstimation(&'r [OperationResult<u64>]),
    RawCalls(&'r [OperationResult<RawCallReport>]),
    Latency(&'r [LatencyReport]),
    CrossReference(&'r CrossReferenceReport),
}

/// Ordered pipeline over a reader.
pub struct Suite<'a, T> {
    reader: &'a PrecompileReader<T>,
    options: SuiteOptions,
}

impl<'a, T: PrecompileTransport> Suite<'a, T> {
    pub fn new(reader: &'a PrecompileReader<T>, options: SuiteOptions) -> Self {
        Self { reader, options }
    }

    /// Execute every phase.
    ///
    /// # Errors
    ///
    /// Only a failed connectivity probe is returned; nothing else runs in
    /// that case.
    pub async fn run(&self) -> Result<SuiteReport> {
        self.run_observed(|_| {}).await
    }

    /// Like [`Suite::run`], handing each [`PhaseEvent`] to `observe` as soon
    /// as it happens.
    pub async fn run_observed<F>(&self, mut observe: F) -> Result<SuiteReport>
    where
        F: FnMut(PhaseEvent<'_>),
    {
        let reader = self.reader;
        let mut phases = Vec::with_capacity(Phase::ALL.len());

        phases.push(self.enter(Phase::Connectivity, &mut observe));
        let chain = reader.probe().await?;
        observe(PhaseEvent::Connected(&chain));

        phases.push(self.enter(Phase::DebugInfo, &mut observe));
        let debug_info = reader.debug_info().await;
        observe(PhaseEvent::DebugInfo(&debug_info));

        phases.push(self.enter(Phase::Discovery, &mut observe));
        let discovery = reader.read_unfinished_matches().await;
        let discovered = discovery.as_deref().unwrap_or(&[]);
        let mut defaults = Defaults::default().with_discovery(discovered);
        observe(PhaseEvent::Discovery {
            result: &discovery,
            defaults: &defaults,
        });

        phases.push(self.enter(Phase::EntityReads, &mut observe));
        let (fixture, after_match) = read_match_with_defaults(reader, defaults).await;
        defaults = after_match;
        let league = reader.read_league(defaults.league_id).await;
        let team = reader.read_team(defaults.team_id).await;
        observe(PhaseEvent::EntityReads {
            fixture: &fixture,
            league: &league,
            team: &team,
        });

        phases.push(self.enter(Phase::GasEstimation, &mut observe));
        let gas = estimate_all(reader, &defaults).await;
        observe(PhaseEvent::GasEstimation(&gas));

        phases.push(self.enter(Phase::RawCalls, &mut observe));
        let raw_calls = raw_call_all(reader, &defaults).await;
        observe(PhaseEvent::RawCalls(&raw_calls));

        phases.push(self.enter(Phase::Latency, &mut observe));
        let sampler = LatencySampler::new(self.options.iterations);
        let latency = sample_all(reader, &defaults, &sampler).await;
        observe(PhaseEvent::Latency(&latency));

        phases.push(self.enter(Phase::CrossReference, &mut observe));
        let ids = working_set_of(discovered, self.options.working_set_size);
        let cross_reference = CrossReferenceDriver::new(reader).run(&ids).await;
        observe(PhaseEvent::CrossReference(&cross_reference));

        Ok(SuiteReport {
            chain,
            debug_info,
            discovery,
            defaults,
            fixture,
            league,
            team,
            gas,
            raw_calls,
            latency,
            cross_reference,
            phases,
        })
    }

    fn enter<F>(&self, phase: Phase, observe: &mut F) -> Phase
    where
        F: FnMut(PhaseEvent<'_>),
    {
        info!(%phase, "starting phase");
        observe(PhaseEvent::Started(phase));
        phase
    }
}

/// Read the current match and refine `defaults` from it.
pub async fn read_match_with_defaults<T: PrecompileTransport>(
    reader: &PrecompileReader<T>,
    defaults: Defaults,
) -> (std::result::Result<Match, HarnessError>, Defaults) {
    let fixture = reader.read_match(defaults.match_id).await;
    let defaults = match &fixture {
        Ok(m) => defaults.with_match(m),
        Err(_) => defaults,
    };
    (fixture, defaults)
}

/// Estimate gas for each of the four calls.
pub async fn estimate_all<T: PrecompileTransport>(
    reader: &PrecompileReader<T>,
    defaults: &Defaults,
) -> Vec<OperationResult<u64>> {
    let mut results = Vec::new();
    for operation in defaults.operations() {
        results.push(OperationResult {
            operation,
            result: reader.estimate_gas(operation).await,
        });
    }
    results
}

/// Issue each of the four calls undecoded.
pub async fn raw_call_all<T: PrecompileTransport>(
    reader: &PrecompileReader<T>,
    defaults: &Defaults,
) -> Vec<OperationResult<RawCallReport>> {
    let mut results = Vec::new();
    for operation in defaults.operations() {
        results.push(OperationResult {
            operation,
            result: reader.raw_call(operation).await,
        });
    }
    results
}

/// Sample latency for each of the four calls.
pub async fn sample_all<T: PrecompileTransport>(
    reader: &PrecompileReader<T>,
    defaults: &Defaults,
    sampler: &LatencySampler,
) -> Vec<LatencyReport> {
    let mut reports = Vec::new();
    for operation in defaults.operations() {
        let label = operation.to_string();
        reports.push(sampler.sample(&label, move || reader.invoke(operation)).await);
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(league_id: u64, home_id: u64) -> Match {
        Match {
            id: 42,
            league_id,
            name: String::new(),
            time: String::new(),
            home_id,
            home_name: String::new(),
            home_score: 0,
            away_id: 0,
            away_name: String::new(),
            away_score: 0,
            started: false,
            finished: false,
            cancelled: false,
        }
    }

    #[test]
    fn test_defaults_from_discovery() {
        let d = Defaults::default().with_discovery(&[42, 7]);
        assert_eq!(d.match_id, 42);
        assert_eq!(Defaults::default().with_discovery(&[]), Defaults::default());
    }

    #[test]
    fn test_defaults_from_match_ignores_zero() {
        let d = Defaults::default().with_match(&fixture(5, 9));
        assert_eq!((d.league_id, d.team_id), (5, 9));

        let kept = d.with_match(&fixture(0, 0));
        assert_eq!(kept, d);
    }

    #[test]
    fn test_operations_follow_defaults() {
        let d = Defaults {
            match_id: 42,
            league_id: 5,
            team_id: 9,
        };
        assert_eq!(
            d.operations(),
            [
                Operation::GetMatch(42),
                Operation::GetLeague(5),
                Operation::GetTeam(9),
                Operation::GetUnfinishedMatches,
            ]
        );
    }

    #[test]
    fn test_phase_order() {
        assert_eq!(Phase::ALL[0], Phase::Connectivity);
        assert_eq!(Phase::ALL[7], Phase::CrossReference);
        assert_eq!(Phase::CrossReference.to_string(), "cross-reference");
    }
}
