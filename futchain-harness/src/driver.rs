//! Cross-reference driver.
//!
//! Walks a set of match ids and follows each match to its league and both
//! teams. Zero ids mean "absent" and are never looked up; when the away
//! team is the home team it is looked up only once. Every step is isolated:
//! a failure is recorded in the trace and the walk carries on.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::HarnessError;
use crate::reader::PrecompileReader;
use crate::rpc::PrecompileTransport;
use crate::types::{League, Match, Team};

/// Ids probed when discovery returns nothing.
pub const FALLBACK_MATCH_IDS: [u64; 3] = [1, 2, 3];

/// Maximum number of discovered matches to cross-reference.
pub const WORKING_SET_SIZE: usize = 5;

/// Pick the match ids to cross-reference from a discovery result.
pub fn working_set(discovered: &[u64]) -> Vec<u64> {
    working_set_of(discovered, WORKING_SET_SIZE)
}

/// Like [`working_set`] with a custom size.
pub fn working_set_of(discovered: &[u64], size: usize) -> Vec<u64> {
    if discovered.is_empty() {
        FALLBACK_MATCH_IDS.to_vec()
    } else {
        discovered.iter().copied().take(size).collect()
    }
}

/// Why a step was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The match itself could not be read.
    MatchUnavailable,
    /// The contract reported id 0.
    ZeroId,
    /// The away team is the home team, which was already looked up.
    SameAsHome,
}

/// Outcome of one step of the walk.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum Step<T> {
    Fetched(T),
    Failed(HarnessError),
    Skipped(SkipReason),
}

impl<T> Step<T> {
    fn from_result(result: crate::error::Result<T>) -> Self {
        match result {
            Ok(value) => Step::Fetched(value),
            Err(e) => Step::Failed(e),
        }
    }

    pub fn fetched(&self) -> Option<&T> {
        match self {
            Step::Fetched(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Step::Failed(_))
    }

    /// Whether a call was actually issued for this step.
    pub fn attempted(&self) -> bool {
        !matches!(self, Step::Skipped(_))
    }
}

/// Everything learned about one match id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchTrace {
    pub match_id: u64,
    pub fixture: Step<Match>,
    pub league: Step<League>,
    pub home_team: Step<Team>,
    pub away_team: Step<Team>,
}

impl MatchTrace {
    /// Number of lookups that failed for this match.
    pub fn failures(&self) -> usize {
        [
            self.fixture.is_failed(),
            self.league.is_failed(),
            self.home_team.is_failed(),
            self.away_team.is_failed(),
        ]
        .into_iter()
        .filter(|f| *f)
        .count()
    }
}

/// Result of walking a working set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrossReferenceReport {
    /// The ids that were walked, in order.
    pub match_ids: Vec<u64>,
    pub traces: Vec<MatchTrace>,
}

impl CrossReferenceReport {
    pub fn failures(&self) -> usize {
        self.traces.iter().map(MatchTrace::failures).sum()
    }
}

/// Follows matches to their leagues and teams.
pub struct CrossReferenceDriver<'a, T> {
    reader: &'a PrecompileReader<T>,
}

impl<'a, T: PrecompileTransport> CrossReferenceDriver<'a, T> {
    pub fn new(reader: &'a PrecompileReader<T>) -> Self {
        Self { reader }
    }

    /// Walk `match_ids` one at a time, in order.
    pub async fn run(&self, match_ids: &[u64]) -> CrossReferenceReport {
        info!(ids = ?match_ids, "cross-referencing matches");

        let mut traces = Vec::with_capacity(match_ids.len());
        for &id in match_ids {
            traces.push(self.trace(id).await);
        }

        CrossReferenceReport {
            match_ids: match_ids.to_vec(),
            traces,
        }
    }

    /// Walk a single match.
    pub async fn trace(&self, match_id: u64) -> MatchTrace {
        let fixture = match self.reader.read_match(match_id).await {
            Ok(m) => m,
            Err(e) => {
                return MatchTrace {
                    match_id,
                    fixture: Step::Failed(e),
                    league: Step::Skipped(SkipReason::MatchUnavailable),
                    home_team: Step::Skipped(SkipReason::MatchUnavailable),
                    away_team: Step::Skipped(SkipReason::MatchUnavailable),
                };
            }
        };

        let league = match fixture.league() {
            Some(id) => Step::from_result(self.reader.read_league(id).await),
            None => self.skip(match_id, "league", SkipReason::ZeroId),
        };

        let home_team = match fixture.home_team() {
            Some(id) => Step::from_result(self.reader.read_team(id).await),
            None => self.skip(match_id, "home team", SkipReason::ZeroId),
        };

        let away_team = match fixture.away_team() {
            Some(id) if id == fixture.home_id => {
                self.skip(match_id, "away team", SkipReason::SameAsHome)
            }
            Some(id) => Step::from_result(self.reader.read_team(id).await),
            None => self.skip(match_id, "away team", SkipReason::ZeroId),
        };

        MatchTrace {
            match_id,
            fixture: Step::Fetched(fixture),
            league,
            home_team,
            away_team,
        }
    }

    fn skip<V>(&self, match_id: u64, what: &str, reason: SkipReason) -> Step<V> {
        debug!(match_id, what, ?reason, "skipping lookup");
        Step::Skipped(reason)
    }
}
