//! Latency sampling.
//!
//! Repeats an operation a fixed number of times, strictly one after the
//! other, and summarises how long the successful iterations took. Failed
//! iterations are recorded but never enter the statistics.

use serde::{Serialize, Serializer};
use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default number of iterations per operation.
pub const DEFAULT_ITERATIONS: u32 = 10;

/// Summary over successful samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatencyStats {
    pub samples: usize,
    #[serde(serialize_with = "as_millis")]
    pub min: Duration,
    #[serde(serialize_with = "as_millis")]
    pub max: Duration,
    #[serde(serialize_with = "as_millis")]
    pub average: Duration,
}

impl LatencyStats {
    /// Statistics over `samples`, or `None` when there are none.
    pub fn from_samples(samples: &[Duration]) -> Option<Self> {
        let min = samples.iter().min().copied()?;
        let max = samples.iter().max().copied()?;
        let total: Duration = samples.iter().sum();

        Some(Self {
            samples: samples.len(),
            min,
            max,
            average: total / samples.len() as u32,
        })
    }
}

/// A failed iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedIteration {
    /// 1-based iteration number.
    pub iteration: u32,
    pub error: String,
}

/// Outcome of sampling one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencyReport {
    pub label: String,
    pub iterations: u32,
    #[serde(serialize_with = "all_as_millis")]
    pub durations: Vec<Duration>,
    pub failures: Vec<FailedIteration>,
    /// `None` when every iteration failed.
    pub stats: Option<LatencyStats>,
}

/// Times repeated invocations of an operation.
#[derive(Debug, Clone, Copy)]
pub struct LatencySampler {
    iterations: u32,
}

impl Default for LatencySampler {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}

impl LatencySampler {
    pub fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Run `op` `iterations` times and time each successful run.
    pub async fn sample<F, Fut, T, E>(&self, label: &str, mut op: F) -> LatencyReport
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut durations = Vec::with_capacity(self.iterations as usize);
        let mut failures = Vec::new();

        for iteration in 1..=self.iterations {
            let start = Instant::now();
            match op().await {
                Ok(_) => durations.push(start.elapsed()),
                Err(e) => {
                    debug!(label, iteration, error = %e, "iteration failed");
                    failures.push(FailedIteration {
                        iteration,
                        error: e.to_string(),
                    });
                }
            }
        }

        LatencyReport {
            label: label.to_string(),
            iterations: self.iterations,
            stats: LatencyStats::from_samples(&durations),
            durations,
            failures,
        }
    }
}

fn as_millis<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(d.as_secs_f64() * 1000.0)
}

fn all_as_millis<S: Serializer>(ds: &[Duration], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(ds.iter().map(|d| d.as_secs_f64() * 1000.0))
}
