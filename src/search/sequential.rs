//! Single-threaded reference search.

use crate::arith::PrimalityOracle;
use crate::search::config::{Algorithm, SearchConfig};
use crate::search::deadline::SearchDeadline;
use crate::search::error::SearchError;
use crate::search::result::{SearchOutcome, SearchReport, SearchStatistics, WorkerTally};
use crate::search::state::{PhaseTracker, SearchPhase};
use crate::search::{PrimeSearch, odd_at_or_above};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Default first candidate of the sequential search.
pub const DEFAULT_SEQUENTIAL_BASE: u64 = 3;

/// Tests successive odd integers on the calling thread until the deadline.
pub struct SequentialSearch {
    config: SearchConfig,
    oracle: Arc<dyn PrimalityOracle>,
    statistics: SearchStatistics,
}

impl SequentialSearch {
    pub fn new(config: SearchConfig) -> Self {
        let oracle = config.oracle.build();
        Self {
            config,
            oracle,
            statistics: SearchStatistics::new(Algorithm::Sequential),
        }
    }

    /// Use a custom primality oracle instead of the configured one.
    pub fn with_oracle(mut self, oracle: Arc<dyn PrimalityOracle>) -> Self {
        self.oracle = oracle;
        self
    }
}

impl Default for SequentialSearch {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl PrimeSearch for SequentialSearch {
    fn search(&mut self, deadline: Duration) -> Result<SearchReport, SearchError> {
        self.reset();
        let deadline = SearchDeadline::starting_now(deadline);
        let mut phases = PhaseTracker::new();
        phases.advance(SearchPhase::Running);

        let base = self.config.start_base.unwrap_or(DEFAULT_SEQUENTIAL_BASE);
        let mut candidate = odd_at_or_above(base);
        let mut best = 2u64;
        let mut tally = WorkerTally::new(0);
        let mut outcome = SearchOutcome::TimedOut;

        info!(base = candidate, deadline = ?deadline.duration(), "starting sequential search");

        while !deadline.is_expired() {
            tally.candidates += 1;
            if self.oracle.is_prime(candidate) {
                tally.hits += 1;
                if candidate > best {
                    best = candidate;
                    tally.improvements += 1;
                }
            }
            match candidate.checked_add(2) {
                Some(next) => candidate = next,
                None => {
                    outcome = SearchOutcome::Exhausted;
                    break;
                }
            }
        }

        // The sequential search never ends early on success
        phases.advance(SearchPhase::TimedOut);
        phases.advance(SearchPhase::Joined);

        self.statistics.absorb(&tally);
        self.statistics.elapsed_time = deadline.elapsed();
        phases.advance(SearchPhase::Finalized);

        debug!(candidates = tally.candidates, "sequential search finished");
        info!(best, elapsed = ?self.statistics.elapsed_time, "sequential search finalized");

        Ok(SearchReport {
            best,
            outcome,
            statistics: self.statistics.clone(),
        })
    }

    fn statistics(&self) -> SearchStatistics {
        self.statistics.clone()
    }

    fn reset(&mut self) {
        self.statistics = SearchStatistics::new(Algorithm::Sequential);
    }
}
