//! Parallel prime search coordinator that manages the generator and worker threads.

use crate::arith::PrimalityOracle;
use crate::search::cancel::CancellationToken;
use crate::search::config::{Algorithm, SearchConfig};
use crate::search::deadline::{SearchDeadline, WaitOutcome, wait_until};
use crate::search::error::SearchError;
use crate::search::parallel::channel::{WorkerChannel, create_channels, run_generator};
use crate::search::register::MaxRegister;
use crate::search::result::{SearchOutcome, SearchReport, SearchStatistics, WorkerTally};
use crate::search::state::{PhaseTracker, SearchPhase};
use crate::search::{PrimeSearch, abandon_spawn, odd_at_or_above, panic_message};
use crossbeam_channel::RecvTimeoutError;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// The base exponent never exceeds this so that `10^exp` fits in `u64`.
const MAX_BASE_EXPONENT: u64 = 18;

/// First candidate for a deadline: `10^(6 + floor(secs / 4))`, made odd.
///
/// Longer deadlines start higher because they can afford larger candidates.
pub fn scaled_start_base(deadline: Duration) -> u64 {
    let exponent = (6 + deadline.as_secs() / 4).min(MAX_BASE_EXPONENT);
    odd_at_or_above(10u64.pow(exponent as u32))
}

/// Generator plus worker pool pulling candidates from a bounded queue.
pub struct ParallelSearch {
    config: SearchConfig,
    oracle: Arc<dyn PrimalityOracle>,
    statistics: SearchStatistics,
}

impl ParallelSearch {
    pub fn new(config: SearchConfig) -> Self {
        let oracle = config.oracle.build();
        Self {
            config,
            oracle,
            statistics: SearchStatistics::new(Algorithm::Parallel),
        }
    }

    /// Use a custom primality oracle instead of the configured one.
    pub fn with_oracle(mut self, oracle: Arc<dyn PrimalityOracle>) -> Self {
        self.oracle = oracle;
        self
    }
}

impl Default for ParallelSearch {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl PrimeSearch for ParallelSearch {
    fn search(&mut self, deadline: Duration) -> Result<SearchReport, SearchError> {
        self.reset();
        self.config.validate()?;

        if deadline.is_zero() {
            debug!("zero deadline, skipping parallel search");
            return Ok(SearchReport::initial(Algorithm::Parallel));
        }

        let deadline = SearchDeadline::starting_now(deadline);
        let mut phases = PhaseTracker::new();
        let cancel = CancellationToken::new();
        let best = Arc::new(MaxRegister::new(2));
        let poll = self.config.poll_interval;
        let num_workers = self.config.workers;
        let first = odd_at_or_above(
            self.config
                .start_base
                .unwrap_or_else(|| scaled_start_base(deadline.duration())),
        );

        let (generator_channel, worker_channels) =
            create_channels(self.config.queue_capacity, num_workers, &cancel);

        phases.advance(SearchPhase::Running);
        info!(
            workers = num_workers,
            base = first,
            oracle = self.oracle.name(),
            deadline = ?deadline.duration(),
            "starting parallel prime search"
        );

        let generator_cancel = cancel.clone();
        let spawned = thread::Builder::new()
            .name("prime-generator".to_string())
            .spawn(move || {
                let _guard = generator_cancel.cancel_on_panic();
                let result = run_generator(generator_channel, first, poll);
                if result.is_err() {
                    generator_cancel.cancel();
                }
                result
            });
        let generator = match spawned {
            Ok(handle) => handle,
            Err(err) => {
                let err = abandon_spawn::<()>(&cancel, Vec::new(), "generator".to_string(), err);
                warn!(error = %err, "parallel search failed to start");
                return Err(err);
            }
        };

        let mut worker_handles = Vec::with_capacity(num_workers);
        for (worker_id, channel) in worker_channels.into_iter().enumerate() {
            let oracle = Arc::clone(&self.oracle);
            let best = Arc::clone(&best);
            let spawned = thread::Builder::new()
                .name(format!("prime-worker-{}", worker_id))
                .spawn(move || run_worker(worker_id, channel, oracle.as_ref(), &best, poll));
            match spawned {
                Ok(handle) => worker_handles.push(handle),
                Err(err) => {
                    let role = format!("worker {}", worker_id);
                    let err = abandon_spawn(&cancel, worker_handles, role, err);
                    // Workers are gone, so the generator sees cancellation or a hang-up
                    let _ = generator.join();
                    warn!(error = %err, "parallel search failed to start");
                    return Err(err);
                }
            }
        }

        // Only a failing thread cancels before the deadline
        let waited = wait_until(&deadline, &cancel, poll, || false);
        cancel.cancel();
        phases.advance(SearchPhase::TimedOut);
        if waited == WaitOutcome::Cancelled {
            warn!("parallel search cancelled before its deadline");
        }

        let mut failure: Option<SearchError> = None;
        match generator.join() {
            Ok(Ok(produced)) => debug!(produced, "generator joined"),
            Ok(Err(err)) => {
                failure.get_or_insert(err);
            }
            Err(payload) => {
                failure.get_or_insert(SearchError::WorkerFailed {
                    role: "generator".to_string(),
                    message: panic_message(payload),
                });
            }
        }
        for (worker_id, handle) in worker_handles.into_iter().enumerate() {
            match handle.join() {
                Ok(tally) => self.statistics.absorb(&tally),
                Err(payload) => {
                    failure.get_or_insert(SearchError::WorkerFailed {
                        role: format!("worker {}", worker_id),
                        message: panic_message(payload),
                    });
                }
            }
        }
        phases.advance(SearchPhase::Joined);
        self.statistics.elapsed_time = deadline.elapsed();

        if let Some(err) = failure {
            warn!(error = %err, "parallel search failed");
            return Err(err);
        }

        let best = best.get();
        phases.advance(SearchPhase::Finalized);
        info!(
            best,
            candidates = self.statistics.candidates_evaluated,
            elapsed = ?self.statistics.elapsed_time,
            "parallel search finalized"
        );

        Ok(SearchReport {
            best,
            outcome: SearchOutcome::TimedOut,
            statistics: self.statistics.clone(),
        })
    }

    fn statistics(&self) -> SearchStatistics {
        self.statistics.clone()
    }

    fn reset(&mut self) {
        self.statistics = SearchStatistics::new(Algorithm::Parallel);
    }
}

/// Pull candidates until cancelled or the generator hangs up.
fn run_worker(
    worker_id: usize,
    channel: WorkerChannel,
    oracle: &dyn PrimalityOracle,
    best: &MaxRegister,
    poll: Duration,
) -> WorkerTally {
    let _guard = channel.cancel.cancel_on_panic();
    let mut tally = WorkerTally::new(worker_id);

    while !channel.cancel.is_cancelled() {
        match channel.from_generator.recv_timeout(poll) {
            Ok(candidate) => {
                tally.candidates += 1;
                if oracle.is_prime(candidate) {
                    tally.hits += 1;
                    if best.offer(candidate) {
                        tally.improvements += 1;
                        debug!(worker = worker_id, prime = candidate, "new best prime");
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    tally
}
