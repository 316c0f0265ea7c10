//! Factor search coordinator: stride workers racing for the first divisor.

use crate::arith::modular_inverse;
use crate::rsa::{PrivateKey, PublicKey, decrypt, encrypt};
use crate::search::cancel::CancellationToken;
use crate::search::config::{Algorithm, FactorConfig};
use crate::search::deadline::{SearchDeadline, WaitOutcome, wait_until};
use crate::search::error::SearchError;
use crate::search::factor::partition::{StridePartition, divisor_limit};
use crate::search::{abandon_spawn, panic_message};
use crate::search::register::DivisorRegister;
use crate::search::result::{FactorReport, SearchStatistics, WorkerTally};
use crate::search::state::{PhaseTracker, SearchPhase};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Recovers an RSA private exponent by trial division of the modulus.
pub struct FactorSearch {
    config: FactorConfig,
    statistics: SearchStatistics,
}

impl FactorSearch {
    pub fn new(config: FactorConfig) -> Self {
        Self {
            config,
            statistics: SearchStatistics::new(Algorithm::StrideFactor),
        }
    }

    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    pub fn reset(&mut self) {
        self.statistics = SearchStatistics::new(Algorithm::StrideFactor);
    }

    /// Factor `n` and derive the private exponent matching `exponent`.
    pub fn crack(
        &mut self,
        n: u64,
        exponent: u64,
        deadline: Duration,
    ) -> Result<FactorReport, SearchError> {
        self.reset();
        validate_inputs(n, exponent, deadline)?;
        self.config.validate()?;

        let deadline = SearchDeadline::starting_now(deadline);
        let mut phases = PhaseTracker::new();
        phases.advance(SearchPhase::Running);
        info!(
            n,
            exponent,
            workers = self.config.workers,
            deadline = ?deadline.duration(),
            "starting factor search"
        );

        let divisor = if n % 2 == 0 && n > 2 {
            // Odd stride partitions never test 2
            phases.advance(SearchPhase::Succeeded);
            phases.advance(SearchPhase::Joined);
            Some(2)
        } else {
            self.race_workers(n, &deadline, &mut phases)?
        };
        self.statistics.elapsed_time = deadline.elapsed();

        let Some(divisor) = divisor else {
            info!(n, elapsed = ?self.statistics.elapsed_time, "no divisor found");
            return Err(SearchError::Timeout {
                n,
                deadline: deadline.duration(),
            });
        };

        let (cofactor, private_exponent) =
            recover_private_exponent(n, exponent, divisor, self.config.test_message)?;
        phases.advance(SearchPhase::Finalized);
        info!(
            n,
            divisor,
            cofactor,
            elapsed = ?self.statistics.elapsed_time,
            "recovered private key"
        );

        Ok(FactorReport {
            n,
            exponent,
            divisor,
            cofactor,
            private_exponent,
            statistics: self.statistics.clone(),
        })
    }

    /// Spawn one worker per stride partition and wait for the first divisor.
    fn race_workers(
        &mut self,
        n: u64,
        deadline: &SearchDeadline,
        phases: &mut PhaseTracker,
    ) -> Result<Option<u64>, SearchError> {
        let cancel = CancellationToken::new();
        let found = Arc::new(DivisorRegister::new());
        let limit = divisor_limit(n);

        let partitions = StridePartition::for_workers(self.config.workers)?;
        let mut handles = Vec::with_capacity(partitions.len());
        for partition in partitions {
            let worker_cancel = cancel.clone();
            let worker_found = Arc::clone(&found);
            let spawned = thread::Builder::new()
                .name(format!("factor-worker-{}", partition.worker))
                .spawn(move || run_worker(n, partition, limit, &worker_found, &worker_cancel));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    let role = format!("worker {}", partition.worker);
                    let err = abandon_spawn(&cancel, handles, role, err);
                    warn!(error = %err, "factor search failed to start");
                    return Err(err);
                }
            }
        }

        let waited = wait_until(deadline, &cancel, self.config.poll_interval, || {
            handles.iter().all(|handle| handle.is_finished())
        });
        cancel.cancel();

        if found.get().is_some() {
            phases.advance(SearchPhase::Succeeded);
        } else {
            phases.advance(SearchPhase::TimedOut);
        }
        match waited {
            WaitOutcome::Finished => debug!(limit, "every partition exhausted"),
            WaitOutcome::Expired => debug!("factor search deadline reached"),
            WaitOutcome::Cancelled => debug!("factor search cancelled early"),
        }

        let mut failure: Option<SearchError> = None;
        for (worker_id, handle) in handles.into_iter().enumerate() {
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

        if let Some(err) = failure {
            warn!(error = %err, "factor search failed");
            return Err(err);
        }
        Ok(found.get())
    }
}

impl Default for FactorSearch {
    fn default() -> Self {
        Self::new(FactorConfig::default())
    }
}

/// Factor `n` with the default configuration and return `(n, d)`.
pub fn crack_modulus(n: u64, exponent: u64, deadline: Duration) -> Result<(u64, u64), SearchError> {
    FactorSearch::default()
        .crack(n, exponent, deadline)
        .map(|report| (report.n, report.private_exponent))
}

fn validate_inputs(n: u64, exponent: u64, deadline: Duration) -> Result<(), SearchError> {
    if n <= 1 {
        return Err(SearchError::invalid_argument(format!(
            "n must be greater than 1 (got {})",
            n
        )));
    }
    if exponent == 0 {
        return Err(SearchError::invalid_argument("exponent must be positive"));
    }
    if deadline.is_zero() {
        return Err(SearchError::invalid_argument("deadline must be positive"));
    }
    Ok(())
}

/// Walk one partition until a divisor is found, the range ends, or cancellation.
fn run_worker(
    n: u64,
    partition: StridePartition,
    limit: u64,
    found: &DivisorRegister,
    cancel: &CancellationToken,
) -> WorkerTally {
    let _guard = cancel.cancel_on_panic();
    let mut tally = WorkerTally::new(partition.worker);

    for candidate in partition.candidates(limit) {
        if cancel.is_cancelled() {
            break;
        }
        tally.candidates += 1;
        if n % candidate == 0 {
            tally.hits += 1;
            if found.set_if_unset(candidate) {
                tally.improvements += 1;
                debug!(worker = partition.worker, divisor = candidate, "divisor found");
            }
            cancel.cancel();
            break;
        }
    }

    tally
}

/// Derive `(q, d)` from a divisor `p` of `n` and verify the key round-trips.
fn recover_private_exponent(
    n: u64,
    exponent: u64,
    p: u64,
    test_message: u64,
) -> Result<(u64, u64), SearchError> {
    let invalid = |reason: String| SearchError::InvalidKeyRecovery { n, reason };

    let q = n / p;
    // (p - 1)(q - 1) < pq = n, so this cannot overflow
    let phi = (p - 1) * (q - 1);
    let d = modular_inverse(exponent, phi).map_err(|err| invalid(err.to_string()))?;

    let message = test_message.clamp(1, n - 1);
    let cipher =
        encrypt(message, &PublicKey { n, e: exponent }).map_err(|err| invalid(err.to_string()))?;
    let plain = decrypt(cipher, &PrivateKey { n, d }).map_err(|err| invalid(err.to_string()))?;
    if plain != message {
        return Err(invalid(format!(
            "test message {} decrypted to {} with d = {}",
            message, plain, d
        )));
    }

    Ok((q, d))
}
