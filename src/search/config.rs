//! Configuration types for the search engines

use crate::arith::{MillerRabin, PrimalityOracle, TrialDivision};
use crate::search::error::SearchError;
use std::sync::Arc;
use std::time::Duration;

/// Default capacity of the candidate queue between generator and workers.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Default latency bound for observing cancellation.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default worker count for the factor search.
pub const DEFAULT_FACTOR_WORKERS: usize = 4;

/// Value encrypted and decrypted to verify a recovered key.
pub const DEFAULT_TEST_MESSAGE: u64 = 42;

/// Largest worker pool either search will spawn.
pub const MAX_WORKERS: usize = 1024;

/// Largest candidate queue the parallel search will allocate.
pub const MAX_QUEUE_CAPACITY: usize = 1 << 20;

fn validate_workers(workers: usize) -> Result<(), SearchError> {
    if workers == 0 {
        return Err(SearchError::invalid_argument("worker count must be at least 1"));
    }
    if workers > MAX_WORKERS {
        return Err(SearchError::invalid_argument(format!(
            "worker count must be at most {} (got {})",
            MAX_WORKERS, workers
        )));
    }
    Ok(())
}

/// Search algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Single-threaded reference search over odd candidates
    #[default]
    Sequential,
    /// Generator plus worker pool pulling from a bounded queue
    Parallel,
    /// Static stride partition of trial divisors
    StrideFactor,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::Sequential => write!(f, "sequential"),
            Algorithm::Parallel => write!(f, "parallel"),
            Algorithm::StrideFactor => write!(f, "stride-factor"),
        }
    }
}

/// Primality oracle selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OracleKind {
    /// Deterministic Miller-Rabin
    #[default]
    MillerRabin,
    /// 6k +/- 1 trial division
    TrialDivision,
}

impl OracleKind {
    pub fn build(self) -> Arc<dyn PrimalityOracle> {
        match self {
            OracleKind::MillerRabin => Arc::new(MillerRabin),
            OracleKind::TrialDivision => Arc::new(TrialDivision),
        }
    }
}

/// Configuration for the prime searches (sequential and parallel).
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Number of worker threads (parallel search only).
    pub workers: usize,
    /// Capacity of the bounded candidate queue.
    pub queue_capacity: usize,
    /// Upper bound on how long a blocked thread waits before re-checking
    /// cancellation.
    pub poll_interval: Duration,
    /// First candidate (normalized to odd). `None` uses the algorithm default:
    /// 3 for sequential, deadline-scaled for parallel.
    pub start_base: Option<u64>,
    /// Primality test used by every worker.
    pub oracle: OracleKind,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            poll_interval: DEFAULT_POLL_INTERVAL,
            start_base: None,
            oracle: OracleKind::default(),
        }
    }
}

impl SearchConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_workers_option(mut self, workers: Option<usize>) -> Self {
        if let Some(workers) = workers {
            self.workers = workers;
        }
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_start_base(mut self, base: u64) -> Self {
        self.start_base = Some(base);
        self
    }

    pub fn with_start_base_option(mut self, base: Option<u64>) -> Self {
        self.start_base = base;
        self
    }

    pub fn with_oracle(mut self, oracle: OracleKind) -> Self {
        self.oracle = oracle;
        self
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        validate_workers(self.workers)?;
        if self.queue_capacity == 0 {
            return Err(SearchError::invalid_argument("queue capacity must be at least 1"));
        }
        if self.queue_capacity > MAX_QUEUE_CAPACITY {
            return Err(SearchError::invalid_argument(format!(
                "queue capacity must be at most {} (got {})",
                MAX_QUEUE_CAPACITY, self.queue_capacity
            )));
        }
        if self.poll_interval.is_zero() {
            return Err(SearchError::invalid_argument("poll interval must be positive"));
        }
        Ok(())
    }
}

/// Configuration for the stride-partitioned factor search.
#[derive(Debug, Clone)]
pub struct FactorConfig {
    /// Number of worker threads, each owning one stride partition.
    pub workers: usize,
    /// Coordinator polling granularity.
    pub poll_interval: Duration,
    /// Plaintext used to verify the recovered key (clamped below n).
    pub test_message: u64,
}

impl Default for FactorConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_FACTOR_WORKERS,
            poll_interval: DEFAULT_POLL_INTERVAL,
            test_message: DEFAULT_TEST_MESSAGE,
        }
    }
}

impl FactorConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_workers_option(mut self, workers: Option<usize>) -> Self {
        if let Some(workers) = workers {
            self.workers = workers;
        }
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_test_message(mut self, message: u64) -> Self {
        self.test_message = message;
        self
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        validate_workers(self.workers)?;
        if self.poll_interval.is_zero() {
            return Err(SearchError::invalid_argument("poll interval must be positive"));
        }
        Ok(())
    }
}
