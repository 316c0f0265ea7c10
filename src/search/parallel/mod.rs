//! Parallel prime search over a dynamic pull-queue.
//!
//! # Architecture
//!
//! The parallel search consists of:
//! - A **generator** thread pushing consecutive odd candidates into a bounded queue
//! - Multiple **workers** pulling candidates and testing them for primality
//! - A **coordinator** that waits for the deadline, cancels, joins and finalizes
//! - A shared **register** holding the largest prime confirmed so far
//!
//! # Example
//!
//! ```ignore
//! use primehunt::search::{ParallelSearch, PrimeSearch, SearchConfig};
//!
//! let config = SearchConfig::default().with_workers(4);
//! let report = ParallelSearch::new(config).search(Duration::from_secs(5))?;
//! println!("{}", report.best);
//! ```

pub mod channel;
pub mod coordinator;

pub use coordinator::{ParallelSearch, scaled_start_base};

use crate::search::PrimeSearch;
use crate::search::config::SearchConfig;
use crate::search::error::SearchError;
use std::time::Duration;

/// Largest prime found by `workers` threads before `deadline`.
///
/// Returns 2 for a zero deadline. Fails only on a zero worker count or a
/// worker failure.
pub fn find_largest_prime_parallel(deadline: Duration, workers: usize) -> Result<u64, SearchError> {
    let config = SearchConfig::default().with_workers(workers);
    ParallelSearch::new(config)
        .search(deadline)
        .map(|report| report.best)
}
