//! Deadline-bounded search engines
//!
//! This module provides the searches and the coordination primitives they share:
//! - Sequential: single-threaded reference prime search
//! - Parallel: one candidate generator feeding a worker pool through a bounded queue
//! - Factor: workers walking disjoint stride partitions of trial divisors
//!
//! Every call builds its own token, queue, registers and threads; nothing is
//! shared between calls.

pub mod cancel;
pub mod config;
pub mod deadline;
pub mod error;
pub mod factor;
pub mod parallel;
pub mod register;
pub mod result;
pub mod sequential;
pub mod state;

pub use cancel::CancellationToken;
pub use config::{Algorithm, FactorConfig, OracleKind, SearchConfig};
pub use deadline::{SearchDeadline, duration_from_secs};
pub use error::SearchError;
pub use factor::{FactorSearch, crack_modulus};
pub use parallel::{ParallelSearch, find_largest_prime_parallel};
pub use result::{FactorReport, SearchOutcome, SearchReport, SearchStatistics};
pub use sequential::SequentialSearch;

use std::any::Any;
use std::io;
use std::thread::JoinHandle;
use std::time::Duration;

/// Trait for searches that return the largest prime found before a deadline
pub trait PrimeSearch {
    /// Search until `deadline` has elapsed
    ///
    /// # Returns
    /// A SearchReport whose `best` is 2 if nothing larger was confirmed
    fn search(&mut self, deadline: Duration) -> Result<SearchReport, SearchError>;

    /// Get statistics from the most recent search
    fn statistics(&self) -> SearchStatistics;

    /// Reset the search state for a new search
    fn reset(&mut self);
}

/// Largest prime found by the single-threaded reference search.
pub fn find_largest_prime_sequential(deadline: Duration) -> Result<u64, SearchError> {
    SequentialSearch::default().search(deadline).map(|report| report.best)
}

/// Smallest odd integer `>= n`.
pub(crate) fn odd_at_or_above(n: u64) -> u64 {
    // u64::MAX is odd, so the increment never overflows
    if n % 2 == 0 { n + 1 } else { n }
}

/// Best-effort text of a thread's panic payload.
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Cancel and join the threads already started after `role` failed to spawn.
pub(crate) fn abandon_spawn<T>(
    cancel: &CancellationToken,
    started: Vec<JoinHandle<T>>,
    role: String,
    err: io::Error,
) -> SearchError {
    cancel.cancel();
    for handle in started {
        // The spawn failure is the error reported
        let _ = handle.join();
    }
    SearchError::WorkerFailed {
        role,
        message: format!("failed to spawn thread: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arith::is_prime;

    #[test]
    fn test_odd_at_or_above() {
        assert_eq!(odd_at_or_above(0), 1);
        assert_eq!(odd_at_or_above(3), 3);
        assert_eq!(odd_at_or_above(10), 11);
        assert_eq!(odd_at_or_above(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_panic_message() {
        let payload = std::thread::spawn(|| panic!("static message"))
            .join()
            .unwrap_err();
        assert_eq!(panic_message(payload), "static message");

        let payload = std::thread::spawn(|| panic!("formatted {}", 42))
            .join()
            .unwrap_err();
        assert_eq!(panic_message(payload), "formatted 42");
    }

    #[test]
    fn test_abandon_spawn_stops_started_threads() {
        let cancel = CancellationToken::new();
        let started: Vec<_> = (0..3)
            .map(|_| {
                let cancel = cancel.clone();
                std::thread::spawn(move || {
                    while !cancel.is_cancelled() {
                        std::thread::sleep(Duration::from_millis(5));
                    }
                })
            })
            .collect();

        let err = abandon_spawn(
            &cancel,
            started,
            "worker 3".to_string(),
            io::Error::new(io::ErrorKind::WouldBlock, "resource temporarily unavailable"),
        );
        assert!(cancel.is_cancelled());
        match err {
            SearchError::WorkerFailed { role, message } => {
                assert_eq!(role, "worker 3");
                assert!(message.contains("failed to spawn thread"));
            }
            other => panic!("expected WorkerFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_find_largest_prime_sequential() {
        assert_eq!(find_largest_prime_sequential(Duration::ZERO), Ok(2));
        let best = find_largest_prime_sequential(Duration::from_millis(100)).unwrap();
        assert!(is_prime(best));
    }
}
