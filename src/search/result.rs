//! Search reports and statistics

use crate::search::config::Algorithm;
use std::time::Duration;

/// How a search run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchOutcome {
    /// The deadline elapsed (the normal end of a prime search).
    #[default]
    TimedOut,
    /// The candidate range ran out before the deadline.
    Exhausted,
}

impl std::fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchOutcome::TimedOut => write!(f, "deadline reached"),
            SearchOutcome::Exhausted => write!(f, "search space exhausted"),
        }
    }
}

/// Result of a prime search
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// Largest confirmed prime (2 if nothing larger was found)
    pub best: u64,
    pub outcome: SearchOutcome,
    pub statistics: SearchStatistics,
}

impl SearchReport {
    /// Report for a run that performed no work.
    pub fn initial(algorithm: Algorithm) -> Self {
        Self {
            best: 2,
            outcome: SearchOutcome::TimedOut,
            statistics: SearchStatistics::new(algorithm),
        }
    }

    /// Number of decimal digits in the best prime
    pub fn digits(&self) -> usize {
        self.best.to_string().len()
    }
}

impl std::fmt::Display for SearchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Largest prime found: {}", self.best)?;
        writeln!(f, "Digits: {}", self.digits())?;
        writeln!(f, "Outcome: {}", self.outcome)
    }
}

/// Result of a successful factor search
#[derive(Debug, Clone)]
pub struct FactorReport {
    pub n: u64,
    pub exponent: u64,
    /// Divisor recorded by the winning worker
    pub divisor: u64,
    /// `n / divisor`
    pub cofactor: u64,
    pub private_exponent: u64,
    pub statistics: SearchStatistics,
}

impl std::fmt::Display for FactorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Modulus: {} = {} * {}", self.n, self.divisor, self.cofactor)?;
        writeln!(f, "Public key: (n={}, e={})", self.n, self.exponent)?;
        writeln!(
            f,
            "Recovered private key: (n={}, d={})",
            self.n, self.private_exponent
        )
    }
}

/// Statistics from a search operation
#[derive(Debug, Clone, Default)]
pub struct SearchStatistics {
    /// Algorithm used for the search
    pub algorithm: Algorithm,
    /// Wall-clock time from start to finalization
    pub elapsed_time: Duration,
    /// Number of candidates tested
    pub candidates_evaluated: u64,
    /// Number of candidates that were prime (or divided n)
    pub hits: u64,
    /// Number of times the shared register changed
    pub improvements_found: u64,
    /// Candidates tested per worker, indexed by worker id
    pub per_worker: Vec<u64>,
}

impl SearchStatistics {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Default::default()
        }
    }

    /// Fold one worker's tallies into the totals.
    pub fn absorb(&mut self, tally: &WorkerTally) {
        if self.per_worker.len() <= tally.worker {
            self.per_worker.resize(tally.worker + 1, 0);
        }
        self.per_worker[tally.worker] += tally.candidates;
        self.candidates_evaluated += tally.candidates;
        self.hits += tally.hits;
        self.improvements_found += tally.improvements;
    }

    /// Get candidates evaluated per second
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.candidates_evaluated as f64 / secs
        }
    }

    /// Format statistics as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Algorithm: {}\n", self.algorithm));
        s.push_str(&format!("Time: {:.2?}\n", self.elapsed_time));
        s.push_str(&format!(
            "Candidates evaluated: {}\n",
            self.candidates_evaluated
        ));
        s.push_str(&format!(
            "Throughput: {:.0} candidates/sec\n",
            self.throughput()
        ));
        s.push_str(&format!("Hits: {}\n", self.hits));
        s.push_str(&format!(
            "Improvements found: {}\n",
            self.improvements_found
        ));
        if self.per_worker.len() > 1 {
            for (worker, candidates) in self.per_worker.iter().enumerate() {
                s.push_str(&format!("  Worker {}: {} candidates\n", worker, candidates));
            }
        }
        s
    }
}

/// Counters a single worker returns when it is joined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerTally {
    pub worker: usize,
    pub candidates: u64,
    pub hits: u64,
    pub improvements: u64,
}

impl WorkerTally {
    pub fn new(worker: usize) -> Self {
        Self {
            worker,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_report() {
        let report = SearchReport::initial(Algorithm::Parallel);
        assert_eq!(report.best, 2);
        assert_eq!(report.digits(), 1);
        assert_eq!(report.statistics.candidates_evaluated, 0);
    }

    #[test]
    fn test_absorb_worker_tallies() {
        let mut stats = SearchStatistics::new(Algorithm::Parallel);
        stats.absorb(&WorkerTally {
            worker: 1,
            candidates: 10,
            hits: 2,
            improvements: 1,
        });
        stats.absorb(&WorkerTally {
            worker: 0,
            candidates: 5,
            hits: 1,
            improvements: 1,
        });

        assert_eq!(stats.candidates_evaluated, 15);
        assert_eq!(stats.hits, 3);
        assert_eq!(stats.improvements_found, 2);
        assert_eq!(stats.per_worker, vec![5, 10]);
    }

    #[test]
    fn test_statistics_throughput() {
        let mut stats = SearchStatistics::default();
        stats.candidates_evaluated = 10000;
        stats.elapsed_time = Duration::from_secs(10);

        assert!((stats.throughput() - 1000.0).abs() < 1e-10);
    }

    #[test]
    fn test_statistics_zero_division() {
        let stats = SearchStatistics::default();
        assert_eq!(stats.throughput(), 0.0);
    }

    #[test]
    fn test_format_summary_lists_workers() {
        let mut stats = SearchStatistics::new(Algorithm::StrideFactor);
        stats.per_worker = vec![3, 4];
        stats.candidates_evaluated = 7;
        let summary = stats.format_summary();
        assert!(summary.contains("Algorithm: stride-factor"));
        assert!(summary.contains("Worker 1: 4 candidates"));
    }

    #[test]
    fn test_factor_report_display() {
        let report = FactorReport {
            n: 3233,
            exponent: 17,
            divisor: 53,
            cofactor: 61,
            private_exponent: 2753,
            statistics: SearchStatistics::new(Algorithm::StrideFactor),
        };
        let text = report.to_string();
        assert!(text.contains("3233 = 53 * 61"));
        assert!(text.contains("d=2753"));
    }
}
