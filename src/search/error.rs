//! Error types for the search engines.

use std::time::Duration;
use thiserror::Error;

/// Errors returned by the prime and factor searches.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Malformed input, reported before any work starts.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No divisor was found before the deadline. Retrying with a longer
    /// deadline may succeed.
    #[error("no divisor of {n} found within {deadline:?}")]
    Timeout { n: u64, deadline: Duration },

    /// The key recovered from a factorization failed verification.
    #[error("recovered key for modulus {n} is invalid: {reason}")]
    InvalidKeyRecovery { n: u64, reason: String },

    /// A worker or the candidate generator failed; siblings were cancelled.
    #[error("{role} failed: {message}")]
    WorkerFailed { role: String, message: String },

    /// The candidate generator ran past the largest representable value.
    #[error("candidate sequence overflowed after {last}")]
    CandidateOverflow { last: u64 },
}

impl SearchError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        SearchError::InvalidArgument(message.into())
    }

    /// Only timeouts are expected to succeed on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SearchError::Timeout { .. })
    }

    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::InvalidArgument(_) => "invalid_argument",
            SearchError::Timeout { .. } => "timeout",
            SearchError::InvalidKeyRecovery { .. } => "invalid_key_recovery",
            SearchError::WorkerFailed { .. } => "worker_failed",
            SearchError::CandidateOverflow { .. } => "candidate_overflow",
        }
    }
}
