//! Wall-clock deadlines and the coordinator's bounded-latency wait.

use crate::search::cancel::CancellationToken;
use crate::search::error::SearchError;
use std::thread;
use std::time::{Duration, Instant};

/// A point in wall-clock time: `start + duration`.
#[derive(Debug, Clone, Copy)]
pub struct SearchDeadline {
    start: Instant,
    duration: Duration,
}

/// Why [`wait_until`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The deadline elapsed.
    Expired,
    /// The token was raised before the deadline.
    Cancelled,
    /// The caller's `done` predicate became true.
    Finished,
}

impl SearchDeadline {
    /// Start a deadline now.
    pub fn starting_now(duration: Duration) -> Self {
        Self {
            start: Instant::now(),
            duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.start.elapsed())
    }

    pub fn is_expired(&self) -> bool {
        self.start.elapsed() >= self.duration
    }
}

/// Convert caller-supplied seconds into a duration, rejecting negative and
/// non-finite values.
pub fn duration_from_secs(secs: f64) -> Result<Duration, SearchError> {
    if !secs.is_finite() {
        return Err(SearchError::invalid_argument("deadline must be a finite number of seconds"));
    }
    if secs < 0.0 {
        return Err(SearchError::invalid_argument(format!(
            "deadline must not be negative (got {})",
            secs
        )));
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|e| SearchError::invalid_argument(format!("deadline out of range: {}", e)))
}

/// Sleep in slices of at most `poll` until the deadline elapses, the token is
/// raised, or `done()` returns true.
pub fn wait_until(
    deadline: &SearchDeadline,
    token: &CancellationToken,
    poll: Duration,
    mut done: impl FnMut() -> bool,
) -> WaitOutcome {
    loop {
        if token.is_cancelled() {
            return WaitOutcome::Cancelled;
        }
        if done() {
            return WaitOutcome::Finished;
        }
        let remaining = deadline.remaining();
        if remaining.is_zero() {
            return WaitOutcome::Expired;
        }
        thread::sleep(remaining.min(poll));
    }
}
