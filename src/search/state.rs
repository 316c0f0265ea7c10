//! Lifecycle of a single search call.

use tracing::debug;

/// `Idle -> Running -> {TimedOut, Succeeded} -> Joined -> Finalized`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Running,
    TimedOut,
    Succeeded,
    Joined,
    Finalized,
}

impl SearchPhase {
    pub fn can_advance_to(self, next: SearchPhase) -> bool {
        use SearchPhase::*;
        matches!(
            (self, next),
            (Idle, Running)
                | (Running, TimedOut)
                | (Running, Succeeded)
                | (TimedOut, Joined)
                | (Succeeded, Joined)
                | (Joined, Finalized)
        )
    }
}

impl std::fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchPhase::Idle => write!(f, "idle"),
            SearchPhase::Running => write!(f, "running"),
            SearchPhase::TimedOut => write!(f, "timed-out"),
            SearchPhase::Succeeded => write!(f, "succeeded"),
            SearchPhase::Joined => write!(f, "joined"),
            SearchPhase::Finalized => write!(f, "finalized"),
        }
    }
}

/// Phase tracker owned by a coordinator.
#[derive(Debug, Default)]
pub struct PhaseTracker {
    phase: SearchPhase,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Move to `next`. Illegal transitions are coordinator bugs.
    pub fn advance(&mut self, next: SearchPhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "illegal search transition {} -> {}",
            self.phase,
            next
        );
        debug!(from = %self.phase, to = %next, "search phase transition");
        self.phase = next;
    }
}
