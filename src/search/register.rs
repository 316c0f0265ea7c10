//! Shared best-result registers.
//!
//! Workers never touch the guarded value directly: [`MaxRegister::offer`] is a
//! compare-and-update and [`DivisorRegister::set_if_unset`] is a one-shot write.
//! Both hold their lock only for the comparison and the store.

use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // The guarded values are plain integers, so a panic while holding the
    // lock cannot leave them half-written.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Largest value seen so far. Monotonically non-decreasing.
#[derive(Debug)]
pub struct MaxRegister {
    value: Mutex<u64>,
}

impl MaxRegister {
    pub fn new(initial: u64) -> Self {
        Self {
            value: Mutex::new(initial),
        }
    }

    /// Store `candidate` if it is larger than the current value.
    /// Returns true if the register changed.
    pub fn offer(&self, candidate: u64) -> bool {
        let mut current = lock(&self.value);
        if candidate > *current {
            *current = candidate;
            true
        } else {
            false
        }
    }

    pub fn get(&self) -> u64 {
        *lock(&self.value)
    }
}

/// Holds the first divisor reported by any worker. Later writes are ignored.
#[derive(Debug, Default)]
pub struct DivisorRegister {
    value: Mutex<Option<u64>>,
}

impl DivisorRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `divisor` unless another worker already did.
    /// Returns true if this call recorded it.
    pub fn set_if_unset(&self, divisor: u64) -> bool {
        let mut slot = lock(&self.value);
        if slot.is_none() {
            *slot = Some(divisor);
            true
        } else {
            false
        }
    }

    pub fn get(&self) -> Option<u64> {
        *lock(&self.value)
    }
}
