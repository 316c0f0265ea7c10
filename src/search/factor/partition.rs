//! Static stride partition of odd trial divisors.

use crate::search::error::SearchError;

/// Worker `i` of `W` tests `3 + 2i, 3 + 2i + 2W, 3 + 2i + 4W, ...`
///
/// Across all `W` partitions every odd integer `>= 3` is tested exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StridePartition {
    pub worker: usize,
    pub start: u64,
    pub stride: u64,
}

impl StridePartition {
    /// One partition per worker.
    ///
    /// Fails when the stride `2 * workers` does not fit a step size.
    pub fn for_workers(workers: usize) -> Result<Vec<StridePartition>, SearchError> {
        let too_many = || {
            SearchError::invalid_argument(format!("{} workers overflow the stride", workers))
        };
        let stride = workers.checked_mul(2).ok_or_else(too_many)?;
        let stride = u64::try_from(stride).map_err(|_| too_many())?;
        Ok((0..workers)
            .map(|worker| StridePartition {
                worker,
                // worker < workers, so 2 * worker < stride fits
                start: 3 + 2 * worker as u64,
                stride,
            })
            .collect())
    }

    /// This partition's candidates up to and including `limit`.
    pub fn candidates(self, limit: u64) -> impl Iterator<Item = u64> {
        (self.start..=limit).step_by(self.stride as usize)
    }
}

/// Largest trial divisor worth testing for `n`.
pub fn divisor_limit(n: u64) -> u64 {
    n.isqrt()
}
