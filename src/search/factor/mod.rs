//! Parallel trial-division factor search used to recover RSA private keys.
//!
//! The odd trial divisors `3, 5, 7, ...` up to `isqrt(n)` are split into a
//! fixed stride partition, one per worker. The first worker to find a divisor
//! records it in a first-writer-wins register and cancels the others; the
//! cofactor and private exponent are derived from that single divisor.

mod coordinator;
pub mod partition;

pub use coordinator::{FactorSearch, crack_modulus};
pub use partition::{StridePartition, divisor_limit};
