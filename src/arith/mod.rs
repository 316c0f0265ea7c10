//! Integer arithmetic consumed by the search engines.
//!
//! - Primality: deterministic Miller-Rabin over the full `u64` range, plus the
//!   classic 6k +/- 1 trial division as an alternative oracle
//! - Modular arithmetic: `mul_mod`, `mod_pow`, `gcd` and `modular_inverse`
//! - Prime sequences: next/previous prime, twin primes, Mersenne primes and
//!   prime factorization

pub mod modular;
pub mod primality;
pub mod sequences;

pub use modular::{gcd, mod_pow, modular_inverse, mul_mod};
pub use primality::{MillerRabin, PrimalityOracle, TrialDivision, is_prime, is_prime_trial};
pub use sequences::{
    is_mersenne_prime, next_prime, next_twin_primes, previous_prime, prime_factors,
};

use thiserror::Error;

/// Errors from modular arithmetic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArithError {
    /// The value has no inverse because it shares a factor with the modulus.
    #[error("{value} is not invertible modulo {modulus} (gcd = {gcd})")]
    NotInvertible { value: u64, modulus: u64, gcd: u64 },

    /// Inverses are only defined for a modulus of at least 1.
    #[error("modulus must be positive")]
    InvalidModulus,
}
