//! Primality oracles.

use crate::arith::modular::{mod_pow, mul_mod};

/// Witnesses that make Miller-Rabin deterministic for every `u64`.
const MILLER_RABIN_BASES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// A pure primality predicate shared by all search workers.
pub trait PrimalityOracle: Send + Sync {
    fn is_prime(&self, n: u64) -> bool;

    /// Short name used in logs and statistics
    fn name(&self) -> &'static str;
}

/// Deterministic Miller-Rabin oracle (default).
#[derive(Debug, Clone, Copy, Default)]
pub struct MillerRabin;

impl PrimalityOracle for MillerRabin {
    fn is_prime(&self, n: u64) -> bool {
        is_prime(n)
    }

    fn name(&self) -> &'static str {
        "miller-rabin"
    }
}

/// Trial division by 6k +/- 1 up to the square root.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrialDivision;

impl PrimalityOracle for TrialDivision {
    fn is_prime(&self, n: u64) -> bool {
        is_prime_trial(n)
    }

    fn name(&self) -> &'static str {
        "trial-division"
    }
}

/// Deterministic Miller-Rabin primality test, exact for all `u64` values.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    for &p in &MILLER_RABIN_BASES {
        if n % p == 0 {
            return n == p;
        }
    }

    // n - 1 = d * 2^r with d odd
    let r = (n - 1).trailing_zeros();
    let d = (n - 1) >> r;

    'witness: for &a in &MILLER_RABIN_BASES {
        let mut x = mod_pow(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..r {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Trial division primality test using the 6k +/- 1 pattern.
pub fn is_prime_trial(n: u64) -> bool {
    if n <= 1 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let limit = n.isqrt();
    let mut i = 5;
    while i <= limit {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_primes() {
        let primes: Vec<u64> = (0..60).filter(|&n| is_prime(n)).collect();
        assert_eq!(
            primes,
            vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59]
        );
    }

    #[test]
    fn test_edge_cases() {
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(is_prime(2));
        assert!(!is_prime(4));
        assert!(!is_prime(25));
    }

    #[test]
    fn test_oracles_agree() {
        for n in 0..20_000u64 {
            assert_eq!(is_prime(n), is_prime_trial(n), "disagreement at {}", n);
        }
    }

    #[test]
    fn test_large_values() {
        // Largest prime below 2^64
        assert!(is_prime(18_446_744_073_709_551_557));
        assert!(!is_prime(u64::MAX));
        assert!(is_prime(281_474_976_710_677));
        // Strong pseudoprime to several small bases
        assert!(!is_prime(3_215_031_751));
        assert!(!is_prime(4_294_967_297)); // 641 * 6700417
        assert!(is_prime(1_000_000_007));
    }

    #[test]
    fn test_carmichael_numbers() {
        for n in [561u64, 1105, 1729, 2465, 2821, 6601, 8911] {
            assert!(!is_prime(n), "{} is a Carmichael number", n);
            assert!(!is_prime_trial(n));
        }
    }

    #[test]
    fn test_oracle_trait_objects() {
        let oracles: Vec<Box<dyn PrimalityOracle>> =
            vec![Box::new(MillerRabin), Box::new(TrialDivision)];
        for oracle in &oracles {
            assert!(oracle.is_prime(104_729), "{}", oracle.name());
            assert!(!oracle.is_prime(104_730), "{}", oracle.name());
        }
    }
}
