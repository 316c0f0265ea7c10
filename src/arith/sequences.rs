//! Prime sequences and factorization helpers.

use crate::arith::primality::is_prime;

/// Smallest prime strictly greater than `n`, or `None` if it does not fit in `u64`.
pub fn next_prime(n: u64) -> Option<u64> {
    if n < 2 {
        return Some(2);
    }
    let mut candidate = n.checked_add(1)?;
    if candidate > 2 && candidate % 2 == 0 {
        candidate = candidate.checked_add(1)?;
    }
    while !is_prime(candidate) {
        candidate = candidate.checked_add(2)?;
    }
    Some(candidate)
}

/// Largest prime strictly less than `n`, or `None` when `n <= 2`.
pub fn previous_prime(n: u64) -> Option<u64> {
    if n <= 2 {
        return None;
    }
    if n == 3 {
        return Some(2);
    }
    let mut candidate = n - 1;
    if candidate % 2 == 0 {
        candidate -= 1;
    }
    while candidate >= 3 {
        if is_prime(candidate) {
            return Some(candidate);
        }
        candidate -= 2;
    }
    Some(2)
}

/// Next twin prime pair `(k, k + 2)` with `k > n`.
///
/// Negative starting points are accepted and behave like starting below 3.
pub fn next_twin_primes(n: i64) -> Option<(u64, u64)> {
    let mut k = u64::try_from(n.saturating_add(1)).unwrap_or(0).max(3);
    if k % 2 == 0 {
        k += 1;
    }
    loop {
        let upper = k.checked_add(2)?;
        if is_prime(k) && is_prime(upper) {
            return Some((k, upper));
        }
        k = upper;
    }
}

/// True if `n` is a Mersenne prime: `n = 2^p - 1` with both `p` and `n` prime.
pub fn is_mersenne_prime(n: u64) -> bool {
    if n < 3 {
        return false;
    }
    // n + 1 must be a power of two; n = u64::MAX is 2^64 - 1 and 64 is not prime
    let Some(next) = n.checked_add(1) else {
        return false;
    };
    if !next.is_power_of_two() {
        return false;
    }
    let p = next.trailing_zeros() as u64;
    is_prime(p) && is_prime(n)
}

/// Prime factors of `|n|` in ascending order, with multiplicity.
/// Returns an empty list for 0 and 1.
pub fn prime_factors(n: i64) -> Vec<u64> {
    let mut n = n.unsigned_abs();
    let mut factors = Vec::new();
    if n < 2 {
        return factors;
    }

    while n % 2 == 0 {
        factors.push(2);
        n /= 2;
    }
    let mut divisor = 3u64;
    while divisor <= n / divisor {
        while n % divisor == 0 {
            factors.push(divisor);
            n /= divisor;
        }
        divisor += 2;
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_prime() {
        assert_eq!(next_prime(0), Some(2));
        assert_eq!(next_prime(1), Some(2));
        assert_eq!(next_prime(2), Some(3));
        assert_eq!(next_prime(3), Some(5));
        assert_eq!(next_prime(17), Some(19));
        assert_eq!(next_prime(24), Some(29));
        assert_eq!(next_prime(89), Some(97));
        assert_eq!(next_prime(1000), Some(1009));
        assert_eq!(next_prime(u64::MAX - 58), None);
    }

    #[test]
    fn test_previous_prime() {
        assert_eq!(previous_prime(17), Some(13));
        assert_eq!(previous_prime(10), Some(7));
        assert_eq!(previous_prime(5), Some(3));
        assert_eq!(previous_prime(19), Some(17));
        assert_eq!(previous_prime(3), Some(2));
        assert_eq!(previous_prime(4), Some(3));
        assert_eq!(previous_prime(2), None);
        assert_eq!(previous_prime(1), None);
        assert_eq!(previous_prime(0), None);
    }

    #[test]
    fn test_next_twin_primes() {
        assert_eq!(next_twin_primes(10), Some((11, 13)));
        assert_eq!(next_twin_primes(14), Some((17, 19)));
        assert_eq!(next_twin_primes(100), Some((101, 103)));
        assert_eq!(next_twin_primes(1000), Some((1019, 1021)));
        assert_eq!(next_twin_primes(-5), Some((3, 5)));
        assert_eq!(next_twin_primes(12), Some((17, 19)));
        assert_eq!(next_twin_primes(11), Some((17, 19)));
    }

    #[test]
    fn test_mersenne_primes() {
        for n in [3u64, 7, 31, 127, 8191, 2_147_483_647] {
            assert!(is_mersenne_prime(n), "{} is a Mersenne prime", n);
        }
        for n in [2u64, 15, 20, 2047, 104_729, u64::MAX] {
            assert!(!is_mersenne_prime(n), "{} is not a Mersenne prime", n);
        }
    }

    #[test]
    fn test_prime_factors() {
        assert_eq!(prime_factors(60), vec![2, 2, 3, 5]);
        assert_eq!(prime_factors(84), vec![2, 2, 3, 7]);
        assert_eq!(prime_factors(210), vec![2, 3, 5, 7]);
        assert_eq!(prime_factors(17), vec![17]);
        assert_eq!(prime_factors(625), vec![5, 5, 5, 5]);
        assert_eq!(prime_factors(2 * 3 * 101), vec![2, 3, 101]);
        assert_eq!(prime_factors(1), Vec::<u64>::new());
        assert_eq!(prime_factors(0), Vec::<u64>::new());
        assert_eq!(prime_factors(-60), vec![2, 2, 3, 5]);
        assert_eq!(prime_factors(i64::MIN), vec![2; 63]);
    }
}
