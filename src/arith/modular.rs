//! Modular arithmetic over `u64` with `u128` intermediates.

use crate::arith::ArithError;

/// `(a * b) mod m` without overflow.
pub fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

/// Modular exponentiation: `base^exp mod modulus` by square-and-multiply.
///
/// A modulus of 1 always yields 0. A modulus of 0 is a caller error and panics
/// like the `%` operator would.
pub fn mod_pow(base: u64, exp: u64, modulus: u64) -> u64 {
    if modulus == 1 {
        return 0;
    }
    let mut result = 1u64;
    let mut base = base % modulus;
    let mut exp = exp;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, modulus);
        }
        base = mul_mod(base, base, modulus);
        exp >>= 1;
    }
    result
}

/// Greatest common divisor.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Modular inverse of `value` modulo `modulus` via the extended Euclidean
/// algorithm. The result is in `[0, modulus)`.
pub fn modular_inverse(value: u64, modulus: u64) -> Result<u64, ArithError> {
    if modulus == 0 {
        return Err(ArithError::InvalidModulus);
    }

    // Invariant: old_s * value = old_r (mod modulus)
    let (mut old_r, mut r) = (value as i128, modulus as i128);
    let (mut old_s, mut s) = (1i128, 0i128);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }

    if old_r != 1 && modulus != 1 {
        return Err(ArithError::NotInvertible {
            value,
            modulus,
            gcd: old_r as u64,
        });
    }
    Ok(old_s.rem_euclid(modulus as i128) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_pow() {
        assert_eq!(mod_pow(4, 13, 497), 445);
        assert_eq!(mod_pow(2, 10, 1_000), 24);
        assert_eq!(mod_pow(7, 0, 13), 1);
        assert_eq!(mod_pow(7, 5, 1), 0);
        assert_eq!(mod_pow(u64::MAX, 2, u64::MAX - 1), 1);
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(48, 18), 6);
        assert_eq!(gcd(17, 5), 1);
        assert_eq!(gcd(0, 9), 9);
        assert_eq!(gcd(9, 0), 9);
    }

    #[test]
    fn test_modular_inverse() {
        assert_eq!(modular_inverse(17, 3120), Ok(2753));
        assert_eq!(modular_inverse(3, 11), Ok(4));
        assert_eq!(modular_inverse(1, 7), Ok(1));
    }

    #[test]
    fn test_modular_inverse_not_coprime() {
        assert_eq!(
            modular_inverse(6, 9),
            Err(ArithError::NotInvertible {
                value: 6,
                modulus: 9,
                gcd: 3
            })
        );
        assert_eq!(modular_inverse(3, 0), Err(ArithError::InvalidModulus));
    }

    #[test]
    fn test_modular_inverse_large_modulus() {
        let modulus = u64::MAX - 58; // prime: 2^64 - 59
        let inv = modular_inverse(65537, modulus).unwrap();
        assert_eq!(mul_mod(inv, 65537, modulus), 1);
    }
}
