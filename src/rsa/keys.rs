//! Key pair generation.

use crate::arith::{gcd, modular_inverse, next_prime};
use crate::rsa::{CryptoError, KeyPair, PrivateKey, PublicKey};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const MIN_KEY_BITS: u32 = 8;
pub const MAX_KEY_BITS: u32 = 64;

/// Conventional public exponent, replaced only when it shares a factor with phi.
const DEFAULT_PUBLIC_EXPONENT: u64 = 65537;

/// Generate a key pair whose modulus has roughly `bits` bits.
///
/// Each prime gets `bits / 2` bits with the top and bottom bits forced before
/// moving to the next prime, so `n` has at least `bits - 1` bits for even sizes.
pub fn generate_keys(bits: u32, rng: &mut impl Rng) -> Result<KeyPair, CryptoError> {
    if !(MIN_KEY_BITS..=MAX_KEY_BITS).contains(&bits) {
        return Err(CryptoError::InvalidKeySize {
            bits,
            min: MIN_KEY_BITS,
            max: MAX_KEY_BITS,
        });
    }

    let half = bits / 2;
    loop {
        let p = random_prime(half, rng);
        let q = random_prime(half, rng);
        if p == q {
            continue;
        }
        // next_prime can push a 32-bit prime just past 2^32
        let Some(n) = p.checked_mul(q) else {
            continue;
        };

        let phi = (p - 1) * (q - 1);
        let e = choose_public_exponent(phi);
        let d = modular_inverse(e, phi)?;

        return Ok(KeyPair {
            public: PublicKey { n, e },
            private: PrivateKey { n, d },
        });
    }
}

/// Reproducible key generation from a seed.
pub fn generate_keys_seeded(bits: u32, seed: u64) -> Result<KeyPair, CryptoError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_keys(bits, &mut rng)
}

fn random_prime(bits: u32, rng: &mut impl Rng) -> u64 {
    let mask = if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 };
    loop {
        let candidate = (rng.random::<u64>() & mask) | (1u64 << (bits - 1)) | 1;
        if let Some(prime) = next_prime(candidate) {
            return prime;
        }
    }
}

fn choose_public_exponent(phi: u64) -> u64 {
    if gcd(DEFAULT_PUBLIC_EXPONENT, phi) == 1 {
        return DEFAULT_PUBLIC_EXPONENT;
    }
    let mut candidate = 3u64;
    while candidate < phi {
        if gcd(candidate, phi) == 1 {
            return candidate;
        }
        match next_prime(candidate) {
            Some(next) => candidate = next,
            None => break,
        }
    }
    DEFAULT_PUBLIC_EXPONENT
}
