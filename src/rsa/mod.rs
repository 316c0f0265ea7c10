//! Textbook RSA over `u64` moduli.
//!
//! Keys are deliberately small so that the stride-partitioned factor search
//! can recover them; nothing here is meant to be secure.

pub mod cipher;
pub mod keys;

pub use cipher::{decrypt, encrypt};
pub use keys::{MAX_KEY_BITS, MIN_KEY_BITS, generate_keys, generate_keys_seeded};

use crate::arith::ArithError;
use thiserror::Error;

/// Public half of a key pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    pub n: u64,
    pub e: u64,
}

/// Private half of a key pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrivateKey {
    pub n: u64,
    pub d: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

/// Errors from key generation and the RSA primitives.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("key size must be between {min} and {max} bits (got {bits})")]
    InvalidKeySize { bits: u32, min: u32, max: u32 },

    #[error("message must satisfy 0 < m < n (got m={message}, n={n})")]
    MessageOutOfRange { message: u64, n: u64 },

    #[error("modulus must be at least 2 (got {0})")]
    InvalidModulus(u64),

    #[error(transparent)]
    Arith(#[from] ArithError),
}
