//! Encryption and decryption primitives.

use crate::arith::mod_pow;
use crate::rsa::{CryptoError, PrivateKey, PublicKey};

/// `message^e mod n`. The message must satisfy `0 < message < n`.
pub fn encrypt(message: u64, key: &PublicKey) -> Result<u64, CryptoError> {
    if message == 0 || message >= key.n {
        return Err(CryptoError::MessageOutOfRange { message, n: key.n });
    }
    Ok(mod_pow(message, key.e, key.n))
}

/// `cipher^d mod n`.
pub fn decrypt(cipher: u64, key: &PrivateKey) -> Result<u64, CryptoError> {
    if key.n < 2 {
        return Err(CryptoError::InvalidModulus(key.n));
    }
    Ok(mod_pow(cipher, key.d, key.n))
}
