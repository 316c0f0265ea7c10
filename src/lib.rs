//! Deadline-bounded prime search and small-modulus RSA key recovery.
//!
//! - [`search`]: sequential and parallel prime searches plus the stride
//!   partitioned factor search behind [`search::crack_modulus`]
//! - [`arith`]: primality oracles, modular arithmetic and prime sequences
//! - [`rsa`]: textbook RSA over `u64`
//! - [`registry`]: JSON-RPC method table over all of the above

pub mod arith;
pub mod registry;
pub mod rsa;
pub mod search;
