//! The callable methods and their handlers.

use crate::arith;
use crate::registry::params::Params;
use crate::registry::{MethodInfo, Registry, RpcError};
use crate::rsa::{self, PrivateKey, PublicKey};
use crate::search::{
    FactorSearch, ParallelSearch, PrimeSearch, SearchConfig, SearchError, SequentialSearch,
    duration_from_secs,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::{Value, json};

const DEFAULT_CRACK_TIMEOUT_SECS: f64 = 15.0;

pub(super) fn default_methods() -> Vec<MethodInfo> {
    vec![
        MethodInfo {
            name: "is_prime",
            args: &["n"],
            description: "True if n is prime. Negative numbers are never prime.",
            handler: is_prime,
        },
        MethodInfo {
            name: "find_max_prime_sequential",
            args: &["timeout", "start_base"],
            description: "Largest prime found by a single thread within timeout seconds, \
                          testing odd candidates from start_base (default 3).",
            handler: find_max_prime_sequential,
        },
        MethodInfo {
            name: "find_max_prime_parallel",
            args: &["timeout", "n_workers"],
            description: "Largest prime found within timeout seconds by n_workers threads \
                          fed from a shared candidate queue (default: one per CPU).",
            handler: find_max_prime_parallel,
        },
        MethodInfo {
            name: "find_next_twin_primes",
            args: &["n"],
            description: "First twin prime pair [k, k + 2] with k > n.",
            handler: find_next_twin_primes,
        },
        MethodInfo {
            name: "is_mersenne_prime",
            args: &["n"],
            description: "True if n = 2^p - 1 with both p and n prime.",
            handler: is_mersenne_prime,
        },
        MethodInfo {
            name: "prime_factors",
            args: &["n"],
            description: "Prime factors of |n| in ascending order, with multiplicity.",
            handler: prime_factors,
        },
        MethodInfo {
            name: "next_prime",
            args: &["n"],
            description: "Smallest prime strictly greater than n.",
            handler: next_prime,
        },
        MethodInfo {
            name: "previous_prime",
            args: &["n"],
            description: "Largest prime strictly less than n, or null when n <= 2.",
            handler: previous_prime,
        },
        MethodInfo {
            name: "generate_keys",
            args: &["bits", "seed"],
            description: "RSA key pair [[n, e], [n, d]] with a modulus of about bits bits \
                          (8 to 64). A seed makes the result reproducible.",
            handler: generate_keys,
        },
        MethodInfo {
            name: "encrypt",
            args: &["message", "public_key"],
            description: "message^e mod n for public_key [n, e]; requires 0 < message < n.",
            handler: encrypt,
        },
        MethodInfo {
            name: "decrypt",
            args: &["cipher", "private_key"],
            description: "cipher^d mod n for private_key [n, d].",
            handler: decrypt,
        },
        MethodInfo {
            name: "crack_key",
            args: &["n", "e", "timeout"],
            description: "Factor n by parallel trial division and return the private key \
                          [n, d]. Fails with a timeout after timeout seconds (default 15).",
            handler: crack_key,
        },
        MethodInfo {
            name: "list_functions",
            args: &[],
            description: "Name, arguments and description of every method.",
            handler: list_functions,
        },
    ]
}

fn is_prime(_: &Registry, params: &Params) -> Result<Value, RpcError> {
    let n = params.integer(0)?;
    Ok(json!(u64::try_from(n).is_ok_and(arith::is_prime)))
}

fn find_max_prime_sequential(_: &Registry, params: &Params) -> Result<Value, RpcError> {
    let deadline = duration_from_secs(params.seconds(0)?)?;
    let config = SearchConfig::default().with_start_base_option(params.optional_unsigned(1)?);
    let report = SequentialSearch::new(config).search(deadline)?;
    Ok(json!(report.best))
}

fn find_max_prime_parallel(_: &Registry, params: &Params) -> Result<Value, RpcError> {
    let deadline = duration_from_secs(params.seconds(0)?)?;
    let workers = params
        .optional_unsigned(1)?
        .map(|workers| {
            usize::try_from(workers).map_err(|_| {
                RpcError::InvalidParams(format!("n_workers {} is out of range", workers))
            })
        })
        .transpose()?;
    let config = SearchConfig::default().with_workers_option(workers);
    let report = ParallelSearch::new(config).search(deadline)?;
    Ok(json!(report.best))
}

fn find_next_twin_primes(_: &Registry, params: &Params) -> Result<Value, RpcError> {
    let n = signed(params, 0)?;
    Ok(match arith::next_twin_primes(n) {
        Some((low, high)) => json!([low, high]),
        None => Value::Null,
    })
}

fn is_mersenne_prime(_: &Registry, params: &Params) -> Result<Value, RpcError> {
    let n = params.integer(0)?;
    Ok(json!(u64::try_from(n).is_ok_and(arith::is_mersenne_prime)))
}

fn prime_factors(_: &Registry, params: &Params) -> Result<Value, RpcError> {
    let n = signed(params, 0)?;
    Ok(json!(arith::prime_factors(n)))
}

fn next_prime(_: &Registry, params: &Params) -> Result<Value, RpcError> {
    let n = params.integer(0)?;
    // Every negative number is below 2
    let n = u64::try_from(n.max(0)).unwrap_or(u64::MAX);
    Ok(json!(arith::next_prime(n)))
}

fn previous_prime(_: &Registry, params: &Params) -> Result<Value, RpcError> {
    let n = params.integer(0)?;
    Ok(match u64::try_from(n) {
        Ok(n) => json!(arith::previous_prime(n)),
        Err(_) => Value::Null,
    })
}

fn generate_keys(_: &Registry, params: &Params) -> Result<Value, RpcError> {
    let bits = params.unsigned(0)?;
    let bits = u32::try_from(bits)
        .map_err(|_| RpcError::InvalidParams(format!("bits {} is out of range", bits)))?;
    let pair = match params.optional_unsigned(1)? {
        Some(seed) => rsa::generate_keys_seeded(bits, seed)?,
        None => rsa::generate_keys(bits, &mut ChaCha8Rng::from_os_rng())?,
    };
    Ok(json!([
        [pair.public.n, pair.public.e],
        [pair.private.n, pair.private.d]
    ]))
}

fn encrypt(_: &Registry, params: &Params) -> Result<Value, RpcError> {
    let message = params.unsigned(0)?;
    let (n, e) = params.key_pair(1, "e")?;
    Ok(json!(rsa::encrypt(message, &PublicKey { n, e })?))
}

fn decrypt(_: &Registry, params: &Params) -> Result<Value, RpcError> {
    let cipher = params.unsigned(0)?;
    let (n, d) = params.key_pair(1, "d")?;
    Ok(json!(rsa::decrypt(cipher, &PrivateKey { n, d })?))
}

fn crack_key(_: &Registry, params: &Params) -> Result<Value, RpcError> {
    let n = params.integer(0)?;
    let e = params.integer(1)?;
    let n = u64::try_from(n).map_err(|_| {
        SearchError::invalid_argument(format!("n must be greater than 1 (got {})", n))
    })?;
    let e = u64::try_from(e).map_err(|_| {
        SearchError::invalid_argument(format!("exponent must be positive (got {})", e))
    })?;
    let timeout = params
        .optional_seconds(2)?
        .unwrap_or(DEFAULT_CRACK_TIMEOUT_SECS);
    let report = FactorSearch::default().crack(n, e, duration_from_secs(timeout)?)?;
    Ok(json!([report.n, report.private_exponent]))
}

fn list_functions(registry: &Registry, _: &Params) -> Result<Value, RpcError> {
    let entries: Vec<Value> = registry
        .methods()
        .map(|method| {
            json!({
                "name": method.name,
                "args": method.args,
                "description": method.description,
            })
        })
        .collect();
    Ok(Value::Array(entries))
}

fn signed(params: &Params, index: usize) -> Result<i64, RpcError> {
    let n = params.integer(index)?;
    i64::try_from(n).map_err(|_| RpcError::InvalidParams(format!("{} is out of range", n)))
}
