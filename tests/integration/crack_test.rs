use std::process::{Command, Output};
use std::time::{Duration, Instant};

fn primehunt(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_primehunt"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute primehunt")
}

fn field(stdout: &str, prefix: &str, name: &str) -> u64 {
    let line = stdout
        .lines()
        .find(|line| line.starts_with(prefix))
        .unwrap_or_else(|| panic!("no '{}' line in:\n{}", prefix, stdout));
    let start = line.find(&format!("{}=", name)).expect("field present") + name.len() + 1;
    line[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .expect("numeric field")
}

#[test]
fn test_crack_textbook_key() {
    let output = primehunt(&["crack", "--modulus", "3233", "--exponent", "17", "--deadline", "5"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Modulus: 3233 = 53 * 61"), "stdout: {}", stdout);
    assert_eq!(field(&stdout, "Recovered private key", "d"), 2753);
}

#[test]
fn test_keygen_then_crack_recovers_private_exponent() {
    let keygen = primehunt(&["keygen", "--bits", "20", "--seed", "4"]);
    assert!(keygen.status.success());
    let keys = String::from_utf8_lossy(&keygen.stdout);
    let n = field(&keys, "Public key", "n");
    let e = field(&keys, "Public key", "e");
    let d = field(&keys, "Private key", "d");

    let output = primehunt(&[
        "crack",
        "-n",
        &n.to_string(),
        "-e",
        &e.to_string(),
        "-j",
        "3",
        "--stats",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(field(&stdout, "Recovered private key", "d"), d);
    assert!(stdout.contains("Algorithm: stride-factor"), "stdout: {}", stdout);
}

#[test]
fn test_crack_negative_modulus_fails() {
    let output = primehunt(&["crack", "--modulus=-15", "--exponent", "3", "--deadline", "10"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid argument"), "stderr: {}", stderr);
}

#[test]
fn test_crack_zero_modulus_fails() {
    let output = primehunt(&["crack", "--modulus", "0", "--exponent", "3", "--deadline", "10"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid argument"));
}

#[test]
fn test_crack_prime_modulus_times_out() {
    let start = Instant::now();
    let output = primehunt(&[
        "crack",
        "--modulus",
        "281474976710677",
        "--exponent",
        "65537",
        "--deadline",
        "3",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no divisor"), "stderr: {}", stderr);
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_crack_inconsistent_key_fails() {
    let output = primehunt(&["crack", "--modulus", "45", "--exponent", "3"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("is invalid"), "stderr: {}", stderr);
}

#[test]
fn test_crack_oversized_worker_pool_fails() {
    for cores in ["100000", "18446744073709551615"] {
        let output = primehunt(&["crack", "-n", "3233", "-e", "17", "-j", cores]);
        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Error:"), "stderr: {}", stderr);
        assert!(stderr.contains("worker count must be at most"), "stderr: {}", stderr);
        assert!(!stderr.contains("panicked"), "stderr: {}", stderr);
    }
}
