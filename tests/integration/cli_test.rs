use std::process::{Command, Output};
use std::time::{Duration, Instant};

fn primehunt(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_primehunt"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute primehunt")
}

fn stdout_of(output: &Output) -> String {
    if !output.status.success() {
        panic!(
            "Command failed with status: {:?}\nstderr: {}\nstdout: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr),
            String::from_utf8_lossy(&output.stdout)
        );
    }
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Value printed after "Largest prime found: ".
fn largest_prime(stdout: &str) -> u64 {
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("Largest prime found: "))
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or_else(|| panic!("no result line in output:\n{}", stdout))
}

#[test]
fn test_sequential_zero_deadline_reports_two() {
    let stdout = stdout_of(&primehunt(&["sequential", "--deadline", "0"]));
    assert_eq!(largest_prime(&stdout), 2);
}

#[test]
fn test_sequential_respects_deadline() {
    let start = Instant::now();
    let stdout = stdout_of(&primehunt(&["sequential", "--deadline", "0.5", "--stats"]));
    let elapsed = start.elapsed();

    assert!(largest_prime(&stdout) > 2);
    assert!(stdout.contains("Search statistics:"), "Should print statistics");
    assert!(stdout.contains("Candidates evaluated:"));
    // Process startup included
    assert!(elapsed < Duration::from_secs(2), "took {:?}", elapsed);
}

#[test]
fn test_parallel_search() {
    let stdout = stdout_of(&primehunt(&[
        "parallel",
        "--deadline",
        "0.5",
        "-j",
        "2",
        "--oracle",
        "trial-division",
    ]));
    assert!(stdout.contains("Workers: 2"));
    let best = largest_prime(&stdout);
    assert!(best > 2);
    assert!((2..best).take_while(|d| d * d <= best).all(|d| best % d != 0));
}

#[test]
fn test_parallel_rejects_zero_workers() {
    let output = primehunt(&["parallel", "--deadline", "1", "-j", "0"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "stderr: {}", stderr);
}

#[test]
fn test_parallel_rejects_oversized_pools() {
    for args in [
        ["parallel", "--deadline", "1", "-j", "100000"],
        ["parallel", "--deadline", "1", "--queue-capacity", "18446744073709551615"],
    ] {
        let output = primehunt(&args);
        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("invalid argument"), "stderr: {}", stderr);
        assert!(!stderr.contains("panicked"), "stderr: {}", stderr);
    }
}

#[test]
fn test_negative_deadline_is_rejected() {
    let output = primehunt(&["sequential", "--deadline=-1"]);
    assert!(!output.status.success());
}

#[test]
fn test_keygen_is_reproducible_with_seed() {
    let first = stdout_of(&primehunt(&["keygen", "--bits", "24", "--seed", "9"]));
    let second = stdout_of(&primehunt(&["keygen", "--bits", "24", "--seed", "9"]));
    assert_eq!(first, second);
    assert!(first.contains("Public key: (n="));
    assert!(first.contains("Private key: (n="));
}

#[test]
fn test_keygen_rejects_bad_size() {
    let output = primehunt(&["keygen", "--bits", "128"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("key size"), "stderr: {}", stderr);
}

#[test]
fn test_call_method() {
    let stdout = stdout_of(&primehunt(&["call", "next_prime", "[100]"]));
    assert_eq!(stdout.trim(), "101");

    let stdout = stdout_of(&primehunt(&["call", "prime_factors", r#"{"n": 360}"#]));
    let factors: Vec<u64> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(factors, vec![2, 2, 2, 3, 3, 5]);

    let stdout = stdout_of(&primehunt(&["call", "list_functions"]));
    assert!(stdout.contains("crack_key"));
}

#[test]
fn test_call_errors() {
    let output = primehunt(&["call", "no_such_method", "[]"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Method not found"));

    let output = primehunt(&["call", "is_prime", "[not json"]);
    assert!(!output.status.success());
}

#[test]
fn test_list_shows_methods() {
    let stdout = stdout_of(&primehunt(&["list"]));
    for name in [
        "is_prime(n)",
        "find_max_prime_sequential(timeout, start_base)",
        "find_max_prime_parallel(timeout, n_workers)",
        "crack_key(n, e, timeout)",
        "generate_keys(bits, seed)",
        "list_functions()",
    ] {
        assert!(stdout.contains(name), "missing {} in:\n{}", name, stdout);
    }
}

#[test]
fn test_logs_go_to_stderr() {
    let output = primehunt(&["-v", "sequential", "--deadline", "0.1"]);
    let stdout = stdout_of(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stdout.contains("starting"), "stdout: {}", stdout);
    assert!(!stderr.is_empty(), "verbose run should log");
}
