use clap::{Parser, Subcommand, ValueEnum};
use primehunt::registry::Registry;
use primehunt::rsa::{self, KeyPair};
use primehunt::search::{
    FactorConfig, FactorSearch, OracleKind, ParallelSearch, PrimeSearch, SearchConfig,
    SearchError, SearchStatistics, SequentialSearch, duration_from_secs,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "primehunt")]
#[command(about = "primehunt - deadline-bounded prime search and RSA key recovery")]
#[command(version)]
#[command(subcommand_required = true)]
#[command(arg_required_else_help = true)]
struct Args {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// CLI primality oracle selection
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliOracle {
    /// Deterministic Miller-Rabin
    MillerRabin,
    /// 6k +/- 1 trial division
    TrialDivision,
}

impl From<CliOracle> for OracleKind {
    fn from(cli: CliOracle) -> Self {
        match cli {
            CliOracle::MillerRabin => OracleKind::MillerRabin,
            CliOracle::TrialDivision => OracleKind::TrialDivision,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Find the largest prime a single thread can confirm before the deadline
    Sequential {
        /// Deadline in seconds
        #[arg(long, short)]
        deadline: f64,
        /// First candidate to test (default 3)
        #[arg(long)]
        start: Option<u64>,
        /// Primality oracle
        #[arg(long, value_enum, default_value = "miller-rabin")]
        oracle: CliOracle,
        /// Print search statistics
        #[arg(long)]
        stats: bool,
    },
    /// Find the largest prime a worker pool can confirm before the deadline
    Parallel {
        /// Deadline in seconds
        #[arg(long, short)]
        deadline: f64,
        /// Number of worker threads (default: one per CPU)
        #[arg(long, short = 'j')]
        cores: Option<usize>,
        /// Capacity of the candidate queue
        #[arg(long, default_value = "1000")]
        queue_capacity: usize,
        /// First candidate to generate (default scales with the deadline)
        #[arg(long)]
        start: Option<u64>,
        /// Primality oracle
        #[arg(long, value_enum, default_value = "miller-rabin")]
        oracle: CliOracle,
        /// Print search statistics
        #[arg(long)]
        stats: bool,
    },
    /// Recover the private exponent of a small RSA key by factoring its modulus
    Crack {
        /// RSA modulus n
        #[arg(long, short = 'n', allow_negative_numbers = true)]
        modulus: i128,
        /// Public exponent e
        #[arg(long, short = 'e', allow_negative_numbers = true)]
        exponent: i128,
        /// Deadline in seconds
        #[arg(long, short, default_value = "15")]
        deadline: f64,
        /// Number of factor workers
        #[arg(long, short = 'j')]
        cores: Option<usize>,
        /// Print search statistics
        #[arg(long)]
        stats: bool,
    },
    /// Generate an RSA key pair small enough to crack
    Keygen {
        /// Approximate size of the modulus in bits (8 to 64)
        #[arg(long, short, default_value = "32")]
        bits: u32,
        /// Seed for reproducible keys
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Invoke a registry method with JSON params
    Call {
        /// Method name (see `list`)
        method: String,
        /// Params as a JSON array or object
        params: Option<String>,
    },
    /// List registry methods
    List,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

// --- Logging ---

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

// --- Commands ---

fn print_statistics(stats: &SearchStatistics) {
    println!("\nSearch statistics:");
    print!("{}", stats.format_summary());
}

fn run_sequential(deadline: f64, start: Option<u64>, oracle: CliOracle, stats: bool) -> CliResult {
    let deadline = duration_from_secs(deadline)?;
    let config = SearchConfig::default()
        .with_start_base_option(start)
        .with_oracle(oracle.into());
    let mut search = SequentialSearch::new(config);
    let report = search.search(deadline)?;
    print!("{}", report);
    if stats {
        print_statistics(&report.statistics);
    }
    Ok(())
}

fn run_parallel(
    deadline: f64,
    cores: Option<usize>,
    queue_capacity: usize,
    start: Option<u64>,
    oracle: CliOracle,
    stats: bool,
) -> CliResult {
    let deadline = duration_from_secs(deadline)?;
    let config = SearchConfig::default()
        .with_workers_option(cores)
        .with_queue_capacity(queue_capacity)
        .with_start_base_option(start)
        .with_oracle(oracle.into());
    println!("Workers: {}", config.workers);
    let mut search = ParallelSearch::new(config);
    let report = search.search(deadline)?;
    print!("{}", report);
    if stats {
        print_statistics(&report.statistics);
    }
    Ok(())
}

fn run_crack(
    modulus: i128,
    exponent: i128,
    deadline: f64,
    cores: Option<usize>,
    stats: bool,
) -> CliResult {
    let n = u64::try_from(modulus).map_err(|_| {
        SearchError::invalid_argument(format!("n must be greater than 1 (got {})", modulus))
    })?;
    let e = u64::try_from(exponent).map_err(|_| {
        SearchError::invalid_argument(format!("exponent must be positive (got {})", exponent))
    })?;
    let deadline = duration_from_secs(deadline)?;

    let mut search = FactorSearch::new(FactorConfig::default().with_workers_option(cores));
    let report = match search.crack(n, e, deadline) {
        Ok(report) => report,
        Err(err) if err.is_retryable() => {
            return Err(format!("{} (try a longer --deadline)", err).into());
        }
        Err(err) => return Err(err.into()),
    };
    print!("{}", report);
    if stats {
        print_statistics(&report.statistics);
    }
    Ok(())
}

fn print_key_pair(pair: &KeyPair) {
    println!("Public key: (n={}, e={})", pair.public.n, pair.public.e);
    println!("Private key: (n={}, d={})", pair.private.n, pair.private.d);
}

fn run_keygen(bits: u32, seed: Option<u64>) -> CliResult {
    let pair = match seed {
        Some(seed) => rsa::generate_keys_seeded(bits, seed)?,
        None => rsa::generate_keys(bits, &mut ChaCha8Rng::from_os_rng())?,
    };
    print_key_pair(&pair);
    Ok(())
}

fn run_call(registry: &Registry, method: &str, params: Option<&str>) -> CliResult {
    let params: Option<Value> = params.map(serde_json::from_str::<Value>).transpose()?;
    let result = registry.call(method, params.as_ref())?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn run_list(registry: &Registry) -> CliResult {
    for method in registry.methods() {
        println!("{}({})", method.name, method.args.join(", "));
        println!("    {}", method.description);
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let registry = Registry::with_defaults();
    let result = match args.command {
        Commands::Sequential {
            deadline,
            start,
            oracle,
            stats,
        } => run_sequential(deadline, start, oracle, stats),
        Commands::Parallel {
            deadline,
            cores,
            queue_capacity,
            start,
            oracle,
            stats,
        } => run_parallel(deadline, cores, queue_capacity, start, oracle, stats),
        Commands::Crack {
            modulus,
            exponent,
            deadline,
            cores,
            stats,
        } => run_crack(modulus, exponent, deadline, cores, stats),
        Commands::Keygen { bits, seed } => run_keygen(bits, seed),
        Commands::Call { method, params } => run_call(&registry, &method, params.as_deref()),
        Commands::List => run_list(&registry),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
