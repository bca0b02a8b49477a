//! CLI entry point for bench-harness
//!
//! Loads a scripted benchmark unit, runs its lifecycle and prints the timing
//! report to stdout. Diagnostics go to stderr through `tracing`.

use anyhow::Context;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process;
use tracing::error;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use bench_harness::config::CliArgs;
use bench_harness::{run_benchmark, ConfigError, RunConfiguration};

/// Environment variable holding the log filter; `RUST_LOG` is the fallback
const LOG_VAR: &str = "BENCH_HARNESS_LOG";

/// Run a scripted benchmark and report its timings
#[derive(Parser)]
#[command(name = "bench-harness")]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of measured iterations; 1 or less runs a single shot
    #[arg(short, long, value_name = "N", allow_negative_numbers = true)]
    iterations: Option<String>,

    /// Number of unmeasured warmup iterations
    #[arg(short, long, value_name = "N", allow_negative_numbers = true)]
    warmup: Option<String>,

    /// Extra module search paths
    #[arg(
        short,
        long = "path",
        value_name = "PATHS",
        value_delimiter = ',',
        long_help = "Comma-separated list of directories searched for imported modules, \
                     after the benchmark's own directory. May be repeated. \
                     Overrides BENCH_HARNESS_PATH."
    )]
    paths: Vec<String>,

    /// Also write the results as JSON to this file
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Benchmark script to run
    #[arg(value_name = "BENCH_FILE")]
    bench_file: Option<PathBuf>,

    /// Arguments handed to the benchmark; everything after the file is passed through
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    bench_args: Vec<String>,
}

/// Convert CLI args to CliArgs struct for RunConfiguration
impl From<Args> for CliArgs {
    fn from(args: Args) -> Self {
        Self {
            iterations: args.iterations,
            warmup: args.warmup,
            paths: args.paths,
            bench_file: args.bench_file,
            bench_args: args.bench_args,
            json: args.json,
        }
    }
}

/// Handle configuration errors with user-friendly messages
fn handle_config_error(error: ConfigError) -> ! {
    let error_message = match &error {
        ConfigError::Env(_) | ConfigError::InvalidEnvValue { .. } => "Invalid environment setting",
        ConfigError::InvalidCliArgument { .. } => "Invalid CLI argument",
        ConfigError::InvalidCount { .. } => "Invalid count",
        ConfigError::MissingBenchFile => "Missing benchmark file",
    };

    eprintln!("{error_message}: {error}");
    process::exit(1);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();
}

fn run(config: &RunConfiguration) -> anyhow::Result<()> {
    run_benchmark(config, io::stdout().lock())
        .with_context(|| format!("benchmark {} failed", config.bench_file().display()))?;
    Ok(())
}

fn main() {
    init_tracing();

    let config = Args::parse()
        .pipe(CliArgs::from)
        .pipe(RunConfiguration::from_cli)
        .unwrap_or_else(|error| handle_config_error(error));

    if let Err(err) = run(&config) {
        error!(error = %err, "run aborted");
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

/// Helper trait for pipeline composition
trait Pipe<T> {
    fn pipe<U, F>(self, f: F) -> U
    where
        F: FnOnce(Self) -> U,
        Self: Sized;
}

impl<T> Pipe<T> for T {
    fn pipe<U, F>(self, f: F) -> U
    where
        F: FnOnce(Self) -> U,
    {
        f(self)
    }
}
