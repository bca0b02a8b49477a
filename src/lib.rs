//! bench-harness library
//!
//! A command-line benchmark harness for scripted benchmark units. A unit is a
//! Rhai script defining any of the entry points `process_args`, `setup`,
//! `benchmark` and `teardown`. The harness loads the unit, drives its
//! lifecycle, times the `benchmark` calls and reports the results.
//!
//! # Examples
//!
//! ```rust
//! use bench_harness::{run_benchmark, RunConfiguration};
//! use std::fs;
//!
//! let dir = tempfile::tempdir()?;
//! let file = dir.path().join("sum.rhai");
//! fs::write(&file, "fn benchmark(n) { let s = 0; for i in 0..n { s += i; } s }")?;
//!
//! let config = RunConfiguration::builder(&file)
//!     .with_iterations(3)
//!     .with_bench_args(["100"])
//!     .build()?;
//!
//! let mut output = Vec::new();
//! let result = run_benchmark(&config, &mut output)?;
//! assert_eq!(result.durations.len(), 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod handle;
pub mod lifecycle;
pub mod native;
pub mod package_finder;
pub mod report;
pub mod resolver;
pub mod search_path;
pub mod timing;

pub use config::{CliArgs, ConfigError, EnvConfig, EnvReader, RunConfiguration, SystemEnvReader};
pub use error::{Error, Result};
pub use handle::{BenchmarkHandle, Capabilities, EntryPoint, Value};
pub use lifecycle::LifecycleDriver;
pub use report::{JsonReport, Reporter};
pub use resolver::Resolver;
pub use timing::{Mode, RunResult, Summary};

use std::io::Write;
use tracing::info;

/// Load, run and report one benchmark as configured
///
/// Writes the full text report to `out` and, when configured, the JSON results
/// file. Fails with [`Error::EmptyResult`] after the lifecycle completed if the
/// unit measured nothing.
pub fn run_benchmark<W: Write>(config: &RunConfiguration, out: W) -> Result<RunResult> {
    let mut reporter = Reporter::new(out);
    reporter.search_paths(config.search_paths())?;

    let mut handle = Resolver::new(config.search_paths().iter().cloned()).resolve(config.bench_file())?;
    let result = LifecycleDriver::from_config(config).run(&mut handle, &mut reporter)?;
    let summary = reporter.summary(&result)?;

    if let Some(path) = config.json_output() {
        JsonReport::new(&result, summary).write_to(path)?;
        info!(file = %path.display(), "wrote JSON results");
    }

    Ok(result)
}
