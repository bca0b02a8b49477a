//! Run configuration module
//!
//! This module provides the run configuration consumed by the harness core and
//! the logic combining CLI arguments with environment values.

use super::count::CountArg;
use super::env_reader::{EnvReader, SystemEnvReader};
use super::{ConfigError, EnvConfig};
use std::path::{Path, PathBuf};

/// CLI arguments structure
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliArgs {
    /// Measured iteration count as given on the command line
    pub iterations: Option<String>,
    /// Warmup count as given on the command line
    pub warmup: Option<String>,
    /// Extra module search paths (already split on commas)
    pub paths: Vec<String>,
    /// Benchmark file
    pub bench_file: Option<PathBuf>,
    /// Raw benchmark arguments
    pub bench_args: Vec<String>,
    /// Optional machine-readable results file
    pub json: Option<PathBuf>,
}

/// Configuration of a single benchmark run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfiguration {
    iterations: i64,
    warmup: usize,
    search_paths: Vec<PathBuf>,
    bench_file: PathBuf,
    bench_args: Vec<String>,
    json_output: Option<PathBuf>,
}

/// Configuration builder for functional composition
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    bench_file: PathBuf,
    iterations: Option<CountArg>,
    warmup: Option<CountArg>,
    search_paths: Vec<PathBuf>,
    bench_args: Vec<String>,
    json_output: Option<PathBuf>,
}

impl ConfigBuilder {
    /// Create a new configuration builder for a benchmark file
    #[must_use]
    pub fn new(bench_file: impl Into<PathBuf>) -> Self {
        Self {
            bench_file: bench_file.into(),
            iterations: None,
            warmup: None,
            search_paths: Vec::new(),
            bench_args: Vec::new(),
            json_output: None,
        }
    }

    /// Set the measured iteration count; scalars and one-element sequences are accepted
    #[must_use]
    pub fn with_iterations(mut self, iterations: impl Into<CountArg>) -> Self {
        self.iterations = Some(iterations.into());
        self
    }

    /// Set the warmup count; scalars and one-element sequences are accepted
    #[must_use]
    pub fn with_warmup(mut self, warmup: impl Into<CountArg>) -> Self {
        self.warmup = Some(warmup.into());
        self
    }

    /// Set extra module search paths
    #[must_use]
    pub fn with_search_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Set raw benchmark arguments
    #[must_use]
    pub fn with_bench_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bench_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the machine-readable results file
    #[must_use]
    pub fn with_json_output(mut self, path: Option<PathBuf>) -> Self {
        self.json_output = path;
        self
    }

    /// Build the final RunConfiguration, coercing the counts
    pub fn build(self) -> Result<RunConfiguration, ConfigError> {
        let iterations = self
            .iterations
            .map(|count| count.as_int())
            .transpose()
            .map_err(|source| ConfigError::InvalidCount {
                what: "iteration count",
                source,
            })?
            .unwrap_or(1);

        let warmup = self
            .warmup
            .map(|count| count.as_int())
            .transpose()
            .map_err(|source| ConfigError::InvalidCount {
                what: "warmup count",
                source,
            })?
            .unwrap_or(0);

        Ok(RunConfiguration {
            iterations,
            // A negative warmup runs no warmup calls
            warmup: usize::try_from(warmup).unwrap_or(0),
            search_paths: self.search_paths,
            bench_file: self.bench_file,
            bench_args: self.bench_args,
            json_output: self.json_output,
        })
    }
}

impl RunConfiguration {
    /// Start building a configuration for a benchmark file
    pub fn builder(bench_file: impl Into<PathBuf>) -> ConfigBuilder {
        ConfigBuilder::new(bench_file)
    }

    /// Create RunConfiguration from CLI arguments
    ///
    /// Priority order:
    /// 1. CLI parameters (highest priority)
    /// 2. Environment variables
    /// 3. Hardcoded defaults
    pub fn from_cli(cli_args: CliArgs) -> Result<Self, ConfigError> {
        Self::from_cli_with_reader(cli_args, &SystemEnvReader)
    }

    /// Create RunConfiguration from CLI arguments with a custom environment reader
    pub fn from_cli_with_reader<R: EnvReader>(
        cli_args: CliArgs,
        reader: &R,
    ) -> Result<Self, ConfigError> {
        let bench_file = cli_args
            .bench_file
            .clone()
            .ok_or(ConfigError::MissingBenchFile)?;

        let builder = ConfigBuilder::new(bench_file)
            .with_search_paths(Self::resolve_search_paths(&cli_args, reader)?)
            .with_bench_args(cli_args.bench_args.clone())
            .with_json_output(cli_args.json.clone());

        let builder = match Self::resolve_count(
            cli_args.iterations.as_deref(),
            "--iterations",
            || EnvConfig::get_iterations_with_reader(reader),
        )? {
            Some(count) => builder.with_iterations(count),
            None => builder,
        };

        let builder = match Self::resolve_count(cli_args.warmup.as_deref(), "--warmup", || {
            EnvConfig::get_warmup_with_reader(reader)
        })? {
            Some(count) => builder.with_warmup(count),
            None => builder,
        };

        builder.build()
    }

    /// Resolve a count: CLI text first, then the environment
    fn resolve_count<F>(
        cli_value: Option<&str>,
        argument: &str,
        from_env: F,
    ) -> Result<Option<i64>, ConfigError>
    where
        F: FnOnce() -> Result<Option<i64>, ConfigError>,
    {
        cli_value
            .map(|value| {
                CountArg::from(value)
                    .as_int()
                    .map(Some)
                    .map_err(|_| ConfigError::InvalidCliArgument {
                        argument: argument.to_owned(),
                        value: value.to_owned(),
                        expected: "integer".to_owned(),
                    })
            })
            .unwrap_or_else(from_env)
    }

    /// Resolve search paths: CLI list first, then the environment
    fn resolve_search_paths<R: EnvReader>(
        cli_args: &CliArgs,
        reader: &R,
    ) -> Result<Vec<PathBuf>, ConfigError> {
        let cli_paths: Vec<PathBuf> = cli_args
            .paths
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .collect();

        if !cli_paths.is_empty() {
            return Ok(cli_paths);
        }

        Ok(EnvConfig::get_search_paths_with_reader(reader)?.unwrap_or_default())
    }

    /// Measured iteration count after coercion (≤ 1 selects single-shot mode)
    pub fn iterations(&self) -> i64 {
        self.iterations
    }

    /// Warmup call count
    pub fn warmup(&self) -> usize {
        self.warmup
    }

    /// Extra module search paths, in order
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Benchmark file path
    pub fn bench_file(&self) -> &Path {
        &self.bench_file
    }

    /// Raw benchmark argument strings
    pub fn bench_args(&self) -> &[String] {
        &self.bench_args
    }

    /// Machine-readable results file, if requested
    pub fn json_output(&self) -> Option<&Path> {
        self.json_output.as_deref()
    }
}
