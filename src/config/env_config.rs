//! Environment configuration module
//!
//! This module reads the harness settings that may be supplied through the
//! environment and validates them.

use super::count::{CountArg, CountError};
use super::env_reader::{EnvError, EnvReader, SystemEnvReader};
use std::path::PathBuf;
use thiserror::Error;

/// Variable holding the default measured iteration count
pub const ITERATIONS_VAR: &str = "BENCH_HARNESS_ITERATIONS";
/// Variable holding the default warmup count
pub const WARMUP_VAR: &str = "BENCH_HARNESS_WARMUP";
/// Variable holding comma-separated extra module search paths
pub const PATH_VAR: &str = "BENCH_HARNESS_PATH";

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Environment could not be read
    #[error("failed to read environment: {0}")]
    Env(#[from] EnvError),
    /// Invalid environment value
    #[error("Invalid environment value: {key}='{value}' (expected: {expected})")]
    InvalidEnvValue {
        key: String,
        value: String,
        expected: String,
    },
    /// Invalid CLI argument value
    #[error("Invalid CLI argument: {argument}='{value}' (expected: {expected})")]
    InvalidCliArgument {
        argument: String,
        value: String,
        expected: String,
    },
    /// Count that cannot be coerced to an integer
    #[error("Invalid {what}: {source}")]
    InvalidCount {
        what: &'static str,
        #[source]
        source: CountError,
    },
    /// No benchmark file was given
    #[error("no benchmark file specified")]
    MissingBenchFile,
}

/// Environment configuration operations
pub struct EnvConfig;

impl EnvConfig {
    /// Get the iteration count from the environment
    pub fn get_iterations() -> Result<Option<i64>, ConfigError> {
        Self::get_iterations_with_reader(&SystemEnvReader)
    }

    /// Get the iteration count with custom reader (for testing)
    pub fn get_iterations_with_reader<R: EnvReader>(reader: &R) -> Result<Option<i64>, ConfigError> {
        Self::get_count(reader, ITERATIONS_VAR)
    }

    /// Get the warmup count from the environment
    pub fn get_warmup() -> Result<Option<i64>, ConfigError> {
        Self::get_warmup_with_reader(&SystemEnvReader)
    }

    /// Get the warmup count with custom reader (for testing)
    pub fn get_warmup_with_reader<R: EnvReader>(reader: &R) -> Result<Option<i64>, ConfigError> {
        Self::get_count(reader, WARMUP_VAR)
    }

    /// Get extra module search paths from the environment
    pub fn get_search_paths() -> Result<Option<Vec<PathBuf>>, ConfigError> {
        Self::get_search_paths_with_reader(&SystemEnvReader)
    }

    /// Get extra module search paths with custom reader (for testing)
    pub fn get_search_paths_with_reader<R: EnvReader>(
        reader: &R,
    ) -> Result<Option<Vec<PathBuf>>, ConfigError> {
        Ok(reader
            .get_var(PATH_VAR)?
            .map(|value| split_paths(&value))
            .filter(|paths| !paths.is_empty()))
    }

    fn get_count<R: EnvReader>(reader: &R, key: &str) -> Result<Option<i64>, ConfigError> {
        reader
            .get_var(key)?
            .map(|value| {
                CountArg::from(value.as_str())
                    .as_int()
                    .map_err(|_| ConfigError::InvalidEnvValue {
                        key: key.to_owned(),
                        value,
                        expected: "integer".to_owned(),
                    })
            })
            .transpose()
    }
}

/// Split a comma-separated path list, dropping blank entries
pub fn split_paths(value: &str) -> Vec<PathBuf> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}
