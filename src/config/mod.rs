//! Configuration module for bench-harness
//!
//! This module turns command-line arguments and environment variables into the
//! [`RunConfiguration`] consumed by the harness core.
//!
//! # Architecture
//!
//! - [`env_reader`] - Low-level environment access behind a trait, mockable in tests
//! - [`env_config`] - Typed, validated environment settings
//! - [`count`] - Coercion of iteration and warmup counts
//! - [`app_config`] - CLI integration and the final run configuration
//!
//! # Priority Logic
//!
//! 1. CLI parameters (highest priority)
//! 2. Environment variables (`BENCH_HARNESS_ITERATIONS`, `BENCH_HARNESS_WARMUP`,
//!    `BENCH_HARNESS_PATH`)
//! 3. Hardcoded defaults (1 iteration, no warmup, no extra search paths)
//!
//! Invalid values at any layer are errors; they never fall back to defaults.
//!
//! # Usage
//!
//! ```rust
//! use bench_harness::config::{CliArgs, RunConfiguration};
//! use std::path::PathBuf;
//!
//! let cli_args = CliArgs {
//!     iterations: Some("10".to_owned()),
//!     warmup: Some("2".to_owned()),
//!     bench_file: Some(PathBuf::from("bench/fib.rhai")),
//!     bench_args: vec!["25".to_owned()],
//!     ..CliArgs::default()
//! };
//!
//! let config = RunConfiguration::from_cli(cli_args)?;
//! assert_eq!(config.iterations(), 10);
//! assert_eq!(config.warmup(), 2);
//! # Ok::<(), bench_harness::config::ConfigError>(())
//! ```

pub mod app_config;
pub mod count;
pub mod env_config;
pub mod env_reader;

pub use app_config::{CliArgs, ConfigBuilder, RunConfiguration};
pub use count::{CountArg, CountError};
pub use env_config::{ConfigError, EnvConfig};
pub use env_reader::{EnvError, EnvReader, SystemEnvReader};

#[cfg(test)]
pub use env_reader::MockEnvReader;

#[cfg(test)]
mod integration_tests {
    use super::*;

    /// **What is tested:** Required trait implementations for ConfigError
    /// **Why it is tested:** ConfigError is wrapped by the crate error and compared in tests
    /// **Test conditions:** Creates a ConfigError and exercises Debug, Display, Error, Clone, PartialEq
    /// **Expectations:** All traits are available
    #[test]
    fn test_error_types_implement_required_traits() {
        let error = ConfigError::MissingBenchFile;
        let _debug = format!("{error:?}");
        let _display = format!("{error}");
        let _error_trait: &dyn std::error::Error = &error;
        assert_eq!(error.clone(), ConfigError::MissingBenchFile);
    }

    /// **What is tested:** Integration of the mock reader with the full CLI resolution
    /// **Why it is tested:** Validates that all configuration components work together
    /// **Test conditions:** Mock environment providing every value, CLI providing only the file
    /// **Expectations:** Every environment value reaches the final configuration
    #[test]
    fn test_integration_with_all_components() {
        let reader = MockEnvReader::new()
            .with_var(env_config::ITERATIONS_VAR, "4")
            .with_var(env_config::WARMUP_VAR, "1")
            .with_var(env_config::PATH_VAR, "/x,/y");

        let config = RunConfiguration::from_cli_with_reader(
            CliArgs {
                bench_file: Some("b.rhai".into()),
                ..CliArgs::default()
            },
            &reader,
        )
        .expect("config");

        assert_eq!(config.iterations(), 4);
        assert_eq!(config.warmup(), 1);
        assert_eq!(config.search_paths().len(), 2);
    }
}
