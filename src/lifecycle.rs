//! Lifecycle driver
//!
//! Invokes the entry points of a loaded unit in fixed order:
//! `process_args` → `setup` → warmup calls → measured calls → `teardown`.
//! Every entry point is optional. Any failure aborts the run immediately and
//! nothing measured so far is reported.

use crate::config::RunConfiguration;
use crate::error::{Error, Result, ResultExt};
use crate::handle::{BenchmarkHandle, EntryPoint, Value};
use crate::report::Reporter;
use crate::timing::{Mode, RunResult, TimingLoop};
use std::io::Write;
use tracing::{debug, info, warn};

/// Drives one benchmark run
#[derive(Debug, Clone)]
pub struct LifecycleDriver {
    timing: TimingLoop,
    raw_args: Vec<String>,
}

impl LifecycleDriver {
    pub fn new(timing: TimingLoop, raw_args: Vec<String>) -> Self {
        Self { timing, raw_args }
    }

    /// Driver for the counts and arguments of a run configuration
    pub fn from_config(config: &RunConfiguration) -> Self {
        Self::new(
            TimingLoop::new(Mode::from_iterations(config.iterations()), config.warmup()),
            config.bench_args().to_vec(),
        )
    }

    /// Run the lifecycle, writing progress through `reporter`
    ///
    /// When the unit has no `benchmark` entry point the run still completes
    /// through teardown, with an empty duration list.
    pub fn run<W: Write>(
        &self,
        handle: &mut BenchmarkHandle,
        reporter: &mut Reporter<W>,
    ) -> Result<RunResult> {
        let name = handle.name().to_owned();
        let mode = self.timing.mode();
        let warmup = self.timing.warmup();

        info!(unit = %name, ?mode, warmup, "starting benchmark run");
        reporter.banner(&name, mode, warmup)?;

        let args = self.process_args(handle)?;
        reporter.args(&args)?;

        reporter.setup()?;
        Self::invoke(handle, EntryPoint::Setup, &args)?;
        reporter.start()?;

        let capabilities = handle.capabilities_mut();
        let durations = match capabilities.get_mut(EntryPoint::Benchmark) {
            Some(benchmark) => {
                if warmup > 0 {
                    reporter.warmup(warmup)?;
                    self.timing.warm_up(|| benchmark(&args))?;
                }
                self.timing.measure(
                    || benchmark(&args),
                    |iteration, duration| reporter.sample(&name, mode, iteration, duration),
                )?
            }
            None => {
                warn!(unit = %name, "unit defines no benchmark entry point, nothing is measured");
                Vec::new()
            }
        };

        reporter.teardown()?;
        Self::invoke(handle, EntryPoint::Teardown, &[])?;
        reporter.complete()?;

        info!(unit = %name, measured = durations.len(), "benchmark run complete");
        Ok(RunResult {
            name,
            mode,
            warmup,
            args,
            durations,
        })
    }

    /// Processed argument list: the unit's `process_args` result, or the
    /// default integer conversion
    fn process_args(&self, handle: &mut BenchmarkHandle) -> Result<Vec<Value>> {
        let raw: Vec<Value> = self.raw_args.iter().cloned().map(Value::from).collect();

        match handle.capabilities_mut().call(EntryPoint::ProcessArgs, &raw) {
            None => default_process_args(&self.raw_args),
            Some(result) => {
                let processed = result?;
                if processed.is_unit() {
                    debug!("process_args returned nothing, using default processing");
                    default_process_args(&self.raw_args)
                } else if processed.is_array() {
                    processed.into_array().map_err(|type_name| {
                        Error::entry_point_error(
                            EntryPoint::ProcessArgs,
                            format!("unexpected return type {type_name}"),
                        )
                    })
                } else {
                    Ok(vec![processed])
                }
            }
        }
    }

    /// Call an entry point if present; absence is not an error
    fn invoke(handle: &mut BenchmarkHandle, entry_point: EntryPoint, args: &[Value]) -> Result<()> {
        match handle.capabilities_mut().call(entry_point, args) {
            Some(result) => result.map(drop),
            None => {
                debug!(%entry_point, "entry point not defined, skipping");
                Ok(())
            }
        }
    }
}

/// Interpret every raw argument as a base-10 integer
pub fn default_process_args(raw: &[String]) -> Result<Vec<Value>> {
    raw.iter()
        .enumerate()
        .map(|(index, arg)| {
            arg.trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|e| Error::Argument {
                    index,
                    value: arg.clone(),
                    message: e.to_string(),
                })
        })
        .collect::<Result<Vec<_>>>()
        .inspect_error(|e| warn!(error = %e, "default argument processing failed"))
}
