//! Timing loop
//!
//! Runs the benchmark entry point a number of unmeasured warmup times, then a
//! number of measured times, recording the wall-clock duration of each
//! measured call with a monotonic clock.

use crate::error::{Error, Result};
use crate::handle::Value;
use serde::Serialize;
use std::time::Instant;
use tracing::trace;

/// How many measured iterations run and how they are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Mode {
    /// Exactly one measured call, reported without an iteration index
    SingleShot,
    /// Several measured calls, each reported with its index
    Repeated { iterations: usize },
}

impl Mode {
    /// Mode for an already coerced iteration count; anything ≤ 1 is single-shot
    pub fn from_iterations(iterations: i64) -> Self {
        match usize::try_from(iterations) {
            Ok(n) if n > 1 => Mode::Repeated { iterations: n },
            _ => Mode::SingleShot,
        }
    }

    /// Number of measured calls
    pub fn iterations(self) -> usize {
        match self {
            Mode::SingleShot => 1,
            Mode::Repeated { iterations } => iterations,
        }
    }

    pub fn is_single_shot(self) -> bool {
        matches!(self, Mode::SingleShot)
    }
}

/// Warmup and measured iteration plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingLoop {
    mode: Mode,
    warmup: usize,
}

impl TimingLoop {
    pub fn new(mode: Mode, warmup: usize) -> Self {
        Self { mode, warmup }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn warmup(&self) -> usize {
        self.warmup
    }

    /// Run the warmup calls; results are discarded
    pub fn warm_up<F>(&self, mut call: F) -> Result<()>
    where
        F: FnMut() -> Result<Value>,
    {
        for round in 0..self.warmup {
            trace!(round, "warmup call");
            call()?;
        }
        Ok(())
    }

    /// Run the measured calls, handing each duration (seconds) to `on_sample`
    /// as soon as it is taken
    ///
    /// The first failing call aborts the loop; samples taken so far are dropped.
    pub fn measure<F, S>(&self, mut call: F, mut on_sample: S) -> Result<Vec<f64>>
    where
        F: FnMut() -> Result<Value>,
        S: FnMut(usize, f64) -> Result<()>,
    {
        let iterations = self.mode.iterations();
        let mut durations = Vec::with_capacity(iterations.min(1024));

        for iteration in 0..iterations {
            let start = Instant::now();
            call()?;
            let duration = start.elapsed().as_secs_f64();

            trace!(iteration, duration, "measured call");
            on_sample(iteration, duration)?;
            durations.push(duration);
        }

        Ok(durations)
    }
}

/// Min, max and mean of the measured durations
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub count: usize,
}

impl Summary {
    /// Summarize a duration sequence; empty sequences are an error
    pub fn from_durations(durations: &[f64]) -> Result<Self> {
        if durations.is_empty() {
            return Err(Error::EmptyResult);
        }

        let (min, max, sum) = durations.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), &d| (min.min(d), max.max(d), sum + d),
        );

        Ok(Self {
            min,
            max,
            mean: sum / durations.len() as f64,
            count: durations.len(),
        })
    }
}

/// Outcome of a lifecycle run
#[derive(Debug, Clone)]
pub struct RunResult {
    pub name: String,
    pub mode: Mode,
    pub warmup: usize,
    pub args: Vec<Value>,
    pub durations: Vec<f64>,
}

impl RunResult {
    /// Derived statistics; fails with [`Error::EmptyResult`] when nothing was measured
    pub fn summary(&self) -> Result<Summary> {
        Summary::from_durations(&self.durations)
    }
}
