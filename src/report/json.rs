//! JSON results file

use crate::error::{Error, Result};
use crate::timing::{Mode, RunResult, Summary};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Schema identifier written into every results file
pub const SCHEMA: &str = "bench-harness/run";
/// Schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Machine-readable record of one run
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    pub schema: &'static str,
    pub version: u32,
    pub name: String,
    pub mode: Mode,
    pub warmup: usize,
    /// Processed arguments as displayed
    pub args: Vec<String>,
    /// Measured durations in seconds
    pub durations: Vec<f64>,
    pub summary: Summary,
}

impl JsonReport {
    pub fn new(result: &RunResult, summary: Summary) -> Self {
        Self {
            schema: SCHEMA,
            version: SCHEMA_VERSION,
            name: result.name.clone(),
            mode: result.mode,
            warmup: result.warmup,
            args: result.args.iter().map(ToString::to_string).collect(),
            durations: result.durations.clone(),
            summary,
        }
    }

    /// Prettified JSON text
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Io(std::io::Error::other(e)))
    }

    /// Write the report to `path`
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
