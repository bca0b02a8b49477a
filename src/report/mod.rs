//! Reporting module
//!
//! Line-oriented, human-readable progress and result output. The text format
//! is consumed by existing tooling and is reproduced exactly; see [`json`] for
//! the machine-readable results file.

pub mod json;

use crate::error::Result;
use crate::handle::Value;
use crate::timing::{Mode, RunResult, Summary};
use std::io::Write;
use std::path::PathBuf;

pub use json::JsonReport;

/// Horizontal rule separating report sections (79 dashes)
pub const HRULE: &str =
    "-------------------------------------------------------------------------------";

/// Writes the text report to an output stream
#[derive(Debug)]
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the reporter and return the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Extra module search paths section
    pub fn search_paths(&mut self, paths: &[PathBuf]) -> Result<()> {
        writeln!(self.out, "{HRULE}")?;
        if paths.is_empty() {
            writeln!(self.out, "### no extra module search paths specified")?;
        }
        for path in paths {
            writeln!(self.out, "### adding module path: {}", path.display())?;
        }
        Ok(())
    }

    /// Run banner naming the unit and the iteration plan
    pub fn banner(&mut self, name: &str, mode: Mode, warmup: usize) -> Result<()> {
        match mode {
            Mode::SingleShot => writeln!(
                self.out,
                "### {name}, exactly one iteration (no warmup curves)"
            )?,
            Mode::Repeated { iterations } => writeln!(
                self.out,
                "### {name}, {warmup} warmup iterations, {iterations} bench iterations "
            )?,
        }
        Ok(())
    }

    /// Processed argument list
    pub fn args(&mut self, args: &[Value]) -> Result<()> {
        writeln!(self.out, "### args =  {}", format_list(args))?;
        writeln!(self.out, "{HRULE}")?;
        Ok(())
    }

    pub fn setup(&mut self) -> Result<()> {
        writeln!(self.out, "### setup ... ")?;
        Ok(())
    }

    pub fn start(&mut self) -> Result<()> {
        writeln!(self.out, "### start benchmark ... ")?;
        Ok(())
    }

    pub fn warmup(&mut self, warmup: usize) -> Result<()> {
        writeln!(self.out, "### warming up for {warmup} iterations ... ")?;
        Ok(())
    }

    /// One measured duration, in the format of the run mode
    pub fn sample(&mut self, name: &str, mode: Mode, iteration: usize, duration: f64) -> Result<()> {
        if mode.is_single_shot() {
            writeln!(self.out, "@@@ name={name}, duration={duration:.3}")?;
        } else {
            writeln!(
                self.out,
                "### iteration={iteration}, name={name}, duration={duration:.3}"
            )?;
        }
        Ok(())
    }

    pub fn teardown(&mut self) -> Result<()> {
        writeln!(self.out, "{HRULE}")?;
        writeln!(self.out, "### teardown ... ")?;
        Ok(())
    }

    pub fn complete(&mut self) -> Result<()> {
        writeln!(self.out, "### benchmark complete")?;
        writeln!(self.out, "{HRULE}")?;
        Ok(())
    }

    /// Best, worst and average duration
    ///
    /// Fails with [`crate::Error::EmptyResult`] before writing anything when no
    /// duration was measured.
    pub fn summary(&mut self, result: &RunResult) -> Result<Summary> {
        let summary = result.summary()?;
        writeln!(self.out, "### BEST     duration: {:.3} s", summary.min)?;
        writeln!(self.out, "### WORST    duration: {:.3} s", summary.max)?;
        writeln!(self.out, "### AVG      duration: {:.3}", summary.mean)?;
        writeln!(self.out, "{HRULE}")?;
        self.out.flush()?;
        Ok(summary)
    }
}

/// Render an argument list: strings single-quoted, other values as displayed
pub fn format_list(values: &[Value]) -> String {
    let items: Vec<String> = values.iter().map(format_value).collect();
    format!("[{}]", items.join(", "))
}

fn format_value(value: &Value) -> String {
    if value.is_string() {
        format!("'{value}'")
    } else if value.is_array() {
        value
            .clone()
            .into_array()
            .map(|items| format_list(&items))
            .unwrap_or_else(|_| value.to_string())
    } else {
        value.to_string()
    }
}
