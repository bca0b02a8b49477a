//! Unified Test Framework
//!
//! Benchmark trees on disk, a command wrapper for the binary and parsed
//! command output.

use assert_cmd::Command as AssertCommand;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;

/// Main result type for the framework
pub type Result<T = ()> = std::result::Result<T, Box<dyn Error>>;

/// Binary under test
pub const BINARY: &str = "bench-harness";

/// Package marker file name
pub const MARKER: &str = "mod.rhai";

/// Environment variables the harness reads; cleared for every command
const HARNESS_ENV: [&str; 5] = [
    "BENCH_HARNESS_ITERATIONS",
    "BENCH_HARNESS_WARMUP",
    "BENCH_HARNESS_PATH",
    "BENCH_HARNESS_LOG",
    "RUST_LOG",
];

/// Temporary directory holding benchmark scripts
#[derive(Debug)]
pub struct BenchTree {
    #[allow(dead_code)]
    temp_dir: TempDir,
    path: PathBuf,
}

impl BenchTree {
    /// Create a new tree builder
    pub fn builder() -> BenchTreeBuilder {
        BenchTreeBuilder::new()
    }

    /// Root of the tree
    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute path of a file inside the tree
    pub fn file<P: AsRef<Path>>(&self, relative: P) -> PathBuf {
        self.path.join(relative)
    }
}

/// Builder for [`BenchTree`]
#[derive(Debug, Default)]
pub struct BenchTreeBuilder {
    files: Vec<(String, String)>,
}

impl BenchTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given content
    pub fn with_file<P: AsRef<str>, C: AsRef<str>>(mut self, path: P, content: C) -> Self {
        self.files
            .push((path.as_ref().to_owned(), content.as_ref().to_owned()));
        self
    }

    /// Mark a directory as a package with an empty marker
    #[allow(dead_code)]
    pub fn with_package<P: AsRef<str>>(self, dir: P) -> Self {
        self.with_package_init(dir, "")
    }

    /// Mark a directory as a package whose marker runs the given code
    #[allow(dead_code)]
    pub fn with_package_init<P: AsRef<str>, C: AsRef<str>>(self, dir: P, init: C) -> Self {
        let marker = format!("{}/{MARKER}", dir.as_ref().trim_end_matches('/'));
        self.with_file(marker, init)
    }

    /// Write everything into a fresh temporary directory
    pub fn build(self) -> Result<BenchTree> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().canonicalize()?;

        for (file, content) in &self.files {
            let full_path = path.join(file);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(full_path, content)?;
        }

        Ok(BenchTree { temp_dir, path })
    }
}

/// Command line for one harness invocation
#[derive(Debug, Clone, Default)]
pub struct HarnessCommand {
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    env: Vec<(String, String)>,
}

impl HarnessCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set working directory
    #[allow(dead_code)]
    pub fn in_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Add argument
    pub fn arg<S: AsRef<str>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    /// Add a path argument
    pub fn file<P: AsRef<Path>>(self, path: P) -> Self {
        let path = path.as_ref().display().to_string();
        self.arg(path)
    }

    /// Set the measured iteration count
    #[allow(dead_code)]
    pub fn iterations<S: AsRef<str>>(self, n: S) -> Self {
        self.arg("-i").arg(n)
    }

    /// Set the warmup count
    #[allow(dead_code)]
    pub fn warmup<S: AsRef<str>>(self, n: S) -> Self {
        self.arg("-w").arg(n)
    }

    /// Set an environment variable for the run
    #[allow(dead_code)]
    pub fn env<K: AsRef<str>, V: AsRef<str>>(mut self, key: K, value: V) -> Self {
        self.env
            .push((key.as_ref().to_owned(), value.as_ref().to_owned()));
        self
    }

    /// Prepared assert_cmd command with a clean harness environment
    pub fn command(&self) -> Result<AssertCommand> {
        let mut cmd = AssertCommand::cargo_bin(BINARY)?;
        for key in HARNESS_ENV {
            cmd.env_remove(key);
        }
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd.args(&self.args);
        Ok(cmd)
    }

    /// Execute the command
    pub fn execute(&self) -> Result<CommandOutput> {
        Ok(CommandOutput::from_output(self.command()?.output()?))
    }
}

/// Command output
#[derive(Debug)]
pub struct CommandOutput {
    output: Output,
    stdout: String,
    stderr: String,
}

impl CommandOutput {
    pub fn from_output(output: Output) -> Self {
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        Self {
            output,
            stdout,
            stderr,
        }
    }

    pub fn is_success(&self) -> bool {
        self.output.status.success()
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    #[allow(dead_code)]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    #[allow(dead_code)]
    pub fn exit_code(&self) -> Option<i32> {
        self.output.status.code()
    }

    /// Stdout lines starting with `prefix`
    #[allow(dead_code)]
    pub fn lines_starting_with<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> {
        self.stdout.lines().filter(move |line| line.starts_with(prefix))
    }

    /// Measured durations parsed from the sample lines
    #[allow(dead_code)]
    pub fn durations(&self) -> Vec<f64> {
        self.stdout
            .lines()
            .filter(|line| line.starts_with("### iteration=") || line.starts_with("@@@ name="))
            .filter_map(|line| line.rsplit_once("duration="))
            .filter_map(|(_, value)| value.trim().parse().ok())
            .collect()
    }
}
