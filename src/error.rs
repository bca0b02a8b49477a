//! Error handling module
//!
//! This module provides unified error handling for the bench-harness application.
//! Every failure is fatal to the run: nothing in the core recovers locally, errors
//! travel up to the binary which prints a diagnostic and exits non-zero.

use std::fmt;
use std::path::PathBuf;

use crate::handle::EntryPoint;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the application
#[derive(Debug)]
pub enum Error {
    /// IO-related errors
    Io(std::io::Error),
    /// Configuration errors
    Config(crate::config::ConfigError),
    /// Benchmark file missing, unreadable, or failing to compile or execute
    Load { path: PathBuf, message: String },
    /// The default argument processor could not coerce a raw argument
    Argument {
        index: usize,
        value: String,
        message: String,
    },
    /// An entry point raised an error while the lifecycle was running
    EntryPoint {
        entry_point: EntryPoint,
        message: String,
    },
    /// Summary statistics requested over zero measured durations
    EmptyResult,
    /// The native compilation helper failed
    Native(String),
}

impl Error {
    /// Create a load error for the given benchmark path
    pub fn load_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Load {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an error for a fault raised inside an entry point
    pub fn entry_point_error(entry_point: EntryPoint, message: impl fmt::Display) -> Self {
        Error::EntryPoint {
            entry_point,
            message: message.to_string(),
        }
    }

    /// Map the context/message of this error using a transformation function
    ///
    /// Variants without a free-form message are returned unchanged.
    pub fn map_context<F>(self, f: F) -> Self
    where
        F: FnOnce(String) -> String,
    {
        match self {
            Error::Load { path, message } => Error::Load {
                path,
                message: f(message),
            },
            Error::EntryPoint {
                entry_point,
                message,
            } => Error::EntryPoint {
                entry_point,
                message: f(message),
            },
            Error::Native(msg) => Error::Native(f(msg)),
            other => other,
        }
    }

    /// Whether the error was raised before any lifecycle entry point ran
    pub fn is_pre_lifecycle(&self) -> bool {
        matches!(
            self,
            Error::Load { .. } | Error::Config(_) | Error::Argument { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {err}"),
            Error::Config(err) => write!(f, "Configuration error: {err}"),
            Error::Load { path, message } => {
                write!(f, "Failed to load benchmark {}: {message}", path.display())
            }
            Error::Argument {
                index,
                value,
                message,
            } => write!(
                f,
                "Invalid benchmark argument #{index} '{value}': {message}"
            ),
            Error::EntryPoint {
                entry_point,
                message,
            } => write!(f, "Entry point '{entry_point}' failed: {message}"),
            Error::EmptyResult => write!(
                f,
                "No measured durations: the benchmark entry point is missing or no iteration ran"
            ),
            Error::Native(msg) => write!(f, "Native compilation failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<crate::config::ConfigError> for Error {
    fn from(err: crate::config::ConfigError) -> Self {
        Error::Config(err)
    }
}

/// Functional extensions for Result types to enable better composition
pub trait ResultExt<T> {
    /// Add context to an error using a closure
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Apply a side effect function to the error without changing the Result
    ///
    /// Used for logging failures on their way up.
    fn inspect_error<F>(self, f: F) -> Result<T>
    where
        F: FnOnce(&Error);
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.map_context(|msg| format!("{}: {}", f(), msg)))
    }

    fn inspect_error<F>(self, f: F) -> Result<T>
    where
        F: FnOnce(&Error),
    {
        if let Err(ref e) = self {
            f(e);
        }
        self
    }
}
