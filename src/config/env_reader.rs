//! Environment reader module
//!
//! This module provides a low-level abstraction over process environment
//! variables so configuration lookups can be exercised with a mock in tests.

use std::env;
use thiserror::Error;

/// Errors that can occur while reading the environment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    /// Variable is set but its value is not valid unicode
    #[error("environment variable {key} is not valid unicode")]
    NotUnicode { key: String },
}

/// Trait for reading configuration values from the environment
pub trait EnvReader {
    /// Get a variable by key; `Ok(None)` when unset or empty
    fn get_var(&self, key: &str) -> Result<Option<String>, EnvError>;
}

/// Reader backed by the real process environment
pub struct SystemEnvReader;

impl EnvReader for SystemEnvReader {
    fn get_var(&self, key: &str) -> Result<Option<String>, EnvError> {
        match env::var(key) {
            Ok(value) => Ok(Some(value.trim().to_owned()).filter(|v| !v.is_empty())),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(EnvError::NotUnicode {
                key: key.to_owned(),
            }),
        }
    }
}

/// Mock environment reader for testing
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MockEnvReader {
    vars: std::collections::HashMap<String, String>,
    broken: Vec<String>,
}

#[cfg(test)]
impl MockEnvReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable to the mock environment
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }

    /// Make a variable report a non-unicode value
    pub fn with_broken_var(mut self, key: &str) -> Self {
        self.broken.push(key.to_owned());
        self
    }
}

#[cfg(test)]
impl EnvReader for MockEnvReader {
    fn get_var(&self, key: &str) -> Result<Option<String>, EnvError> {
        if self.broken.iter().any(|k| k == key) {
            return Err(EnvError::NotUnicode {
                key: key.to_owned(),
            });
        }
        Ok(self
            .vars
            .get(key)
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty()))
    }
}
