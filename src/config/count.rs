//! Iteration and warmup count coercion
//!
//! Counts may arrive as plain integers, as text, or wrapped in a one-element
//! sequence (a convention of some argument parsers). All of them coerce to the
//! same plain integer.

use thiserror::Error;

/// Errors raised while coercing a count
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CountError {
    /// Sequence without a first element
    #[error("empty sequence where a count was expected")]
    Empty,
    /// Text that is not a base-10 integer
    #[error("'{value}' is not an integer")]
    NotAnInteger { value: String },
}

/// A count as supplied by a caller, before coercion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountArg {
    Int(i64),
    Text(String),
    Seq(Vec<CountArg>),
}

impl CountArg {
    /// Coerce to a plain integer; sequences yield their first element
    pub fn as_int(&self) -> Result<i64, CountError> {
        match self {
            CountArg::Int(value) => Ok(*value),
            CountArg::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| CountError::NotAnInteger {
                    value: text.clone(),
                }),
            CountArg::Seq(items) => items.first().ok_or(CountError::Empty)?.as_int(),
        }
    }
}

impl From<i64> for CountArg {
    fn from(value: i64) -> Self {
        CountArg::Int(value)
    }
}

impl From<i32> for CountArg {
    fn from(value: i32) -> Self {
        CountArg::Int(i64::from(value))
    }
}

impl From<u32> for CountArg {
    fn from(value: u32) -> Self {
        CountArg::Int(i64::from(value))
    }
}

impl From<usize> for CountArg {
    fn from(value: usize) -> Self {
        CountArg::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<&str> for CountArg {
    fn from(value: &str) -> Self {
        CountArg::Text(value.to_owned())
    }
}

impl From<String> for CountArg {
    fn from(value: String) -> Self {
        CountArg::Text(value)
    }
}

impl<T: Into<CountArg>> From<Vec<T>> for CountArg {
    fn from(values: Vec<T>) -> Self {
        CountArg::Seq(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<CountArg>, const N: usize> From<[T; N]> for CountArg {
    fn from(values: [T; N]) -> Self {
        CountArg::Seq(values.into_iter().map(Into::into).collect())
    }
}
