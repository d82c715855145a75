//! Error types shared by the allocator, scenario loading, and demand import.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid or contradictory configuration.
///
/// Carries the dotted field path (e.g. `"dispatch.peak_power_limit"`) and a
/// human-readable description of the violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path.
    pub field: String,
    /// Constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Malformed demand series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("input error: demand series is empty")]
    Empty,

    #[error("input error: demand at index {time_index} is not a finite decimal ({value})")]
    NonFinite { time_index: usize, value: f64 },

    #[error("input error: time index {time_index} appears more than once")]
    DuplicateIndex { time_index: usize },

    #[error("input error: demand series has {len} steps, limit is {max}")]
    TooLong { len: usize, max: usize },
}

/// Failure of a single allocation call.
///
/// Raised before any output is produced; there are no partial results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] InputError),
}

/// Failure while reading a scenario or demand file from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid demand CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid scenario TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] InputError),
}

impl From<DispatchError> for LoadError {
    fn from(e: DispatchError) -> Self {
        match e {
            DispatchError::Config(c) => Self::Config(c),
            DispatchError::Input(i) => Self::Input(i),
        }
    }
}
