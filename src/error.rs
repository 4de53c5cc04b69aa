//! Error types for the skirmish crate

use thiserror::Error;

use crate::types::UnitId;

/// Main error type for the skirmish crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("vector length mismatch: {weights} weights vs {features} features")]
    DimensionMismatch { weights: usize, features: usize },

    #[error("unit {unit} has no live enemies to target")]
    NoLiveEnemies { unit: UnitId },

    #[error("unit {unit} is not present in the world snapshot")]
    UnknownUnit { unit: UnitId },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid weight '{value}' on line {line}")]
    ParseWeight { line: usize, value: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
