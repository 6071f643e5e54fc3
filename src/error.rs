use thiserror::Error;
use parquet::errors::ParquetError;
use crate::models::{MetricKind, Sex};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Age {age} is outside the tabulated range {min}..={max} for {metric}/{sex}")]
    OutOfRange {
        metric: MetricKind,
        sex: Sex,
        age: f64,
        min: u32,
        max: u32,
    },

    #[error("No reference table for {metric}/{sex}")]
    UnknownPartition { metric: MetricKind, sex: Sex },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid reference table: {0}")]
    InvalidTable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IO(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Parquet error: {0}")]
    Parquet(String),

    #[error("General error: {0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<ParquetError> for Error {
    fn from(err: ParquetError) -> Self {
        Error::Parquet(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IO(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}
