//! Error types for the sales_forecast crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum SalesError {
    /// A value in the batch does not have the expected format (dates, numbers)
    #[error("Data format error: {0}")]
    DataFormatError(String),

    /// A required column is missing from a table
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// Too few observations to fit a trend
    #[error("Insufficient data: {0}")]
    InsufficientDataError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A loader was pointed at a source it cannot read
    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error from the trend math
    #[error("Math error: {0}")]
    MathError(#[from] sales_math::MathError),

    /// Error while reading or writing JSON/CSV
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, SalesError>;

impl From<PolarsError> for SalesError {
    fn from(err: PolarsError) -> Self {
        SalesError::PolarsError(err.to_string())
    }
}

impl From<serde_json::Error> for SalesError {
    fn from(err: serde_json::Error) -> Self {
        SalesError::SerializationError(err.to_string())
    }
}

impl From<csv::Error> for SalesError {
    fn from(err: csv::Error) -> Self {
        SalesError::SerializationError(err.to_string())
    }
}
