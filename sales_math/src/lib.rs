//! # Sales Math
//!
//! Numeric building blocks for the sales forecasting pipeline: an ordinary
//! least squares trend line over equally spaced observations, and
//! equal-width histograms.

use thiserror::Error;

pub mod distribution;
pub mod trend;

pub use distribution::{histogram, Bucket};
pub use trend::LinearTrend;

/// Errors that can occur in sales math calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for sales math operations
pub type Result<T> = std::result::Result<T, MathError>;
