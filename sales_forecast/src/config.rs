//! Pipeline configuration

use crate::error::{Result, SalesError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Date pattern of the `Date` column in raw point-of-sale exports
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Number of future months projected per branch
pub const DEFAULT_HORIZON: usize = 3;

/// Number of buckets in the Total distribution
pub const DEFAULT_HISTOGRAM_BINS: usize = 10;

/// What to do with a branch whose history is a single month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateFitPolicy {
    /// Repeat the single observed total for every forecast month
    #[default]
    FlatLine,
    /// Fail the run with `InsufficientDataError`
    Error,
    /// Leave the branch out of both forecast tables
    Skip,
}

impl std::str::FromStr for DegenerateFitPolicy {
    type Err = SalesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "flat_line" | "flat-line" | "flat" => Ok(Self::FlatLine),
            "error" => Ok(Self::Error),
            "skip" => Ok(Self::Skip),
            other => Err(SalesError::InvalidParameter(format!(
                "Unknown degenerate fit policy: {}",
                other
            ))),
        }
    }
}

/// Settings for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// chrono format string used to parse the `Date` column
    pub date_format: String,
    /// Months to forecast after each branch's last observed month
    pub horizon: usize,
    /// Handling of single-month branch histories
    pub degenerate_policy: DegenerateFitPolicy,
    /// Bucket count for the Total distribution
    pub histogram_bins: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            horizon: DEFAULT_HORIZON,
            degenerate_policy: DegenerateFitPolicy::default(),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file; missing keys take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the forecast horizon
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Set the degenerate fit policy
    pub fn with_degenerate_policy(mut self, policy: DegenerateFitPolicy) -> Self {
        self.degenerate_policy = policy;
        self
    }

    /// Check that every setting is usable
    pub fn validate(&self) -> Result<()> {
        if self.date_format.trim().is_empty() {
            return Err(SalesError::InvalidParameter(
                "Date format must not be empty".to_string(),
            ));
        }

        if self.horizon == 0 {
            return Err(SalesError::InvalidParameter(
                "Forecast horizon must be at least 1 month".to_string(),
            ));
        }

        if self.histogram_bins == 0 {
            return Err(SalesError::InvalidParameter(
                "Histogram needs at least one bin".to_string(),
            ));
        }

        Ok(())
    }
}
