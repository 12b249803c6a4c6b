//! Linear trend fitting over equally spaced observations
//!
//! The series is regressed on its position: the first value sits at x = 0,
//! the next at x = 1 and so on. Gaps in whatever calendar produced the series
//! are not visible here, adjacent values are always one step apart.

use crate::{MathError, Result};

/// Ordinary least squares fit of `y = intercept + slope * x`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    slope: f64,
    intercept: f64,
    observations: usize,
}

impl LinearTrend {
    /// Fit a trend line through `values`, indexed 0, 1, 2, ...
    ///
    /// At least two observations are required. With a single observation the
    /// slope is undefined and `MathError::InsufficientData` is returned; the
    /// caller decides what a degenerate history means.
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.len() < 2 {
            return Err(MathError::InsufficientData(format!(
                "Linear trend needs at least 2 points, got {}",
                values.len()
            )));
        }

        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(format!(
                "Non-finite value in series: {}",
                bad
            )));
        }

        let n = values.len() as f64;

        // Calculate means
        let x_mean = (0..values.len()).map(|i| i as f64).sum::<f64>() / n;
        let y_mean = values.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for (i, &y) in values.iter().enumerate() {
            let x = i as f64;
            numerator += (x - x_mean) * (y - y_mean);
            denominator += (x - x_mean) * (x - x_mean);
        }

        if denominator.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = numerator / denominator;
        let intercept = y_mean - slope * x_mean;

        Ok(Self {
            slope,
            intercept,
            observations: values.len(),
        })
    }

    /// Flat line through a single value
    pub fn constant(value: f64) -> Self {
        Self {
            slope: 0.0,
            intercept: value,
            observations: 1,
        }
    }

    /// Value of the fitted line at position `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Predict the `periods` positions directly after the fitted data,
    /// i.e. x = n, n + 1, ..., n + periods - 1
    pub fn forecast(&self, periods: usize) -> Vec<f64> {
        (self.observations..self.observations + periods)
            .map(|x| self.predict(x as f64))
            .collect()
    }

    /// Get the slope (change per step)
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Get the intercept (fitted value at x = 0)
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Number of observations the line was fitted on
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Coefficient of determination of the fit against `values`
    pub fn r_squared(&self, values: &[f64]) -> Result<f64> {
        if values.len() < 2 {
            return Err(MathError::InsufficientData(
                "Not enough data to calculate R-squared. Need at least 2 points.".to_string(),
            ));
        }

        let y_mean = values.iter().sum::<f64>() / values.len() as f64;

        let mut ss_total = 0.0;
        let mut ss_residual = 0.0;

        for (i, &y) in values.iter().enumerate() {
            let y_pred = self.predict(i as f64);
            ss_total += (y - y_mean).powi(2);
            ss_residual += (y - y_pred).powi(2);
        }

        if ss_total.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate R-squared: total sum of squares is too small".to_string(),
            ));
        }

        Ok(1.0 - (ss_residual / ss_total))
    }
}
