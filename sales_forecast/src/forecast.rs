//! Per-branch linear sales forecasting
//!
//! Each branch's monthly totals are sorted by month and regressed on their
//! position (0, 1, 2, ...). Observed months are treated as adjacent steps
//! even when calendar months are missing in between, so a branch that skips
//! a month is fitted as if it had not. The fitted line is then extended
//! `horizon` steps, labelled with the calendar months following the last
//! observed one.

use crate::aggregate::MonthlySales;
use crate::config::{DegenerateFitPolicy, PipelineConfig};
use crate::error::{Result, SalesError};
use chrono::{Months, NaiveDate};
use sales_math::LinearTrend;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Whether a point was observed or projected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    Actual,
    Forecast,
}

/// One (Month, Total) pair of a branch series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub branch: String,
    pub month: NaiveDate,
    pub total: f64,
    pub kind: PointKind,
}

/// Forecast tables for all branches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesForecast {
    /// History followed by forecast, per branch
    pub combined: Vec<ForecastPoint>,
    /// Forecast points only
    pub forecast_only: Vec<ForecastPoint>,
}

impl SalesForecast {
    /// Branch names in table order
    pub fn branches(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for point in &self.combined {
            if !seen.contains(&point.branch.as_str()) {
                seen.push(point.branch.as_str());
            }
        }
        seen
    }

    /// Combined series of one branch
    pub fn combined_for(&self, branch: &str) -> Vec<&ForecastPoint> {
        self.combined.iter().filter(|p| p.branch == branch).collect()
    }

    /// Forecast-only series of one branch
    pub fn forecast_for(&self, branch: &str) -> Vec<&ForecastPoint> {
        self.forecast_only
            .iter()
            .filter(|p| p.branch == branch)
            .collect()
    }
}

/// Forecast of a single branch
#[derive(Debug, Clone, PartialEq)]
pub struct BranchForecast {
    pub branch: String,
    /// Observed (month, total) pairs, ascending by month
    pub history: Vec<(NaiveDate, f64)>,
    /// Projected (month, total) pairs
    pub forecast: Vec<(NaiveDate, f64)>,
}

impl BranchForecast {
    fn points(&self, pairs: &[(NaiveDate, f64)], kind: PointKind) -> Vec<ForecastPoint> {
        pairs
            .iter()
            .map(|(month, total)| ForecastPoint {
                branch: self.branch.clone(),
                month: *month,
                total: *total,
                kind,
            })
            .collect()
    }

    /// History followed by forecast
    pub fn combined_points(&self) -> Vec<ForecastPoint> {
        let mut points = self.points(&self.history, PointKind::Actual);
        points.extend(self.points(&self.forecast, PointKind::Forecast));
        points
    }

    /// Forecast only
    pub fn forecast_points(&self) -> Vec<ForecastPoint> {
        self.points(&self.forecast, PointKind::Forecast)
    }
}

/// The `horizon` month labels following `last`
pub fn future_months(last: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    (1..=horizon)
        .map(|step| {
            u32::try_from(step)
                .ok()
                .and_then(|step| last.checked_add_months(Months::new(step)))
                .ok_or_else(|| {
                    SalesError::InvalidParameter(format!(
                        "Cannot step {} month(s) past {}",
                        step, last
                    ))
                })
        })
        .collect()
}

/// Group monthly rows by branch, keeping the order branches first appear in
fn group_by_branch(monthly: &[MonthlySales]) -> Vec<(String, Vec<(NaiveDate, f64)>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<(NaiveDate, f64)>)> = Vec::new();

    for row in monthly {
        let slot = *index.entry(row.branch.as_str()).or_insert_with(|| {
            groups.push((row.branch.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push((row.month, row.total));
    }

    groups
}

/// Fit and project one branch.
///
/// Returns `Ok(None)` when the branch is skipped under
/// [`DegenerateFitPolicy::Skip`]. `config` must already be validated.
fn forecast_branch(
    branch: &str,
    mut history: Vec<(NaiveDate, f64)>,
    config: &PipelineConfig,
) -> Result<Option<BranchForecast>> {
    // Stable, so duplicate months keep their input order
    history.sort_by_key(|(month, _)| *month);

    let last_month = match history.last() {
        Some((month, _)) => *month,
        None => {
            return Err(SalesError::InsufficientDataError(format!(
                "Branch '{}' has no monthly history",
                branch
            )))
        }
    };

    let totals: Vec<f64> = history.iter().map(|(_, total)| *total).collect();

    let values = if totals.len() == 1 {
        match config.degenerate_policy {
            DegenerateFitPolicy::FlatLine => vec![totals[0]; config.horizon],
            DegenerateFitPolicy::Error => {
                return Err(SalesError::InsufficientDataError(format!(
                    "Branch '{}' has a single month of history, need at least 2 to fit a trend",
                    branch
                )))
            }
            DegenerateFitPolicy::Skip => {
                tracing::warn!(branch, "skipping branch with a single month of history");
                return Ok(None);
            }
        }
    } else {
        let trend = LinearTrend::fit(&totals)?;
        tracing::debug!(
            branch,
            months = trend.observations(),
            slope = trend.slope(),
            intercept = trend.intercept(),
            "fitted branch trend"
        );
        trend.forecast(config.horizon)
    };

    let months = future_months(last_month, config.horizon)?;

    Ok(Some(BranchForecast {
        branch: branch.to_string(),
        history,
        forecast: months.into_iter().zip(values).collect(),
    }))
}

/// Forecast every branch in the monthly aggregate.
///
/// Branches are fitted independently, each from its own rows only, and
/// appear in the output in the order they first appear in `monthly`.
pub fn forecast_sales(monthly: &[MonthlySales], config: &PipelineConfig) -> Result<SalesForecast> {
    config.validate()?;

    let mut result = SalesForecast::default();

    for (branch, history) in group_by_branch(monthly) {
        if let Some(branch_forecast) = forecast_branch(&branch, history, config)? {
            result.combined.extend(branch_forecast.combined_points());
            result.forecast_only.extend(branch_forecast.forecast_points());
        }
    }

    Ok(result)
}
