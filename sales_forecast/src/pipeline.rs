//! Pipeline orchestration: load, preprocess, aggregate, forecast

use crate::aggregate::{
    monthly_sales, price_payment_analysis, product_preference_customer_type, sales_distribution,
    weekly_sales,
};
use crate::config::PipelineConfig;
use crate::data::{DataLoader, SalesTable};
use crate::error::Result;
use crate::forecast::forecast_sales;
use crate::preprocess::preprocess;
use crate::report::SalesReport;
use polars::prelude::DataFrame;

/// Runs the sales analysis over one batch at a time.
///
/// Holds only its configuration, so one value can be reused across runs or
/// a fresh one built per run with the same outcome.
#[derive(Debug, Clone, Default)]
pub struct SalesPipeline {
    config: PipelineConfig,
}

impl SalesPipeline {
    /// Create a pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load a batch from `loader` and analyse it
    pub fn run(&self, loader: &dyn DataLoader) -> Result<SalesReport> {
        tracing::info!(source = %loader.describe(), "loading sales batch");
        let raw = loader.load()?;
        self.run_frame(&raw)
    }

    /// Analyse a raw batch that is already loaded
    pub fn run_frame(&self, raw: &DataFrame) -> Result<SalesReport> {
        tracing::info!(rows = raw.height(), "running sales pipeline");

        let table = preprocess(raw, &self.config)?;
        let report = self.analyse(&table)?;

        tracing::info!(
            monthly_rows = report.monthly.len(),
            weekly_rows = report.weekly.len(),
            forecast_rows = report.forecast_only.len(),
            "sales pipeline finished"
        );

        Ok(report)
    }

    /// Aggregate and forecast a table that has already been preprocessed
    pub fn analyse(&self, table: &SalesTable) -> Result<SalesReport> {
        let monthly = monthly_sales(table)?;
        let weekly = weekly_sales(table)?;
        let price_payment = price_payment_analysis(table)?;
        let product_preference = product_preference_customer_type(table)?;
        let distribution = sales_distribution(table, self.config.histogram_bins)?;

        tracing::debug!(
            monthly = monthly.len(),
            weekly = weekly.len(),
            price_payment = price_payment.len(),
            product_preference = product_preference.len(),
            "aggregates computed"
        );

        let forecast = forecast_sales(&monthly, &self.config)?;

        Ok(SalesReport {
            monthly,
            weekly,
            price_payment,
            product_preference,
            combined_forecast: forecast.combined,
            forecast_only: forecast.forecast_only,
            distribution,
        })
    }
}
