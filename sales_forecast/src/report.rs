//! The bundle of tables handed to rendering

use crate::aggregate::{
    pivot_price_payment, HistogramBin, MonthlySales, PricePayment, PricePaymentPivot,
    ProductPreference, WeeklySales,
};
use crate::error::Result;
use crate::forecast::ForecastPoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Every table produced by one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    pub monthly: Vec<MonthlySales>,
    pub weekly: Vec<WeeklySales>,
    pub price_payment: Vec<PricePayment>,
    pub product_preference: Vec<ProductPreference>,
    pub combined_forecast: Vec<ForecastPoint>,
    pub forecast_only: Vec<ForecastPoint>,
    pub distribution: Vec<HistogramBin>,
}

impl SalesReport {
    /// Price/payment rows spread into a matrix
    pub fn price_payment_pivot(&self) -> PricePaymentPivot {
        pivot_price_payment(&self.price_payment)
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write one CSV file per table into `dir`, creating it if needed
    pub fn write_csv_dir<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        write_csv(&dir.join("monthly_sales.csv"), &self.monthly)?;
        write_csv(&dir.join("weekly_sales.csv"), &self.weekly)?;
        write_csv(&dir.join("price_payment.csv"), &self.price_payment)?;
        write_csv(&dir.join("product_preference.csv"), &self.product_preference)?;
        write_csv(&dir.join("combined_forecast.csv"), &self.combined_forecast)?;
        write_csv(&dir.join("forecast_only.csv"), &self.forecast_only)?;
        write_csv(&dir.join("sales_distribution.csv"), &self.distribution)?;

        tracing::info!(dir = %dir.display(), "wrote report tables");
        Ok(())
    }
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

impl fmt::Display for SalesReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Monthly sales")?;
        for row in &self.monthly {
            writeln!(
                f,
                "  {:<10} {}  {:>14.2}",
                row.branch,
                row.month.format("%Y-%m"),
                row.total
            )?;
        }

        writeln!(f, "\nSales forecast")?;
        for point in &self.combined_forecast {
            writeln!(
                f,
                "  {:<10} {}  {:>14.2}  {:?}",
                point.branch,
                point.month.format("%Y-%m"),
                point.total,
                point.kind
            )?;
        }

        writeln!(f, "\nWeekly sales")?;
        for row in &self.weekly {
            writeln!(f, "  week {:>2}  {:>14.2}", row.week, row.total)?;
        }

        writeln!(f, "\nAverage unit price by product line and payment")?;
        let pivot = self.price_payment_pivot();
        write!(f, "  {:<24}", "")?;
        for payment in &pivot.payments {
            write!(f, " {:>12}", payment)?;
        }
        writeln!(f)?;
        for (product_line, values) in pivot.product_lines.iter().zip(&pivot.values) {
            write!(f, "  {:<24}", product_line)?;
            for value in values {
                match value {
                    Some(v) => write!(f, " {:>12.2}", v)?,
                    None => write!(f, " {:>12}", "-")?,
                }
            }
            writeln!(f)?;
        }

        writeln!(f, "\nProduct preference by customer type")?;
        for row in &self.product_preference {
            writeln!(
                f,
                "  {:<24} {:<10} {:>14.2}",
                row.product_line, row.customer_type, row.total
            )?;
        }

        writeln!(f, "\nDistribution of totals")?;
        for bin in &self.distribution {
            writeln!(
                f,
                "  [{:>10.2}, {:>10.2}]  {}",
                bin.lower, bin.upper, bin.count
            )?;
        }

        Ok(())
    }
}
