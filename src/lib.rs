//! # Sales Insight
//!
//! Workspace facade re-exporting the sales analysis crates.
//!
//! ## Example
//!
//! ```
//! use sales_insight_workspace::forecast::aggregate::MonthlySales;
//! use sales_insight_workspace::forecast::forecast_sales;
//! use sales_insight_workspace::{NaiveDate, PipelineConfig};
//!
//! let month = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
//! let monthly = vec![MonthlySales::new("B", month, 50.0)];
//! let forecast = forecast_sales(&monthly, &PipelineConfig::default()).unwrap();
//!
//! // a single observed month is projected as a flat line
//! assert_eq!(forecast.forecast_only.len(), 3);
//! assert!(forecast.forecast_only.iter().all(|p| p.total == 50.0));
//! ```

pub use chrono::NaiveDate;
pub use sales_forecast as forecast;
pub use sales_math as math;

pub use sales_forecast::{PipelineConfig, RawRecord, SalesError, SalesPipeline, SalesReport};
