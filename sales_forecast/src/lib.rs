//! # Sales Forecast
//!
//! Aggregation and short-horizon forecasting over retail point-of-sale data.
//!
//! ## Features
//!
//! - Batch loading from CSV or in-memory records
//! - Date normalization with month and ISO week derivation
//! - Monthly, weekly, price/payment and product/customer-type summaries
//! - Per-branch linear trend forecast stitched onto the monthly history
//!
//! ## Quick Start
//!
//! ```no_run
//! use sales_forecast::data::CsvDataLoader;
//! use sales_forecast::{PipelineConfig, SalesPipeline};
//!
//! let pipeline = SalesPipeline::new(PipelineConfig::default())?;
//! let report = pipeline.run(&CsvDataLoader::new("supermarket_sales.csv"))?;
//!
//! for point in &report.forecast_only {
//!     println!("{} {} {:.2}", point.branch, point.month, point.total);
//! }
//! # Ok::<(), sales_forecast::SalesError>(())
//! ```
//!
//! A run is all-or-nothing: an unparseable date anywhere in the batch, a
//! missing column or a degenerate history under the `error` policy fails
//! the whole run and no tables are returned.

pub mod aggregate;
pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod pipeline;
pub mod preprocess;
pub mod report;

// Re-export commonly used types
pub use crate::config::{DegenerateFitPolicy, PipelineConfig};
pub use crate::data::{CsvDataLoader, DataLoader, RawRecord, RecordsLoader, SalesTable};
pub use crate::error::{Result, SalesError};
pub use crate::forecast::{forecast_sales, ForecastPoint, PointKind, SalesForecast};
pub use crate::pipeline::SalesPipeline;
pub use crate::report::SalesReport;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
