//! Point-of-sale data handling: raw records, loaders and the canonical table

use crate::error::{Result, SalesError};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Column names of the raw point-of-sale export
pub mod columns {
    pub const DATE: &str = "Date";
    pub const BRANCH: &str = "Branch";
    pub const PRODUCT_LINE: &str = "Product line";
    pub const PAYMENT: &str = "Payment";
    pub const CUSTOMER_TYPE: &str = "Customer type";
    pub const UNIT_PRICE: &str = "Unit price";
    pub const TOTAL: &str = "Total";

    /// Derived by preprocessing
    pub const MONTH: &str = "Month";
    /// Derived by preprocessing
    pub const WEEK: &str = "Week";

    /// Columns every raw batch must carry
    pub const REQUIRED: [&str; 7] = [
        DATE,
        BRANCH,
        PRODUCT_LINE,
        PAYMENT,
        CUSTOMER_TYPE,
        UNIT_PRICE,
        TOTAL,
    ];

    /// String-valued columns of the raw schema
    pub const CATEGORICAL: [&str; 4] = [BRANCH, PRODUCT_LINE, PAYMENT, CUSTOMER_TYPE];
}

/// Days between 0001-01-01 (chrono's CE day 1) and the unix epoch
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// One transaction row as exported by the point-of-sale system
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub date: String,
    pub branch: String,
    pub product_line: String,
    pub payment: String,
    pub customer_type: String,
    pub unit_price: f64,
    pub total: f64,
}

impl RawRecord {
    /// Convenience constructor, mostly for tests and in-memory ingestion
    pub fn new(
        date: &str,
        branch: &str,
        product_line: &str,
        payment: &str,
        customer_type: &str,
        unit_price: f64,
        total: f64,
    ) -> Self {
        Self {
            date: date.to_string(),
            branch: branch.to_string(),
            product_line: product_line.to_string(),
            payment: payment.to_string(),
            customer_type: customer_type.to_string(),
            unit_price,
            total,
        }
    }
}

/// A source of raw point-of-sale rows.
///
/// The whole batch is materialized by `load`; the pipeline never asks for
/// more data afterwards.
pub trait DataLoader {
    /// Load the complete batch as a data frame with the raw column names
    fn load(&self) -> Result<DataFrame>;

    /// Short description of the source, used in logs
    fn describe(&self) -> String;
}

/// Loads a batch from a CSV file with a header row
#[derive(Debug, Clone)]
pub struct CsvDataLoader {
    path: PathBuf,
}

impl CsvDataLoader {
    /// Create a loader for a `.csv` file
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DataLoader for CsvDataLoader {
    fn load(&self) -> Result<DataFrame> {
        let is_csv = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if !is_csv {
            return Err(SalesError::UnsupportedSource(format!(
                "Expected a .csv file, got '{}'",
                self.path.display()
            )));
        }

        let file = File::open(&self.path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        tracing::debug!(
            path = %self.path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded csv batch"
        );

        Ok(df)
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }
}

/// Serves a batch that is already in memory
#[derive(Debug, Clone, Default)]
pub struct RecordsLoader {
    records: Vec<RawRecord>,
}

impl RecordsLoader {
    /// Wrap a set of records
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }
}

impl DataLoader for RecordsLoader {
    fn load(&self) -> Result<DataFrame> {
        records_to_dataframe(&self.records)
    }

    fn describe(&self) -> String {
        format!("memory:{} records", self.records.len())
    }
}

/// Build a raw data frame from records, one column per raw field
pub fn records_to_dataframe(records: &[RawRecord]) -> Result<DataFrame> {
    let df = DataFrame::new(vec![
        string_series(columns::DATE, records, |r| r.date.as_str()),
        string_series(columns::BRANCH, records, |r| r.branch.as_str()),
        string_series(columns::PRODUCT_LINE, records, |r| r.product_line.as_str()),
        string_series(columns::PAYMENT, records, |r| r.payment.as_str()),
        string_series(columns::CUSTOMER_TYPE, records, |r| r.customer_type.as_str()),
        Series::new(
            columns::UNIT_PRICE,
            records.iter().map(|r| r.unit_price).collect::<Vec<f64>>(),
        ),
        Series::new(
            columns::TOTAL,
            records.iter().map(|r| r.total).collect::<Vec<f64>>(),
        ),
    ])?;

    Ok(df)
}

fn string_series<F>(name: &str, records: &[RawRecord], field: F) -> Series
where
    F: Fn(&RawRecord) -> &str,
{
    Series::new(name, records.iter().map(field).collect::<Vec<&str>>())
}

/// Convert a calendar date to polars' `Date` physical value (days since epoch)
pub fn date_to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Convert polars' `Date` physical value back to a calendar date
pub fn epoch_days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

/// Build a polars `Date` series from calendar dates
pub fn date_series(name: &str, dates: &[NaiveDate]) -> Result<Series> {
    let days: Vec<i32> = dates.iter().map(|d| date_to_epoch_days(*d)).collect();
    Ok(Series::new(name, days).cast(&DataType::Date)?)
}

/// Look up a column, turning absence into a schema error
pub fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name).map_err(|_| {
        SalesError::SchemaError(format!("Required column '{}' is missing", name))
    })
}

/// Names of `required` columns that `df` lacks, in the given order
pub fn missing_columns(df: &DataFrame, required: &[&str]) -> Vec<String> {
    let present = df.get_column_names();
    required
        .iter()
        .filter(|name| !present.contains(*name))
        .map(|name| name.to_string())
        .collect()
}

fn null_cell(column: &str, row: usize) -> SalesError {
    SalesError::DataFormatError(format!("Missing value in column '{}' at row {}", column, row))
}

/// Read a column as strings; nulls are a data format error
pub fn column_as_strings(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let col = require_column(df, name)?.cast(&DataType::Utf8)?;
    let ca = col.utf8()?;

    ca.into_iter()
        .enumerate()
        .map(|(row, value)| value.map(str::to_string).ok_or_else(|| null_cell(name, row)))
        .collect()
}

/// Read a column as f64 values; nulls and non-numeric cells are a data format error
pub fn column_as_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let col = require_column(df, name)?.cast(&DataType::Float64)?;
    let ca = col.f64()?;

    ca.into_iter()
        .enumerate()
        .map(|(row, value)| value.ok_or_else(|| null_cell(name, row)))
        .collect()
}

/// Read a polars `Date` column as calendar dates
pub fn column_as_dates(df: &DataFrame, name: &str) -> Result<Vec<NaiveDate>> {
    let col = require_column(df, name)?;
    if col.dtype() != &DataType::Date {
        return Err(SalesError::SchemaError(format!(
            "Column '{}' must be a date column, found {}",
            name,
            col.dtype()
        )));
    }

    let physical = col.cast(&DataType::Int32)?;
    let ca = physical.i32()?;

    ca.into_iter()
        .enumerate()
        .map(|(row, value)| {
            let days = value.ok_or_else(|| null_cell(name, row))?;
            epoch_days_to_date(days).ok_or_else(|| {
                SalesError::DataFormatError(format!(
                    "Date out of range in column '{}' at row {}",
                    name, row
                ))
            })
        })
        .collect()
}

/// Read an integer column as u32 values
pub fn column_as_u32(df: &DataFrame, name: &str) -> Result<Vec<u32>> {
    let col = require_column(df, name)?.cast(&DataType::UInt32)?;
    let ca = col.u32()?;

    ca.into_iter()
        .enumerate()
        .map(|(row, value)| value.ok_or_else(|| null_cell(name, row)))
        .collect()
}

/// Transaction table after date parsing and period derivation.
///
/// Wraps a data frame holding the raw columns (categoricals as strings,
/// `Unit price` and `Total` as f64) plus `Month` (first day of the month,
/// polars `Date`) and `Week` (ISO week number, `UInt32`).
#[derive(Debug, Clone)]
pub struct SalesTable {
    df: DataFrame,
}

impl SalesTable {
    /// Wrap an existing data frame without checking its columns.
    ///
    /// Aggregations check for the columns they need and report a schema error
    /// when one is absent.
    pub fn from_dataframe(df: DataFrame) -> Self {
        Self { df }
    }

    /// Get the DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Number of transactions
    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn strings(&self, name: &str) -> Result<Vec<String>> {
        column_as_strings(&self.df, name)
    }

    pub fn floats(&self, name: &str) -> Result<Vec<f64>> {
        column_as_f64(&self.df, name)
    }

    pub fn dates(&self, name: &str) -> Result<Vec<NaiveDate>> {
        column_as_dates(&self.df, name)
    }

    pub fn weeks(&self) -> Result<Vec<u32>> {
        column_as_u32(&self.df, columns::WEEK)
    }

    /// Fail with a schema error naming every absent column
    pub fn require(&self, names: &[&str]) -> Result<()> {
        let missing = missing_columns(&self.df, names);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SalesError::SchemaError(format!(
                "Missing required column(s): {}",
                missing.join(", ")
            )))
        }
    }
}
