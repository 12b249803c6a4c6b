//! Date normalization and period derivation
//!
//! Turns a raw batch into a [`SalesTable`]: `Date` becomes a real date
//! column, `Month` holds the first day of the transaction's month and `Week`
//! its ISO-8601 week number. A batch with a single bad date is rejected as a
//! whole.

use crate::config::PipelineConfig;
use crate::data::{
    column_as_f64, column_as_strings, columns, date_series, missing_columns, SalesTable,
};
use crate::error::{Result, SalesError};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// ISO-8601 week number (1-53). Early January days can belong to week 52/53
/// of the previous ISO year and late December days to week 1 of the next.
pub fn iso_week(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// Parse a single date cell with the configured pattern
pub fn parse_date(value: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, format).ok()
}

/// Parse every cell of the `Date` column.
///
/// Returns the dates in row order, or a `DataFormatError` describing the
/// unparseable cells when there is at least one.
fn parse_dates(raw: &DataFrame, format: &str) -> Result<Vec<NaiveDate>> {
    let col = raw.column(columns::DATE)?.cast(&DataType::Utf8)?;
    let cells = col.utf8()?;

    let mut dates = Vec::with_capacity(cells.len());
    let mut bad_rows: Vec<(usize, String)> = Vec::new();

    for (row, cell) in cells.into_iter().enumerate() {
        match cell.and_then(|value| parse_date(value, format)) {
            Some(date) => dates.push(date),
            None => bad_rows.push((row, cell.unwrap_or("<null>").to_string())),
        }
    }

    if let Some((row, value)) = bad_rows.first() {
        return Err(SalesError::DataFormatError(format!(
            "{} row(s) have dates not matching '{}'; first at row {}: '{}'",
            bad_rows.len(),
            format,
            row,
            value
        )));
    }

    Ok(dates)
}

/// Normalize a raw batch into the canonical table.
///
/// Fails with `SchemaError` when a required column is missing and with
/// `DataFormatError` when a date does not parse or a price/total cell is
/// empty or non-numeric. The input frame is left untouched.
pub fn preprocess(raw: &DataFrame, config: &PipelineConfig) -> Result<SalesTable> {
    let missing = missing_columns(raw, &columns::REQUIRED);
    if !missing.is_empty() {
        return Err(SalesError::SchemaError(format!(
            "Raw batch is missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let dates = parse_dates(raw, &config.date_format)?;
    let months: Vec<NaiveDate> = dates.iter().map(|d| month_start(*d)).collect();
    let weeks: Vec<u32> = dates.iter().map(|d| iso_week(*d)).collect();

    let mut df = raw.clone();

    for name in columns::CATEGORICAL {
        let values = column_as_strings(raw, name)?;
        let values: Vec<&str> = values.iter().map(String::as_str).collect();
        df.with_column(Series::new(name, values))?;
    }

    for name in [columns::UNIT_PRICE, columns::TOTAL] {
        let values = column_as_f64(raw, name)?;
        df.with_column(Series::new(name, values))?;
    }

    df.with_column(date_series(columns::DATE, &dates)?)?;
    df.with_column(date_series(columns::MONTH, &months)?)?;
    df.with_column(Series::new(columns::WEEK, weeks))?;

    tracing::debug!(rows = df.height(), "preprocessed batch");

    Ok(SalesTable::from_dataframe(df))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_start() {
        assert_eq!(month_start(ymd(2023, 11, 30)), ymd(2023, 11, 1));
        assert_eq!(month_start(ymd(2024, 2, 29)), ymd(2024, 2, 1));
    }

    #[test]
    fn test_iso_week_year_boundaries() {
        // Sunday 2023-01-01 belongs to week 52 of ISO year 2022
        assert_eq!(iso_week(ymd(2023, 1, 1)), 52);
        assert_eq!(iso_week(ymd(2023, 1, 2)), 1);
        // Monday 2024-12-30 is already week 1 of ISO year 2025
        assert_eq!(iso_week(ymd(2024, 12, 30)), 1);
        // 2020 has 53 ISO weeks
        assert_eq!(iso_week(ymd(2021, 1, 3)), 53);
    }

    #[test]
    fn test_parse_date_pattern() {
        assert_eq!(parse_date("01/15/2023", "%m/%d/%Y"), Some(ymd(2023, 1, 15)));
        assert_eq!(parse_date("13/45/2023", "%m/%d/%Y"), None);
        assert_eq!(parse_date("2023-01-15", "%m/%d/%Y"), None);
        assert_eq!(parse_date("02/30/2023", "%m/%d/%Y"), None);
    }
}
