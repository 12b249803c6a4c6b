//! Grouped summaries over the canonical sales table
//!
//! Every function here is a pure view of the table: it reads the columns it
//! needs, reports a `SchemaError` when one is absent, and returns rows sorted
//! by group key. Row order in the input does not affect the groups.

use crate::data::{columns, SalesTable};
use crate::error::{Result, SalesError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Summed Total for one branch in one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySales {
    pub branch: String,
    /// First day of the month
    pub month: NaiveDate,
    pub total: f64,
}

impl MonthlySales {
    pub fn new(branch: &str, month: NaiveDate, total: f64) -> Self {
        Self {
            branch: branch.to_string(),
            month,
            total,
        }
    }
}

/// Summed Total for one ISO week number across all branches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySales {
    pub week: u32,
    pub total: f64,
}

/// Mean unit price for a product line paid with a given method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePayment {
    pub product_line: String,
    pub payment: String,
    pub unit_price: f64,
}

/// Summed Total for a product line bought by a customer type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPreference {
    pub product_line: String,
    pub customer_type: String,
    pub total: f64,
}

/// Product line x payment matrix of mean unit prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePaymentPivot {
    /// Row labels, sorted
    pub product_lines: Vec<String>,
    /// Column labels, sorted
    pub payments: Vec<String>,
    /// `values[row][col]`, `None` where the pair never occurred
    pub values: Vec<Vec<Option<f64>>>,
}

impl PricePaymentPivot {
    /// Mean unit price for a product line and payment method
    pub fn get(&self, product_line: &str, payment: &str) -> Option<f64> {
        let row = self.product_lines.iter().position(|p| p == product_line)?;
        let col = self.payments.iter().position(|p| p == payment)?;
        self.values[row][col]
    }
}

/// One bucket of the Total distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Total summed per (Branch, Month). Months without transactions get no row.
pub fn monthly_sales(table: &SalesTable) -> Result<Vec<MonthlySales>> {
    table.require(&[columns::BRANCH, columns::MONTH, columns::TOTAL])?;

    let branches = table.strings(columns::BRANCH)?;
    let months = table.dates(columns::MONTH)?;
    let totals = table.floats(columns::TOTAL)?;

    let mut groups: BTreeMap<(String, NaiveDate), f64> = BTreeMap::new();
    for ((branch, month), total) in branches.into_iter().zip(months).zip(totals) {
        *groups.entry((branch, month)).or_insert(0.0) += total;
    }

    Ok(groups
        .into_iter()
        .map(|((branch, month), total)| MonthlySales {
            branch,
            month,
            total,
        })
        .collect())
}

/// Total summed per ISO week number, all branches combined
pub fn weekly_sales(table: &SalesTable) -> Result<Vec<WeeklySales>> {
    table.require(&[columns::WEEK, columns::TOTAL])?;

    let weeks = table.weeks()?;
    let totals = table.floats(columns::TOTAL)?;

    let mut groups: BTreeMap<u32, f64> = BTreeMap::new();
    for (week, total) in weeks.into_iter().zip(totals) {
        *groups.entry(week).or_insert(0.0) += total;
    }

    Ok(groups
        .into_iter()
        .map(|(week, total)| WeeklySales { week, total })
        .collect())
}

/// Unweighted mean Unit price per (Product line, Payment)
pub fn price_payment_analysis(table: &SalesTable) -> Result<Vec<PricePayment>> {
    table.require(&[columns::PRODUCT_LINE, columns::PAYMENT, columns::UNIT_PRICE])?;

    let product_lines = table.strings(columns::PRODUCT_LINE)?;
    let payments = table.strings(columns::PAYMENT)?;
    let prices = table.floats(columns::UNIT_PRICE)?;

    // (sum, count)
    let mut groups: BTreeMap<(String, String), (f64, usize)> = BTreeMap::new();
    for ((product_line, payment), price) in product_lines.into_iter().zip(payments).zip(prices) {
        let entry = groups.entry((product_line, payment)).or_insert((0.0, 0));
        entry.0 += price;
        entry.1 += 1;
    }

    Ok(groups
        .into_iter()
        .map(|((product_line, payment), (sum, count))| PricePayment {
            product_line,
            payment,
            unit_price: sum / count as f64,
        })
        .collect())
}

/// Total summed per (Product line, Customer type)
pub fn product_preference_customer_type(table: &SalesTable) -> Result<Vec<ProductPreference>> {
    table.require(&[columns::PRODUCT_LINE, columns::CUSTOMER_TYPE, columns::TOTAL])?;

    let product_lines = table.strings(columns::PRODUCT_LINE)?;
    let customer_types = table.strings(columns::CUSTOMER_TYPE)?;
    let totals = table.floats(columns::TOTAL)?;

    let mut groups: BTreeMap<(String, String), f64> = BTreeMap::new();
    for ((product_line, customer_type), total) in
        product_lines.into_iter().zip(customer_types).zip(totals)
    {
        *groups.entry((product_line, customer_type)).or_insert(0.0) += total;
    }

    Ok(groups
        .into_iter()
        .map(|((product_line, customer_type), total)| ProductPreference {
            product_line,
            customer_type,
            total,
        })
        .collect())
}

/// Spread price/payment rows into a product line x payment matrix
pub fn pivot_price_payment(rows: &[PricePayment]) -> PricePaymentPivot {
    let product_lines: Vec<String> = rows
        .iter()
        .map(|r| r.product_line.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let payments: Vec<String> = rows
        .iter()
        .map(|r| r.payment.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut values = vec![vec![None; payments.len()]; product_lines.len()];
    for row in rows {
        let r = product_lines.iter().position(|p| *p == row.product_line);
        let c = payments.iter().position(|p| *p == row.payment);
        if let (Some(r), Some(c)) = (r, c) {
            values[r][c] = Some(row.unit_price);
        }
    }

    PricePaymentPivot {
        product_lines,
        payments,
        values,
    }
}

/// Equal-width histogram of the Total column
pub fn sales_distribution(table: &SalesTable, bins: usize) -> Result<Vec<HistogramBin>> {
    if bins == 0 {
        return Err(SalesError::InvalidParameter(
            "Histogram needs at least one bin".to_string(),
        ));
    }
    table.require(&[columns::TOTAL])?;

    let totals = table.floats(columns::TOTAL)?;
    let buckets = sales_math::histogram(&totals, bins)?;

    Ok(buckets
        .into_iter()
        .map(|b| HistogramBin {
            lower: b.lower,
            upper: b.upper,
            count: b.count,
        })
        .collect())
}
