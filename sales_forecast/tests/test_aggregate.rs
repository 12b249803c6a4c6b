use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sales_forecast::aggregate::{
    monthly_sales, pivot_price_payment, price_payment_analysis, product_preference_customer_type,
    sales_distribution, weekly_sales,
};
use sales_forecast::data::records_to_dataframe;
use sales_forecast::preprocess::preprocess;
use sales_forecast::{PipelineConfig, RawRecord, SalesError, SalesTable};
use std::collections::{BTreeMap, BTreeSet};

fn sample_records() -> Vec<RawRecord> {
    vec![
        RawRecord::new("01/03/2023", "A", "Food", "Cash", "Member", 10.0, 120.0),
        RawRecord::new("01/17/2023", "A", "Food", "Credit card", "Normal", 14.0, 70.0),
        RawRecord::new("02/02/2023", "A", "Sports", "Cash", "Member", 30.0, 300.0),
        RawRecord::new("01/09/2023", "B", "Food", "Cash", "Normal", 16.0, 48.0),
        RawRecord::new("02/14/2023", "B", "Health", "Ewallet", "Member", 22.5, 225.0),
        RawRecord::new("02/15/2023", "B", "Food", "Cash", "Member", 7.0, 35.0),
        RawRecord::new("03/01/2023", "C", "Sports", "Ewallet", "Normal", 50.0, 500.0),
    ]
}

fn canonical(records: &[RawRecord]) -> SalesTable {
    let raw = records_to_dataframe(records).unwrap();
    preprocess(&raw, &PipelineConfig::default()).unwrap()
}

fn ym(y: i32, m: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, 1).unwrap()
}

fn grand_total(records: &[RawRecord]) -> f64 {
    records.iter().map(|r| r.total).sum()
}

#[test]
fn test_monthly_sales_groups_and_sums() {
    let records = sample_records();
    let monthly = monthly_sales(&canonical(&records)).unwrap();

    let by_key: BTreeMap<(String, NaiveDate), f64> = monthly
        .iter()
        .map(|r| ((r.branch.clone(), r.month), r.total))
        .collect();

    // exactly one row per observed (branch, month)
    assert_eq!(by_key.len(), monthly.len());
    assert_eq!(by_key.len(), 5);

    assert_abs_diff_eq!(by_key[&("A".to_string(), ym(2023, 1))], 190.0);
    assert_abs_diff_eq!(by_key[&("A".to_string(), ym(2023, 2))], 300.0);
    assert_abs_diff_eq!(by_key[&("B".to_string(), ym(2023, 1))], 48.0);
    assert_abs_diff_eq!(by_key[&("B".to_string(), ym(2023, 2))], 260.0);
    assert_abs_diff_eq!(by_key[&("C".to_string(), ym(2023, 3))], 500.0);

    // no gap filling: C has no January or February row
    assert!(!by_key.contains_key(&("C".to_string(), ym(2023, 1))));

    let sum: f64 = monthly.iter().map(|r| r.total).sum();
    assert_abs_diff_eq!(sum, grand_total(&records), epsilon = 1e-9);
}

#[test]
fn test_weekly_sales_preserve_grand_total() {
    let records = sample_records();
    let weekly = weekly_sales(&canonical(&records)).unwrap();

    let weeks: BTreeSet<u32> = weekly.iter().map(|r| r.week).collect();
    assert_eq!(weeks.len(), weekly.len());

    let sum: f64 = weekly.iter().map(|r| r.total).sum();
    assert_abs_diff_eq!(sum, grand_total(&records), epsilon = 1e-9);
}

#[test]
fn test_weekly_sales_span_branches() {
    // 01/09 (A) and 01/10 (B) fall in the same ISO week
    let records = vec![
        RawRecord::new("01/09/2023", "A", "Food", "Cash", "Member", 1.0, 10.0),
        RawRecord::new("01/10/2023", "B", "Food", "Cash", "Member", 1.0, 15.0),
    ];
    let weekly = weekly_sales(&canonical(&records)).unwrap();

    assert_eq!(weekly.len(), 1);
    assert_eq!(weekly[0].week, 2);
    assert_abs_diff_eq!(weekly[0].total, 25.0);
}

#[test]
fn test_weekly_sales_without_week_column() {
    let raw = records_to_dataframe(&sample_records()).unwrap();
    let table = SalesTable::from_dataframe(raw);

    let result = weekly_sales(&table);
    match result {
        Err(SalesError::SchemaError(msg)) => assert!(msg.contains("Week")),
        other => panic!("Expected SchemaError, got {:?}", other),
    }
}

#[test]
fn test_monthly_sales_without_month_column() {
    let raw = records_to_dataframe(&sample_records()).unwrap();
    let result = monthly_sales(&SalesTable::from_dataframe(raw));
    assert!(matches!(result, Err(SalesError::SchemaError(_))));
}

fn run_aggregate(name: &str, table: &SalesTable) -> Result<(), SalesError> {
    match name {
        "monthly" => monthly_sales(table).map(|_| ()),
        "weekly" => weekly_sales(table).map(|_| ()),
        "price_payment" => price_payment_analysis(table).map(|_| ()),
        "product_preference" => product_preference_customer_type(table).map(|_| ()),
        other => panic!("unknown aggregate {}", other),
    }
}

#[rstest]
#[case("monthly", "Branch")]
#[case("weekly", "Total")]
#[case("price_payment", "Payment")]
#[case("price_payment", "Unit price")]
#[case("product_preference", "Customer type")]
#[case("product_preference", "Product line")]
fn test_aggregate_missing_column(#[case] aggregate: &str, #[case] column: &str) {
    let full = canonical(&sample_records());
    let table = SalesTable::from_dataframe(full.dataframe().drop(column).unwrap());

    match run_aggregate(aggregate, &table) {
        Err(SalesError::SchemaError(msg)) => assert!(msg.contains(column)),
        other => panic!("Expected SchemaError, got {:?}", other),
    }
}

#[test]
fn test_price_payment_is_unweighted_mean() {
    let records = sample_records();
    let rows = price_payment_analysis(&canonical(&records)).unwrap();

    let by_key: BTreeMap<(String, String), f64> = rows
        .iter()
        .map(|r| ((r.product_line.clone(), r.payment.clone()), r.unit_price))
        .collect();
    assert_eq!(by_key.len(), rows.len());

    // Food/Cash rows: 10.0, 16.0, 7.0 (totals differ, weights do not)
    assert_abs_diff_eq!(by_key[&("Food".to_string(), "Cash".to_string())], 11.0);
    assert_abs_diff_eq!(by_key[&("Food".to_string(), "Credit card".to_string())], 14.0);
    assert_abs_diff_eq!(by_key[&("Sports".to_string(), "Cash".to_string())], 30.0);
    assert_abs_diff_eq!(by_key[&("Sports".to_string(), "Ewallet".to_string())], 50.0);
    assert_abs_diff_eq!(by_key[&("Health".to_string(), "Ewallet".to_string())], 22.5);
}

#[test]
fn test_product_preference_sums() {
    let records = sample_records();
    let rows = product_preference_customer_type(&canonical(&records)).unwrap();

    let by_key: BTreeMap<(String, String), f64> = rows
        .iter()
        .map(|r| ((r.product_line.clone(), r.customer_type.clone()), r.total))
        .collect();

    assert_eq!(by_key.len(), 5);
    assert_abs_diff_eq!(by_key[&("Food".to_string(), "Member".to_string())], 155.0);
    assert_abs_diff_eq!(by_key[&("Food".to_string(), "Normal".to_string())], 118.0);
    assert_abs_diff_eq!(by_key[&("Sports".to_string(), "Member".to_string())], 300.0);

    let sum: f64 = rows.iter().map(|r| r.total).sum();
    assert_abs_diff_eq!(sum, grand_total(&records), epsilon = 1e-9);
}

#[test]
fn test_aggregates_ignore_row_order() {
    let records = sample_records();
    let mut reversed = records.clone();
    reversed.reverse();

    let forward = canonical(&records);
    let backward = canonical(&reversed);

    assert_eq!(
        monthly_sales(&forward).unwrap(),
        monthly_sales(&backward).unwrap()
    );
    assert_eq!(
        weekly_sales(&forward).unwrap(),
        weekly_sales(&backward).unwrap()
    );
    assert_eq!(
        price_payment_analysis(&forward).unwrap(),
        price_payment_analysis(&backward).unwrap()
    );
    assert_eq!(
        product_preference_customer_type(&forward).unwrap(),
        product_preference_customer_type(&backward).unwrap()
    );
}

#[test]
fn test_price_payment_pivot() {
    let rows = price_payment_analysis(&canonical(&sample_records())).unwrap();
    let pivot = pivot_price_payment(&rows);

    assert_eq!(pivot.product_lines, vec!["Food", "Health", "Sports"]);
    assert_eq!(pivot.payments, vec!["Cash", "Credit card", "Ewallet"]);
    assert_eq!(pivot.get("Food", "Cash"), Some(11.0));
    assert_eq!(pivot.get("Health", "Cash"), None);
    assert_eq!(pivot.get("Toys", "Cash"), None);
}

#[test]
fn test_sales_distribution_counts_every_row() {
    let records = sample_records();
    let bins = sales_distribution(&canonical(&records), 4).unwrap();

    assert_eq!(bins.len(), 4);
    assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), records.len());
    assert_abs_diff_eq!(bins[0].lower, 35.0);
    assert_abs_diff_eq!(bins[3].upper, 500.0);
}

#[test]
fn test_sales_distribution_rejects_zero_bins() {
    let result = sales_distribution(&canonical(&sample_records()), 0);
    assert!(matches!(result, Err(SalesError::InvalidParameter(_))));
}
