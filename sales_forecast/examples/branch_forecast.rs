use sales_forecast::{PipelineConfig, RawRecord, RecordsLoader, SalesPipeline};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Sales Forecast: Branch Forecast Example");
    println!("=======================================\n");

    let records = create_sample_records();
    println!("Sample data created: {} transactions\n", records.len());

    let pipeline = SalesPipeline::new(PipelineConfig::default())?;
    let report = pipeline.run(&RecordsLoader::new(records))?;

    println!("Monthly totals per branch:");
    for row in &report.monthly {
        println!("  {} {}: {:.2}", row.branch, row.month.format("%Y-%m"), row.total);
    }

    println!("\n3-month forecast:");
    for point in &report.forecast_only {
        println!(
            "  {} {}: {:.2}",
            point.branch,
            point.month.format("%Y-%m"),
            point.total
        );
    }

    Ok(())
}

fn create_sample_records() -> Vec<RawRecord> {
    let branches = ["A", "B", "C"];
    let product_lines = ["Food and beverages", "Health and beauty", "Sports and travel"];
    let payments = ["Cash", "Credit card", "Ewallet"];
    let customer_types = ["Member", "Normal"];

    let mut records = Vec::new();
    for month in 1..=6u32 {
        for day in [3u32, 11, 19, 27] {
            for (b, branch) in branches.iter().enumerate() {
                let i = (month + day) as usize + b;
                let unit_price = 10.0 + (i % 7) as f64 * 4.5;
                let quantity = 1 + (i % 5) as u32;
                // Branches grow at different rates
                let growth = 1.0 + month as f64 * (0.05 + b as f64 * 0.03);
                records.push(RawRecord::new(
                    &format!("{:02}/{:02}/2023", month, day),
                    branch,
                    product_lines[i % product_lines.len()],
                    payments[i % payments.len()],
                    customer_types[i % customer_types.len()],
                    unit_price,
                    unit_price * quantity as f64 * growth,
                ));
            }
        }
    }
    records
}
