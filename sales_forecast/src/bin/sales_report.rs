use anyhow::Context;
use clap::{Parser, ValueEnum};
use sales_forecast::{CsvDataLoader, DegenerateFitPolicy, PipelineConfig, SalesPipeline};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Pretty-printed JSON bundle on stdout
    Json,
    /// Aligned text tables on stdout
    Text,
    /// One CSV file per table in --out-dir
    Csv,
}

#[derive(Parser)]
#[command(name = "sales_report")]
#[command(about = "Monthly/weekly sales summaries and per-branch forecasts from a POS export", long_about = None)]
struct Cli {
    /// Point-of-sale CSV export
    data: PathBuf,

    /// JSON pipeline configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Months to forecast per branch (overrides the config file)
    #[arg(long)]
    horizon: Option<usize>,

    /// Handling of branches with a single month of history (flat-line, error, skip)
    #[arg(long, value_parser = str::parse::<DegenerateFitPolicy>)]
    policy: Option<DegenerateFitPolicy>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Directory for --format csv
    #[arg(long, default_value = "sales_report")]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(horizon) = cli.horizon {
        config = config.with_horizon(horizon);
    }
    if let Some(policy) = cli.policy {
        config = config.with_degenerate_policy(policy);
    }

    let pipeline = SalesPipeline::new(config)?;
    let report = pipeline
        .run(&CsvDataLoader::new(&cli.data))
        .with_context(|| format!("analysing {}", cli.data.display()))?;

    match cli.format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => print!("{}", report),
        OutputFormat::Csv => report.write_csv_dir(&cli.out_dir)?,
    }

    Ok(())
}
