//! CLI entry point for the hotel booking pipeline.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use hotel_demand::aggregate::MetricValue;
use hotel_demand::config::DEFAULT_SOURCE_PATH;
use hotel_demand::{
    CleanedDataset, DerivedStatistics, Hotel, Month, Pipeline, PipelineConfig, ReportWriter,
    StatisticsReport, ViewFilter, metrics,
};
use std::process::ExitCode;
use tracing::{error, info};

/// CLI-compatible hotel type
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliHotel {
    /// City Hotel
    City,
    /// Resort Hotel
    Resort,
}

impl From<CliHotel> for Hotel {
    fn from(cli: CliHotel) -> Self {
        match cli {
            CliHotel::City => Hotel::CityHotel,
            CliHotel::Resort => Hotel::ResortHotel,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Hotel booking cleaning and statistics pipeline",
    long_about = "Cleans a hotel booking table, derives stay/guest/revenue totals and \
                  computes descriptive statistics over an optional hotel/year/month view.\n\n\
                  EXAMPLES:\n  \
                  # Summary over the whole dataset\n  \
                  hotel-demand -i data/hotel_bookings.csv\n\n  \
                  # City hotel arrivals in summer 2016, as JSON\n  \
                  hotel-demand --hotel city --year 2016 --month July --month August --json\n\n  \
                  # Export the cleaned dataset and statistics\n  \
                  hotel-demand -o outputs/"
)]
struct Args {
    /// Path to the booking CSV file
    #[arg(short, long, default_value = DEFAULT_SOURCE_PATH)]
    input: String,

    /// Restrict the view to a hotel type (repeatable)
    #[arg(long, value_enum)]
    hotel: Vec<CliHotel>,

    /// Restrict the view to an arrival year (repeatable)
    #[arg(long)]
    year: Vec<i64>,

    /// Restrict the view to an arrival month, full English name (repeatable)
    #[arg(long)]
    month: Vec<String>,

    /// Number of countries in the top-countries ranking
    #[arg(long, default_value = "10")]
    top_n: usize,

    /// Write cleaned_bookings.csv and statistics.json to this directory
    #[arg(short, long)]
    output: Option<String>,

    /// Output the statistics as JSON on stdout
    ///
    /// Disables all logging; only the JSON document is written.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Pipeline failed: {e}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config_builder = PipelineConfig::builder()
        .source_path(&args.input)
        .top_n(args.top_n);
    if let Some(ref output) = args.output {
        config_builder = config_builder.output_dir(output);
    }
    let config = config_builder.build()?;

    let filter = build_filter(args)?;

    let dataset = Pipeline::builder()
        .config(config.clone())
        .on_progress(|update| info!("[{}] {}", update.stage.display_name(), update.message))
        .build()?
        .run()?;

    let view = filter.apply(&dataset);
    let stats = DerivedStatistics::compute(&view, &config.statistics_options());
    let report = StatisticsReport::new(&args.input, &filter, dataset.summary(), &stats);

    if let Some(ref output_dir) = config.output_dir {
        let writer = ReportWriter::new(output_dir);
        writer
            .write_dataset(&dataset)
            .context("Failed to export cleaned dataset")?;
        writer
            .write_statistics(&report)
            .context("Failed to export statistics")?;
    }

    if args.json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    print_human_readable_summary(&dataset, &stats);
    Ok(())
}

fn build_filter(args: &Args) -> Result<ViewFilter> {
    let mut filter = ViewFilter::all();
    if !args.hotel.is_empty() {
        filter = filter.hotels(args.hotel.iter().map(|h| Hotel::from(*h)));
    }
    if !args.year.is_empty() {
        filter = filter.years(args.year.iter().copied());
    }
    if !args.month.is_empty() {
        let months = args
            .month
            .iter()
            .map(|name| {
                Month::from_name(name).ok_or_else(|| anyhow!("Unknown month name: {name}"))
            })
            .collect::<Result<Vec<_>>>()?;
        filter = filter.months(months);
    }
    Ok(filter)
}

/// Print a human-readable summary.
///
/// Uses `println!` intentionally: this is the primary output of the command
/// and should be visible regardless of log level.
fn print_human_readable_summary(dataset: &CleanedDataset, stats: &DerivedStatistics) {
    let summary = dataset.summary();

    println!("\n{}", "=".repeat(60));
    println!("HOTEL BOOKING SUMMARY");
    println!("{}\n", "=".repeat(60));

    println!("CLEANING");
    println!("{}", "-".repeat(40));
    println!("  Rows loaded:        {}", summary.rows_loaded);
    println!("  Duplicates removed: {}", summary.duplicates_removed);
    println!("  Values imputed:     {}", summary.values_imputed());
    println!("  Outliers removed:   {}", summary.outliers_removed());
    println!("  Rows retained:      {}", summary.rows_retained);
    println!();

    println!("VIEW STATISTICS");
    println!("{}", "-".repeat(40));
    let count = |name| stats.count(name).unwrap_or(0);
    let scalar = |name| format_number(stats.scalar(name).unwrap_or(f64::NAN));
    println!("  Bookings:           {}", count(metrics::TOTAL_BOOKINGS));
    println!("    City Hotel:       {}", count(metrics::CITY_HOTEL_BOOKINGS));
    println!("    Resort Hotel:     {}", count(metrics::RESORT_HOTEL_BOOKINGS));
    println!("  Cancellation rate:  {}", scalar(metrics::CANCELLATION_RATE));
    println!("  Avg price (ADR):    {}", scalar(metrics::AVG_PRICE));
    println!("  Avg stay (nights):  {}", scalar(metrics::AVG_STAY));
    println!("  Avg adults:         {}", scalar(metrics::AVG_ADULTS));
    println!("  Total revenue:      {}", scalar(metrics::TOTAL_REVENUE));
    if let Some(MetricValue::Label(Some(month))) = stats.get(metrics::BUSIEST_MONTH) {
        println!("  Busiest month:      {month}");
    }
    println!();

    if let Some(MetricValue::Ranking(countries)) = stats.get(metrics::TOP_COUNTRIES)
        && !countries.is_empty()
    {
        println!("TOP COUNTRIES");
        println!("{}", "-".repeat(40));
        for entry in countries {
            println!("  {:<8} {}", entry.value, entry.count);
        }
        println!();
    }
}

fn format_number(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}")
    } else {
        "n/a".to_string()
    }
}
