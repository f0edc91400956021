use crate::aggregate::DerivedStatistics;
use crate::error::{Result, ResultExt};
use crate::filter::ViewFilter;
use crate::pipeline::{CleanedDataset, CleaningSummary};
use chrono::Local;
use polars::prelude::*;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CLEANED_DATASET_FILE: &str = "cleaned_bookings.csv";
pub const STATISTICS_FILE: &str = "statistics.json";

/// Everything `statistics.json` holds.
#[derive(Debug, Serialize)]
pub struct StatisticsReport<'a> {
    pub generated_at: String,
    pub source: String,
    pub filter: &'a ViewFilter,
    pub cleaning: &'a CleaningSummary,
    pub statistics: &'a DerivedStatistics,
}

impl<'a> StatisticsReport<'a> {
    pub fn new(
        source: impl Into<String>,
        filter: &'a ViewFilter,
        cleaning: &'a CleaningSummary,
        statistics: &'a DerivedStatistics,
    ) -> Self {
        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            source: source.into(),
            filter,
            cleaning,
            statistics,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Writes export files into one output directory, creating it on demand.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the cleaned frame, derived columns included, as CSV.
    pub fn write_dataset(&self, dataset: &CleanedDataset) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let output_path = self.output_dir.join(CLEANED_DATASET_FILE);
        let mut file = File::create(&output_path)?;

        let mut frame = dataset.frame().clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(&mut frame)
            .context(format!("Failed to write {}", output_path.display()))?;

        info!(
            "Cleaned dataset saved: {} ({} rows)",
            output_path.display(),
            frame.height()
        );
        Ok(output_path)
    }

    pub fn write_statistics(&self, report: &StatisticsReport<'_>) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let output_path = self.output_dir.join(STATISTICS_FILE);
        let mut file = File::create(&output_path)?;
        file.write_all(report.to_json()?.as_bytes())?;

        info!("Statistics saved: {}", output_path.display());
        Ok(output_path)
    }
}
