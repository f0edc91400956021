//! The booking pipeline and its builder.
//!
//! Every caller (CLI, dashboard backend, report generator) goes through
//! [`Pipeline`]; the cleaning stages are never re-implemented downstream.

use crate::cache::{DatasetCache, SourceKey};
use crate::cleaner::DataCleaner;
use crate::config::{ConfigValidationError, PipelineConfig};
use crate::error::{Result, ResultExt};
use crate::features::FeatureDeriver;
use crate::ingest::{self, DatasetInfo, schema};
use crate::pipeline::dataset::CleanedDataset;
use crate::pipeline::outliers::OutlierFilter;
use crate::pipeline::progress::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate,
};
use crate::pipeline::summary::CleaningSummary;
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Ingest → clean → derive → filter, producing a [`CleanedDataset`].
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use hotel_demand::{Pipeline, PipelineConfig};
///
/// let dataset = Pipeline::builder()
///     .config(PipelineConfig::builder().source_path("data/hotel_bookings.csv").build()?)
///     .on_progress(|update| println!("{}", update.stage.display_name()))
///     .build()?
///     .run()?;
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cleaner: DataCleaner,
    deriver: FeatureDeriver,
    outlier_filter: OutlierFilter,
}

static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run against the configured source.
    ///
    /// Goes through [`DatasetCache::global()`] unless caching is disabled in
    /// the configuration.
    pub fn run(&self) -> Result<Arc<CleanedDataset>> {
        if self.config.use_cache {
            self.run_with_cache(DatasetCache::global())
        } else {
            self.run_uncached().map(Arc::new)
        }
    }

    /// Run against the configured source, memoized in `cache`.
    pub fn run_with_cache(&self, cache: &DatasetCache) -> Result<Arc<CleanedDataset>> {
        let path = &self.config.source_path;
        let bytes = ingest::read_source(path)?;
        let key = SourceKey::new(path, &bytes)?;
        cache.get_or_try_insert_with(key, || {
            self.process_bytes(&bytes, &path.display().to_string())
        })
    }

    /// Run against the configured source, bypassing any cache.
    pub fn run_uncached(&self) -> Result<CleanedDataset> {
        let path = &self.config.source_path;
        let bytes = ingest::read_source(path)?;
        self.process_bytes(&bytes, &path.display().to_string())
    }

    /// Run on in-memory CSV content. `source_name` only feeds diagnostics.
    pub fn process_bytes(&self, bytes: &[u8], source_name: &str) -> Result<CleanedDataset> {
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Loading,
            format!("Loading {source_name}"),
        ));
        let result = ingest::parse_csv(bytes, source_name, self.config.infer_schema_length)
            .and_then(|df| self.process_internal(df));
        self.finish(result)
    }

    /// Run on a frame as produced by the CSV reader.
    pub fn process_frame(&self, df: DataFrame) -> Result<CleanedDataset> {
        self.report_progress(ProgressUpdate::with_rows(
            PipelineStage::Loading,
            df.height(),
            "Validating in-memory table",
        ));
        let result = self.process_internal(df);
        self.finish(result)
    }

    /// Clean a raw frame with the default pipeline.
    pub fn clean_frame(df: DataFrame) -> Result<CleanedDataset> {
        Self::builder().build()?.process_frame(df)
    }

    fn finish(&self, result: Result<CleanedDataset>) -> Result<CleanedDataset> {
        match result {
            Ok(dataset) => {
                self.report_progress(ProgressUpdate::with_rows(
                    PipelineStage::Complete,
                    dataset.len(),
                    "Pipeline completed successfully",
                ));
                Ok(dataset)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::new(PipelineStage::Failed, e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn process_internal(&self, df: DataFrame) -> Result<CleanedDataset> {
        let start_time = Instant::now();
        info!("Starting booking pipeline on {} rows...", df.height());

        // Step 1: Schema validation
        let df = schema::validate(df)?;
        let input = DatasetInfo::from_frame(&df);
        if input.rows == 0 {
            warn!("Source table has a header but no rows");
        }

        // Step 2: Deduplication and imputation
        self.report_progress(ProgressUpdate::with_rows(
            PipelineStage::Cleaning,
            df.height(),
            "Removing duplicates and imputing missing values...",
        ));
        info!("Step 2: Cleaning...");
        let (df, cleaning) = self.cleaner.clean(&df).context("While cleaning bookings")?;

        // Step 3: Derived totals
        self.report_progress(ProgressUpdate::with_rows(
            PipelineStage::DerivingFeatures,
            df.height(),
            "Deriving stay, party size and revenue...",
        ));
        info!("Step 3: Deriving features...");
        let df = self.deriver.derive(&df)?;

        // Step 4: Range filter
        self.report_progress(ProgressUpdate::with_rows(
            PipelineStage::FilteringOutliers,
            df.height(),
            "Dropping rows outside valid ranges...",
        ));
        info!("Step 4: Filtering outliers...");
        let (df, outliers) = self.outlier_filter.filter(&df)?;

        // Step 5: Typed records
        self.report_progress(ProgressUpdate::with_rows(
            PipelineStage::Materializing,
            df.height(),
            "Building booking records...",
        ));
        let rows_retained = df.height();
        let duration_ms = start_time.elapsed().as_millis() as u64;
        let summary = CleaningSummary::new(input, cleaning, outliers, rows_retained, duration_ms);
        let dataset = CleanedDataset::from_frame(df, summary)?;

        let summary = dataset.summary();
        info!(
            "Pipeline finished: {} of {} rows retained ({} duplicates, {} out of range) in {}ms",
            summary.rows_retained,
            summary.rows_loaded,
            summary.duplicates_removed,
            summary.outliers_removed(),
            summary.duration_ms
        );
        if summary.rows_loaded > 0 && summary.retention_rate() < 0.5 {
            warn!(
                "High data loss: only {:.1}% of rows were retained",
                summary.retention_rate() * 100.0
            );
        }

        Ok(dataset)
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving stage transitions.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
            cleaner: DataCleaner::new(),
            deriver: FeatureDeriver::new(),
            outlier_filter: OutlierFilter::new(),
        })
    }
}
