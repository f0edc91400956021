//! Hotel Demand Library
//!
//! Cleaning, feature derivation and descriptive statistics for hotel booking
//! data, built with Rust and Polars.
//!
//! # Overview
//!
//! One shared pipeline turns the raw booking table into a canonical
//! [`CleanedDataset`]:
//!
//! - **Ingestion**: CSV parsing with `NULL`/`NA` tokens, schema validation and
//!   type normalization ([`ingest`])
//! - **Cleaning**: duplicate removal and fixed per-column imputation
//!   ([`DataCleaner`])
//! - **Feature derivation**: `total_stay`, `total_people`, `total_revenue`
//!   ([`FeatureDeriver`])
//! - **Outlier filtering**: domain-valid ranges for price, guests and nights
//!   ([`OutlierFilter`])
//!
//! Presentation layers then narrow the dataset with a [`ViewFilter`] and ask
//! the [`aggregate`] module for [`DerivedStatistics`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use hotel_demand::{DerivedStatistics, Hotel, Pipeline, PipelineConfig, ViewFilter};
//!
//! let config = PipelineConfig::builder()
//!     .source_path("data/hotel_bookings.csv")
//!     .build()?;
//!
//! let dataset = Pipeline::builder()
//!     .config(config.clone())
//!     .on_progress(|update| println!("[{}] {}", update.stage.display_name(), update.message))
//!     .build()?
//!     .run()?;
//!
//! let view = ViewFilter::all()
//!     .hotels([Hotel::CityHotel])
//!     .years([2016])
//!     .apply(&dataset);
//!
//! let stats = DerivedStatistics::compute(&view, &config.statistics_options());
//! println!("Cancellation rate: {:?}", stats.scalar("cancellation_rate"));
//! ```
//!
//! # Caching
//!
//! [`Pipeline::run`] memoizes datasets in the process-wide [`DatasetCache`],
//! keyed by the source path and a SHA-256 fingerprint of its content. Edits to
//! the source produce a new key and therefore a fresh run. Use
//! [`Pipeline::run_uncached`] to bypass the cache.

pub mod aggregate;
pub mod cache;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod features;
pub mod filter;
pub mod ingest;
pub mod pipeline;
pub mod reporting;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-exports for convenient access
pub use aggregate::{DerivedStatistics, MetricValue, StatisticsOptions, metrics};
pub use cache::{DatasetCache, SourceKey};
pub use cleaner::{CleaningReport, DataCleaner};
pub use config::{ConfigValidationError, PipelineConfig, PipelineConfigBuilder};
pub use error::{PipelineError, Result as PipelineResult, ResultExt, SchemaError};
pub use features::FeatureDeriver;
pub use filter::{DatasetView, Selection, ViewFilter};
pub use ingest::DatasetInfo;
pub use pipeline::{
    CleanedDataset, CleaningSummary, ClosureProgressReporter, OutlierFilter, Pipeline,
    PipelineBuilder, PipelineStage, ProgressReporter, ProgressUpdate,
};
pub use reporting::{ReportWriter, StatisticsReport};
pub use types::{BookingRecord, CategoricalField, Hotel, Month, NumericField};
