//! Pipeline module.
//!
//! Composes ingestion, cleaning, feature derivation and the range filter into
//! one operation returning a [`CleanedDataset`].

mod builder;
mod dataset;
pub mod outliers;
pub mod progress;
mod summary;

pub use builder::{Pipeline, PipelineBuilder};
pub use dataset::CleanedDataset;
pub use outliers::{ADR_MAX, ADR_MIN, OutlierFilter, OutlierReport};
pub use progress::{ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate};
pub use summary::CleaningSummary;
