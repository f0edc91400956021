//! Stage reporting for pipeline runs.
//!
//! A run walks through a fixed sequence of stages. Callers that want to show
//! progress (a dashboard spinner, a CLI status line) register a
//! [`ProgressReporter`] on the [`crate::PipelineBuilder`].

use serde::{Deserialize, Serialize};

/// Stages of a pipeline run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Reading and validating the source table
    Loading,
    /// Removing duplicates and imputing missing values
    Cleaning,
    /// Computing derived totals
    DerivingFeatures,
    /// Dropping rows outside valid ranges
    FilteringOutliers,
    /// Building typed booking records
    Materializing,
    /// Run finished successfully
    Complete,
    /// Run failed with an error
    Failed,
}

impl PipelineStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Data",
            Self::Cleaning => "Cleaning Data",
            Self::DerivingFeatures => "Deriving Features",
            Self::FilteringOutliers => "Filtering Outliers",
            Self::Materializing => "Building Records",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Whether the run ends at this stage.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

/// A stage transition with a short message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: PipelineStage,
    pub message: String,
    /// Rows in the working table when the update was emitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
}

impl ProgressUpdate {
    pub fn new(stage: PipelineStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
            rows: None,
        }
    }

    pub fn with_rows(stage: PipelineStage, rows: usize, message: impl Into<String>) -> Self {
        Self {
            rows: Some(rows),
            ..Self::new(stage, message)
        }
    }
}

/// Receives stage transitions during a pipeline run.
///
/// Implementations must be `Send + Sync` so a pipeline can be shared
/// across threads.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}
