//! Per-run record of what the cleaning stages changed.

use crate::cleaner::{CleaningReport, Imputation};
use crate::ingest::DatasetInfo;
use crate::pipeline::outliers::OutlierReport;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleaningSummary {
    /// Shape and missing values of the validated input.
    pub input: DatasetInfo,
    pub rows_loaded: usize,
    pub duplicates_removed: usize,
    pub imputations: Vec<Imputation>,
    pub outliers: OutlierReport,
    pub rows_retained: usize,
    pub duration_ms: u64,
}

impl CleaningSummary {
    pub(crate) fn new(
        input: DatasetInfo,
        cleaning: CleaningReport,
        outliers: OutlierReport,
        rows_retained: usize,
        duration_ms: u64,
    ) -> Self {
        Self {
            rows_loaded: input.rows,
            input,
            duplicates_removed: cleaning.duplicates_removed,
            imputations: cleaning.imputations,
            outliers,
            rows_retained,
            duration_ms,
        }
    }

    pub fn outliers_removed(&self) -> usize {
        self.outliers.rows_removed()
    }

    pub fn values_imputed(&self) -> usize {
        self.imputations.iter().map(|i| i.filled).sum()
    }

    /// Share of loaded rows that made it into the cleaned dataset.
    pub fn retention_rate(&self) -> f64 {
        if self.rows_loaded == 0 {
            return f64::NAN;
        }
        self.rows_retained as f64 / self.rows_loaded as f64
    }
}
