//! Row-level cleaning of the validated booking table.
//!
//! Two operations, in order:
//! - exact duplicate rows are removed, keeping the first occurrence
//! - missing `children`, `country`, `agent` and `company` are imputed
//!
//! Imputation can make two rows equal (a missing country next to an explicit
//! `Unknown`), so duplicates are removed once more after filling.
//!
//! Nothing else is touched. Range checks live in [`crate::pipeline::outliers`].

mod imputation;

pub use imputation::{FillValue, IMPUTATION_RULES, Imputation, UNKNOWN_COUNTRY};

use crate::error::{Result, ResultExt};
use polars::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

/// What a cleaning pass changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleaningReport {
    pub duplicates_removed: usize,
    pub imputations: Vec<Imputation>,
}

impl CleaningReport {
    pub fn total_imputed(&self) -> usize {
        self.imputations.iter().map(|i| i.filled).sum()
    }
}

/// Deduplicates and imputes a validated booking frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataCleaner;

impl DataCleaner {
    pub fn new() -> Self {
        Self
    }

    /// Clean a validated frame. The input is not modified.
    pub fn clean(&self, df: &DataFrame) -> Result<(DataFrame, CleaningReport)> {
        info!("Cleaning {} rows...", df.height());
        let mut report = CleaningReport::default();

        let mut df = remove_duplicates(df, &mut report)?;

        for (column, fill_value) in IMPUTATION_RULES {
            let series = df.column(column)?.as_materialized_series().clone();
            let (filled_series, filled) = imputation::apply(&series, fill_value)
                .context(format!("While imputing '{column}'"))?;
            df.replace(column, filled_series)?;

            if filled > 0 {
                debug!("Imputed {} missing values in '{}'", filled, column);
            }
            report.imputations.push(Imputation {
                column: column.to_string(),
                fill_value,
                filled,
            });
        }

        if report.total_imputed() > 0 {
            df = remove_duplicates(&df, &mut report)?;
        }

        Ok((df, report))
    }
}

/// Keep-first removal of exact duplicate rows, added to the report's count.
fn remove_duplicates(df: &DataFrame, report: &mut CleaningReport) -> Result<DataFrame> {
    let before = df.height();
    let unique = df
        .unique_stable(None, UniqueKeepStrategy::First, None)
        .context("While removing duplicate bookings")?;

    let removed = before - unique.height();
    if removed > 0 {
        debug!("Removed {} duplicate rows", removed);
    } else {
        debug!("No duplicate rows found");
    }
    report.duplicates_removed += removed;
    Ok(unique)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{BookingRow, validated_frame};
    use crate::types::columns;
    use crate::utils::{f64_values, i64_values, string_values};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_exact_duplicates_keep_first_occurrence() {
        let rows = [
            BookingRow::city(100.0),
            BookingRow::resort(150.0),
            BookingRow::city(100.0),
            BookingRow::city(80.0),
        ];
        let (df, report) = DataCleaner::new().clean(&validated_frame(&rows)).unwrap();

        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(df.height(), 3);
        assert_eq!(
            f64_values(&df, columns::ADR).unwrap(),
            vec![Some(100.0), Some(150.0), Some(80.0)]
        );
    }

    #[test]
    fn test_rows_differing_in_one_field_are_kept() {
        let rows = [
            BookingRow::city(100.0),
            BookingRow {
                lead_time: Some(31),
                ..BookingRow::city(100.0)
            },
        ];
        let (df, report) = DataCleaner::new().clean(&validated_frame(&rows)).unwrap();

        assert_eq!(report.duplicates_removed, 0);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_imputes_fixed_columns() {
        let row = BookingRow {
            children: None,
            country: None,
            agent: None,
            company: None,
            ..BookingRow::city(100.0)
        };
        let (df, report) = DataCleaner::new()
            .clean(&validated_frame(&[row, BookingRow::resort(90.0)]))
            .unwrap();

        assert_eq!(i64_values(&df, columns::CHILDREN).unwrap(), vec![Some(0), Some(0)]);
        assert_eq!(i64_values(&df, columns::AGENT).unwrap(), vec![Some(0), Some(240)]);
        assert_eq!(i64_values(&df, columns::COMPANY).unwrap(), vec![Some(0), Some(0)]);
        assert_eq!(
            string_values(&df, columns::COUNTRY).unwrap(),
            vec![Some("Unknown".to_string()), Some("GBR".to_string())]
        );
        assert_eq!(report.total_imputed(), 4);
    }

    #[test]
    fn test_other_missing_values_pass_through() {
        let row = BookingRow {
            meal: None,
            lead_time: None,
            ..BookingRow::city(100.0)
        };
        let (df, _) = DataCleaner::new().clean(&validated_frame(&[row])).unwrap();

        assert_eq!(df.column(columns::MEAL).unwrap().null_count(), 1);
        assert_eq!(df.column(columns::LEAD_TIME).unwrap().null_count(), 1);
    }

    #[test]
    fn test_rows_equal_after_imputation_are_deduplicated() {
        let rows = [
            BookingRow {
                country: None,
                ..BookingRow::city(100.0)
            },
            BookingRow {
                country: Some(UNKNOWN_COUNTRY),
                ..BookingRow::city(100.0)
            },
            BookingRow {
                agent: None,
                ..BookingRow::resort(150.0)
            },
            BookingRow {
                agent: Some(0),
                ..BookingRow::resort(150.0)
            },
        ];
        let cleaner = DataCleaner::new();
        let (once, report) = cleaner.clean(&validated_frame(&rows)).unwrap();

        assert_eq!(report.duplicates_removed, 2);
        assert_eq!(once.height(), 2);
        assert_eq!(
            string_values(&once, columns::COUNTRY).unwrap()[0],
            Some(UNKNOWN_COUNTRY.to_string())
        );

        let (twice, rerun) = cleaner.clean(&once).unwrap();
        assert!(once.equals_missing(&twice));
        assert_eq!(rerun.duplicates_removed, 0);
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let rows = [
            BookingRow {
                country: None,
                ..BookingRow::city(100.0)
            },
            BookingRow {
                country: None,
                ..BookingRow::city(100.0)
            },
            BookingRow::resort(150.0),
        ];
        let cleaner = DataCleaner::new();
        let (once, _) = cleaner.clean(&validated_frame(&rows)).unwrap();
        let (twice, report) = cleaner.clean(&once).unwrap();

        assert!(once.equals_missing(&twice));
        assert_eq!(report.duplicates_removed, 0);
        assert_eq!(report.total_imputed(), 0);
    }
}
