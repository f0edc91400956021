//! Domain range filter.
//!
//! Rows are dropped, never corrected. A row survives only when
//! `ADR_MIN <= adr < ADR_MAX`, `total_people > 0` and `total_stay > 0`, all
//! three observed.

use crate::error::{Result, ResultExt};
use crate::types::columns;
use crate::utils::{f64_values, i64_values};
use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

/// Lowest accepted daily rate (inclusive).
pub const ADR_MIN: f64 = 0.0;
/// Daily rate ceiling (exclusive).
pub const ADR_MAX: f64 = 10_000.0;

/// Rows removed per violated rule. A row violating several rules is counted
/// once, under the first rule it fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutlierReport {
    pub adr_out_of_range: usize,
    pub no_guests: usize,
    pub no_nights: usize,
}

impl OutlierReport {
    pub fn rows_removed(&self) -> usize {
        self.adr_out_of_range + self.no_guests + self.no_nights
    }
}

/// Removes rows outside the valid booking ranges.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlierFilter;

impl OutlierFilter {
    pub fn new() -> Self {
        Self
    }

    /// Whether a daily rate lies in the accepted range.
    #[inline]
    pub fn adr_in_range(adr: f64) -> bool {
        (ADR_MIN..ADR_MAX).contains(&adr)
    }

    /// Filter a frame that already carries the derived totals.
    pub fn filter(&self, df: &DataFrame) -> Result<(DataFrame, OutlierReport)> {
        let adr = f64_values(df, columns::ADR)?;
        let people = i64_values(df, columns::TOTAL_PEOPLE).context("Derived columns missing")?;
        let stay = i64_values(df, columns::TOTAL_STAY).context("Derived columns missing")?;

        let mut report = OutlierReport::default();
        let mut mask_values = Vec::with_capacity(df.height());

        for ((adr, people), stay) in adr.iter().zip(&people).zip(&stay) {
            let keep = if !adr.is_some_and(Self::adr_in_range) {
                report.adr_out_of_range += 1;
                false
            } else if !people.is_some_and(|p| p > 0) {
                report.no_guests += 1;
                false
            } else if !stay.is_some_and(|s| s > 0) {
                report.no_nights += 1;
                false
            } else {
                true
            };
            mask_values.push(keep);
        }

        let mask = BooleanChunked::from_slice("mask".into(), &mask_values);
        let filtered = df.filter(&mask)?;

        if report.rows_removed() > 0 {
            debug!(
                "Removed {} rows outside valid ranges (adr: {}, guests: {}, nights: {})",
                report.rows_removed(),
                report.adr_out_of_range,
                report.no_guests,
                report.no_nights
            );
        }

        Ok((filtered, report))
    }
}
