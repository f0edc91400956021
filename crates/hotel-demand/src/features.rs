//! Derived booking features.
//!
//! | column          | definition                                  | dtype   |
//! |-----------------|---------------------------------------------|---------|
//! | `total_stay`    | weekend nights + week nights                | Int64   |
//! | `total_people`  | adults + children + babies                  | Int64   |
//! | `total_revenue` | adr * total_stay                            | Float64 |
//!
//! A missing operand, or a sum that overflows, gives a missing result.
//! Negative operands are summed as-is; rows with non-positive or missing
//! totals are removed by the outlier filter.

use crate::error::{Result, ResultExt};
use crate::types::columns;
use crate::utils::{f64_values, i64_values};
use polars::prelude::*;
use tracing::debug;

/// Names of the columns added by [`FeatureDeriver`].
pub const DERIVED_COLUMNS: [&str; 3] = [
    columns::TOTAL_STAY,
    columns::TOTAL_PEOPLE,
    columns::TOTAL_REVENUE,
];

#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureDeriver;

impl FeatureDeriver {
    pub fn new() -> Self {
        Self
    }

    /// Add (or recompute) the derived columns.
    pub fn derive(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut df = df.clone();

        let weekend = i64_values(&df, columns::WEEKEND_NIGHTS)?;
        let week = i64_values(&df, columns::WEEK_NIGHTS)?;
        let total_stay: Vec<Option<i64>> = weekend
            .iter()
            .zip(&week)
            .map(|(a, b)| (*a)?.checked_add((*b)?))
            .collect();

        let adults = i64_values(&df, columns::ADULTS)?;
        let children = i64_values(&df, columns::CHILDREN)?;
        let babies = i64_values(&df, columns::BABIES)?;
        let total_people: Vec<Option<i64>> = adults
            .iter()
            .zip(&children)
            .zip(&babies)
            .map(|((a, c), b)| (*a)?.checked_add((*c)?)?.checked_add((*b)?))
            .collect();

        let adr = f64_values(&df, columns::ADR)?;
        let total_revenue: Vec<Option<f64>> = adr
            .iter()
            .zip(&total_stay)
            .map(|(price, nights)| Some((*price)? * (*nights)? as f64))
            .collect();

        let missing = total_stay.iter().filter(|v| v.is_none()).count()
            + total_people.iter().filter(|v| v.is_none()).count();
        if missing > 0 {
            debug!("{} derived totals are missing (missing operand or overflow)", missing);
        }

        df.with_column(Series::new(columns::TOTAL_STAY.into(), total_stay))
            .context("While deriving total_stay")?;
        df.with_column(Series::new(columns::TOTAL_PEOPLE.into(), total_people))
            .context("While deriving total_people")?;
        df.with_column(Series::new(columns::TOTAL_REVENUE.into(), total_revenue))
            .context("While deriving total_revenue")?;

        Ok(df)
    }
}
