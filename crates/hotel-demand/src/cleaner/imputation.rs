//! Fixed imputation rules for the booking table.

use crate::types::columns;
use crate::utils::{fill_integer_nulls, fill_string_nulls};
use polars::prelude::*;
use serde::Serialize;

/// Value written into a missing cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FillValue {
    Integer(i64),
    Text(&'static str),
}

/// Placeholder for bookings without a recorded country.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Columns that are imputed, and with what. Every other column keeps its
/// missing values.
pub const IMPUTATION_RULES: [(&str, FillValue); 4] = [
    (columns::CHILDREN, FillValue::Integer(0)),
    (columns::COUNTRY, FillValue::Text(UNKNOWN_COUNTRY)),
    // 0 reads as "booked without an agent / company"
    (columns::AGENT, FillValue::Integer(0)),
    (columns::COMPANY, FillValue::Integer(0)),
];

/// Number of cells filled in one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Imputation {
    pub column: String,
    pub fill_value: FillValue,
    pub filled: usize,
}

/// Apply a fill rule to one series.
pub(crate) fn apply(series: &Series, fill: FillValue) -> PolarsResult<(Series, usize)> {
    match fill {
        FillValue::Integer(value) => fill_integer_nulls(series, value),
        FillValue::Text(value) => fill_string_nulls(series, value),
    }
}
