//! Shared frame and series helpers.
//!
//! Everything here addresses columns by name; nothing depends on column
//! position in the source file.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Whether a column's dtype can be cast losslessly into a number column.
///
/// `Null` shows up for columns that are entirely missing in the source.
#[inline]
pub fn is_castable_to_number(dtype: &DataType) -> bool {
    is_numeric_dtype(dtype) || matches!(dtype, DataType::Boolean | DataType::Null)
}

/// Check whether a frame has a column with the given name.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

// =============================================================================
// Column Extraction
// =============================================================================

/// Collect a numeric column as `f64` values, keeping missing entries.
pub fn f64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}

/// Collect an integer column as `i64` values, keeping missing entries.
pub fn i64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<i64>>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Int64)?;
    Ok(series.i64()?.into_iter().collect())
}

/// Collect a text column as owned strings, keeping missing entries.
pub fn string_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill missing entries of an integer column with `fill_value`.
///
/// Returns the filled Int64 series and the number of entries filled.
pub fn fill_integer_nulls(series: &Series, fill_value: i64) -> PolarsResult<(Series, usize)> {
    let cast = series.cast(&DataType::Int64)?;
    let mut filled = 0;
    let values: Vec<i64> = cast
        .i64()?
        .into_iter()
        .map(|v| {
            v.unwrap_or_else(|| {
                filled += 1;
                fill_value
            })
        })
        .collect();

    Ok((Series::new(series.name().clone(), values), filled))
}

/// Fill missing entries of a text column with `fill_value`.
///
/// Returns the filled String series and the number of entries filled.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<(Series, usize)> {
    let cast = series.cast(&DataType::String)?;
    let mut filled = 0;
    let values: Vec<String> = cast
        .str()?
        .into_iter()
        .map(|v| match v {
            Some(value) => value.to_string(),
            None => {
                filled += 1;
                fill_value.to_string()
            }
        })
        .collect();

    Ok((Series::new(series.name().clone(), values), filled))
}

// =============================================================================
// Tests
// =============================================================================
