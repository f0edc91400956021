//! Booking table schema: required columns and their value domains.
//!
//! Validation runs before any cleaning. It rewrites every required column to
//! a canonical dtype (Int64, Float64 or String) so later stages can read
//! columns by name without re-checking types.

use crate::error::{Result, SchemaError};
use crate::types::{
    CustomerType, DepositType, DistributionChannel, Hotel, MarketSegment, Meal, Month,
    ReservationStatus, UnknownLabel, columns,
};
use crate::utils::{has_column, is_castable_to_number};
use chrono::NaiveDate;
use polars::prelude::*;
use std::str::FromStr;
use tracing::debug;

/// Date layout of `reservation_status_date`.
pub const STATUS_DATE_FORMAT: &str = "%Y-%m-%d";

/// Expected content of a column.
#[derive(Debug, Clone, Copy)]
pub enum ColumnKind {
    /// Whole numbers, stored as Int64.
    Integer,
    /// Floating point numbers, stored as Float64.
    Float,
    /// 0/1 flag, stored as Int64.
    Flag,
    /// Free-form text.
    Text,
    /// Text restricted to a closed domain.
    Category {
        expected: &'static str,
        accepts: fn(&str) -> bool,
    },
    /// Full English month name.
    MonthName,
    /// ISO calendar date.
    Date,
}

/// A required column of the booking table.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
    /// Key columns may not contain missing values.
    pub key: bool,
}

impl ColumnSpec {
    const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            kind,
            key: false,
        }
    }

    const fn key(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            kind,
            key: true,
        }
    }
}

fn accepts<T: FromStr<Err = UnknownLabel>>(value: &str) -> bool {
    value.parse::<T>().is_ok()
}

const fn category<T: FromStr<Err = UnknownLabel>>(expected: &'static str) -> ColumnKind {
    ColumnKind::Category {
        expected,
        accepts: accepts::<T>,
    }
}

/// Minimum column set consumed by the pipeline.
pub const REQUIRED_COLUMNS: [ColumnSpec; 26] = [
    ColumnSpec::key(columns::HOTEL, category::<Hotel>(Hotel::EXPECTED)),
    ColumnSpec::key(columns::ARRIVAL_YEAR, ColumnKind::Integer),
    ColumnSpec::key(columns::ARRIVAL_MONTH, ColumnKind::MonthName),
    ColumnSpec::new(columns::ARRIVAL_WEEK, ColumnKind::Integer),
    ColumnSpec::new(columns::WEEKEND_NIGHTS, ColumnKind::Integer),
    ColumnSpec::new(columns::WEEK_NIGHTS, ColumnKind::Integer),
    ColumnSpec::new(columns::ADULTS, ColumnKind::Integer),
    ColumnSpec::new(columns::CHILDREN, ColumnKind::Integer),
    ColumnSpec::new(columns::BABIES, ColumnKind::Integer),
    ColumnSpec::new(columns::COUNTRY, ColumnKind::Text),
    ColumnSpec::new(columns::AGENT, ColumnKind::Integer),
    ColumnSpec::new(columns::COMPANY, ColumnKind::Integer),
    ColumnSpec::new(columns::ADR, ColumnKind::Float),
    ColumnSpec::key(columns::IS_CANCELED, ColumnKind::Flag),
    ColumnSpec::new(columns::LEAD_TIME, ColumnKind::Integer),
    ColumnSpec::new(
        columns::CUSTOMER_TYPE,
        category::<CustomerType>(CustomerType::EXPECTED),
    ),
    ColumnSpec::new(
        columns::MARKET_SEGMENT,
        category::<MarketSegment>(MarketSegment::EXPECTED),
    ),
    ColumnSpec::new(
        columns::DEPOSIT_TYPE,
        category::<DepositType>(DepositType::EXPECTED),
    ),
    ColumnSpec::new(columns::MEAL, category::<Meal>(Meal::EXPECTED)),
    ColumnSpec::new(
        columns::DISTRIBUTION_CHANNEL,
        category::<DistributionChannel>(DistributionChannel::EXPECTED),
    ),
    ColumnSpec::new(columns::RESERVED_ROOM_TYPE, ColumnKind::Text),
    ColumnSpec::new(columns::ASSIGNED_ROOM_TYPE, ColumnKind::Text),
    ColumnSpec::new(columns::PARKING_SPACES, ColumnKind::Integer),
    ColumnSpec::new(columns::SPECIAL_REQUESTS, ColumnKind::Integer),
    ColumnSpec::new(
        columns::RESERVATION_STATUS,
        category::<ReservationStatus>(ReservationStatus::EXPECTED),
    ),
    ColumnSpec::new(columns::RESERVATION_STATUS_DATE, ColumnKind::Date),
];

/// Check that every required column is present and holds values of the
/// expected kind, and normalize those columns to canonical dtypes.
///
/// Columns outside [`REQUIRED_COLUMNS`] are left untouched.
pub fn validate(mut df: DataFrame) -> Result<DataFrame> {
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|spec| !has_column(&df, spec.name))
    {
        return Err(SchemaError::MissingColumn(missing.name.to_string()).into());
    }

    for spec in &REQUIRED_COLUMNS {
        let series = df.column(spec.name)?.as_materialized_series().clone();
        let normalized = normalize_column(&series, spec)?;
        df.replace(spec.name, normalized)?;
    }

    debug!(
        "Validated {} required columns over {} rows",
        REQUIRED_COLUMNS.len(),
        df.height()
    );
    Ok(df)
}

fn normalize_column(series: &Series, spec: &ColumnSpec) -> Result<Series> {
    let normalized = match spec.kind {
        ColumnKind::Float => {
            let values = numeric_values(series, spec.name)?;
            Series::new(spec.name.into(), values)
        }
        ColumnKind::Integer => {
            let values = integer_values(series, spec.name)?;
            Series::new(spec.name.into(), values)
        }
        ColumnKind::Flag => {
            let values = integer_values(series, spec.name)?;
            for (row, value) in values.iter().enumerate() {
                if let Some(v) = value
                    && !matches!(*v, 0 | 1)
                {
                    return Err(invalid_value(spec.name, row, v.to_string(), "0/1 flag"));
                }
            }
            Series::new(spec.name.into(), values)
        }
        ColumnKind::Text => series.cast(&DataType::String)?,
        ColumnKind::Category { expected, accepts } => {
            let text = series.cast(&DataType::String)?;
            for (row, value) in text.str()?.into_iter().enumerate() {
                if let Some(v) = value
                    && !accepts(v)
                {
                    return Err(invalid_value(spec.name, row, v, expected));
                }
            }
            text
        }
        ColumnKind::MonthName => {
            let text = series.cast(&DataType::String)?;
            for (row, value) in text.str()?.into_iter().enumerate() {
                if let Some(v) = value
                    && Month::from_name(v).is_none()
                {
                    return Err(SchemaError::UnknownMonth {
                        row: row + 1,
                        name: v.to_string(),
                    }
                    .into());
                }
            }
            text
        }
        ColumnKind::Date => {
            let text = series.cast(&DataType::String)?;
            for (row, value) in text.str()?.into_iter().enumerate() {
                if let Some(v) = value
                    && NaiveDate::parse_from_str(v, STATUS_DATE_FORMAT).is_err()
                {
                    return Err(invalid_value(spec.name, row, v, "YYYY-MM-DD date"));
                }
            }
            text
        }
    };

    if spec.key && normalized.null_count() > 0 {
        let nulls = normalized.is_null();
        let row = (&nulls)
            .into_iter()
            .position(|is_null| is_null.unwrap_or(false))
            .unwrap_or(0);
        return Err(SchemaError::MissingKeyValue {
            column: spec.name.to_string(),
            row: row + 1,
        }
        .into());
    }

    Ok(normalized)
}

/// Read a column as numbers. Text columns are parsed value by value so a
/// stray token is reported instead of silently becoming a missing value.
fn numeric_values(series: &Series, column: &str) -> Result<Vec<Option<f64>>> {
    let dtype = series.dtype();
    if is_castable_to_number(dtype) {
        let cast = series.cast(&DataType::Float64)?;
        return Ok(cast.f64()?.into_iter().collect());
    }

    if dtype != &DataType::String {
        return Err(SchemaError::IncompatibleType {
            column: column.to_string(),
            expected: "number",
            found: dtype.to_string(),
        }
        .into());
    }

    let mut values = Vec::with_capacity(series.len());
    for (row, value) in series.str()?.into_iter().enumerate() {
        let parsed = match value.map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<f64>()
                    .map_err(|_| invalid_value(column, row, raw, "number"))?,
            ),
        };
        values.push(parsed);
    }
    Ok(values)
}

fn integer_values(series: &Series, column: &str) -> Result<Vec<Option<i64>>> {
    numeric_values(series, column)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            None => Ok(None),
            Some(v) if v.is_finite() && v.fract() == 0.0 => Ok(Some(v as i64)),
            Some(v) => Err(invalid_value(column, row, v.to_string(), "integer")),
        })
        .collect()
}

fn invalid_value(
    column: &str,
    row: usize,
    value: impl Into<String>,
    expected: &'static str,
) -> crate::error::PipelineError {
    SchemaError::InvalidValue {
        column: column.to_string(),
        row: row + 1,
        value: value.into(),
        expected,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::test_support::{BookingRow, frame_from_rows};

    fn schema_error(result: Result<DataFrame>) -> SchemaError {
        match result {
            Err(PipelineError::Schema(err)) => err,
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_normalizes_dtypes() {
        let df = frame_from_rows(&[BookingRow::city(100.0), BookingRow::resort(150.0)]);
        let df = validate(df).unwrap();

        assert_eq!(df.column(columns::ADR).unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column(columns::ADULTS).unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column(columns::IS_CANCELED).unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column(columns::HOTEL).unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let df = frame_from_rows(&[BookingRow::city(100.0)]);
        let df = df.drop(columns::ADR).unwrap();

        assert_eq!(
            schema_error(validate(df)),
            SchemaError::MissingColumn("adr".to_string())
        );
    }

    #[test]
    fn test_non_numeric_adr_is_rejected() {
        let mut df = frame_from_rows(&[BookingRow::city(100.0), BookingRow::city(90.0)]);
        df.replace(
            columns::ADR,
            Series::new(columns::ADR.into(), &["100", "cheap"]),
        )
        .unwrap();

        match schema_error(validate(df)) {
            SchemaError::InvalidValue {
                column, row, value, ..
            } => {
                assert_eq!(column, "adr");
                assert_eq!(row, 2);
                assert_eq!(value, "cheap");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_month_is_rejected() {
        let row = BookingRow {
            month: "Juillet",
            ..BookingRow::city(100.0)
        };
        let df = frame_from_rows(&[row]);

        assert_eq!(
            schema_error(validate(df)),
            SchemaError::UnknownMonth {
                row: 1,
                name: "Juillet".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_hotel_label_is_rejected() {
        let row = BookingRow {
            hotel: "Motel",
            ..BookingRow::city(100.0)
        };
        let df = frame_from_rows(&[row]);

        assert!(matches!(
            schema_error(validate(df)),
            SchemaError::InvalidValue { expected: "hotel type", .. }
        ));
    }

    #[test]
    fn test_fractional_integer_is_rejected() {
        let mut df = frame_from_rows(&[BookingRow::city(100.0)]);
        df.replace(columns::ADULTS, Series::new(columns::ADULTS.into(), &[1.5f64]))
            .unwrap();

        assert!(matches!(
            schema_error(validate(df)),
            SchemaError::InvalidValue { expected: "integer", .. }
        ));
    }

    #[test]
    fn test_missing_values_pass_outside_key_columns() {
        let row = BookingRow {
            children: None,
            country: None,
            agent: None,
            company: None,
            meal: None,
            ..BookingRow::city(100.0)
        };
        let df = validate(frame_from_rows(&[row])).unwrap();

        assert_eq!(df.column(columns::CHILDREN).unwrap().null_count(), 1);
        assert_eq!(df.column(columns::MEAL).unwrap().null_count(), 1);
    }

    #[test]
    fn test_missing_key_value_is_rejected() {
        let mut df = frame_from_rows(&[BookingRow::city(100.0), BookingRow::city(80.0)]);
        df.replace(
            columns::IS_CANCELED,
            Series::new(columns::IS_CANCELED.into(), &[Some(0i64), None]),
        )
        .unwrap();

        assert_eq!(
            schema_error(validate(df)),
            SchemaError::MissingKeyValue {
                column: "is_canceled".to_string(),
                row: 2
            }
        );
    }
}
