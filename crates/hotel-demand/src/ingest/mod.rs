//! Ingestion of the raw booking table.
//!
//! The source is read into memory once, parsed as comma-separated text with a
//! header row, and validated against [`schema::REQUIRED_COLUMNS`]. Literal
//! `NULL` and `NA` tokens, as found in the public booking export, are read as
//! missing values.

pub mod schema;

use crate::error::{PipelineError, Result, SchemaError};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use serde::Serialize;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

pub use schema::{ColumnKind, ColumnSpec, REQUIRED_COLUMNS};

/// Tokens read as missing values in every column.
pub const NULL_TOKENS: [&str; 2] = ["NULL", "NA"];

/// Read the raw bytes of a source file.
///
/// A missing or unreadable file is a [`PipelineError::DataLoad`].
pub fn read_source(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| PipelineError::data_load(path.display().to_string(), e))
}

/// Parse CSV bytes into a frame without validating the schema.
///
/// `source_name` only feeds diagnostics. With `infer_schema_length` set to
/// `None` the whole input is scanned to infer column types. A value that does
/// not fit the type inferred from earlier rows is a
/// [`SchemaError::IncompatibleType`]; any other reader failure is a
/// [`PipelineError::DataLoad`].
pub fn parse_csv(
    bytes: &[u8],
    source_name: &str,
    infer_schema_length: Option<usize>,
) -> Result<DataFrame> {
    let null_values = NullValues::AllColumns(NULL_TOKENS.iter().map(|t| (*t).into()).collect());

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_schema_length)
        .with_parse_options(
            CsvParseOptions::default()
                .with_quote_char(Some(b'"'))
                .with_null_values(Some(null_values)),
        )
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
        .map_err(|e| parse_error(source_name, e))
}

fn parse_error(source_name: &str, err: PolarsError) -> PipelineError {
    let mut root = &err;
    while let PolarsError::Context { error, .. } = root {
        root = error;
    }

    match root {
        PolarsError::ComputeError(msg) | PolarsError::SchemaMismatch(msg) => {
            let column = between(msg, "at column '", "'").unwrap_or("unknown");
            let found = match between(msg, "could not parse `", "`") {
                Some(value) => format!("unparsable value '{value}'"),
                None => msg.lines().next().unwrap_or_default().to_string(),
            };
            debug!("CSV reader rejected a value in '{column}': {msg}");
            SchemaError::IncompatibleType {
                column: column.to_string(),
                expected: expected_kind(column),
                found,
            }
            .into()
        }
        _ => PipelineError::data_load(source_name, &err),
    }
}

fn between<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let rest = &text[text.find(start)? + start.len()..];
    Some(&rest[..rest.find(end)?])
}

fn expected_kind(column: &str) -> &'static str {
    match REQUIRED_COLUMNS.iter().find(|spec| spec.name == column).map(|spec| &spec.kind) {
        Some(ColumnKind::Integer | ColumnKind::Flag) => "integer",
        Some(ColumnKind::Float) => "number",
        _ => "type inferred from earlier rows",
    }
}

/// Parse and validate booking CSV bytes.
pub fn load_bytes(
    bytes: &[u8],
    source_name: &str,
    infer_schema_length: Option<usize>,
) -> Result<DataFrame> {
    let df = parse_csv(bytes, source_name, infer_schema_length)?;
    debug!("Parsed {} rows x {} columns", df.height(), df.width());
    schema::validate(df)
}

/// Read, parse and validate a booking CSV file.
pub fn load_bookings(path: &Path, infer_schema_length: Option<usize>) -> Result<DataFrame> {
    info!("Loading bookings from: {}", path.display());
    let bytes = read_source(path)?;
    load_bytes(&bytes, &path.display().to_string(), infer_schema_length)
}

/// Shape and missing-value overview of an ingested table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetInfo {
    pub rows: usize,
    pub columns: usize,
    /// Columns with at least one missing value, in table order.
    pub missing_values: Vec<MissingValues>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingValues {
    pub column: String,
    pub count: usize,
    pub percentage: f64,
}

impl DatasetInfo {
    pub fn from_frame(df: &DataFrame) -> Self {
        let rows = df.height();
        let missing_values = df
            .get_columns()
            .iter()
            .filter(|col| col.null_count() > 0)
            .map(|col| {
                let count = col.null_count();
                MissingValues {
                    column: col.name().to_string(),
                    count,
                    percentage: count as f64 / rows as f64 * 100.0,
                }
            })
            .collect();

        Self {
            rows,
            columns: df.width(),
            missing_values,
        }
    }

    pub fn has_missing_values(&self) -> bool {
        !self.missing_values.is_empty()
    }
}
