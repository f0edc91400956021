//! Pairwise Pearson correlation across numeric fields.
//!
//! Each pair is computed over the records where both fields are observed.
//! The diagonal is 1.0; a pair with fewer than two complete observations,
//! zero variance on either side, or that the Pearson test rejects is NaN.

use crate::filter::DatasetView;
use crate::types::NumericField;
use anofox_statistics::correlation;
use serde::Serialize;
use tracing::trace;

/// Fields of the dashboard correlation matrix.
pub const DASHBOARD_FIELDS: [NumericField; 13] = [
    NumericField::IsCanceled,
    NumericField::LeadTime,
    NumericField::ArrivalYear,
    NumericField::WeekendNights,
    NumericField::WeekNights,
    NumericField::Adults,
    NumericField::Children,
    NumericField::Babies,
    NumericField::Adr,
    NumericField::ParkingSpaces,
    NumericField::SpecialRequests,
    NumericField::TotalStay,
    NumericField::TotalPeople,
];

/// Raw source fields, used by the correlation heatmap.
pub const CHART_FIELDS: [NumericField; 12] = [
    NumericField::IsCanceled,
    NumericField::LeadTime,
    NumericField::ArrivalYear,
    NumericField::ArrivalWeek,
    NumericField::WeekendNights,
    NumericField::WeekNights,
    NumericField::Adults,
    NumericField::Children,
    NumericField::Babies,
    NumericField::Adr,
    NumericField::ParkingSpaces,
    NumericField::SpecialRequests,
];

/// Confidence level passed to the Pearson test; only the estimate is kept.
const CONFIDENCE_LEVEL: f64 = 0.95;

/// Pearson coefficient of two equally long samples.
///
/// NaN when the samples differ in length, hold fewer than two values, have
/// zero variance, or the test itself rejects them.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 || is_constant(x) || is_constant(y) {
        return f64::NAN;
    }

    match correlation::pearson(x, y, Some(CONFIDENCE_LEVEL)) {
        Ok(result) if result.estimate.is_finite() => result.estimate.clamp(-1.0, 1.0),
        Ok(_) => f64::NAN,
        Err(_) => {
            trace!("Pearson test rejected {} pairs", x.len());
            f64::NAN
        }
    }
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Symmetric correlation matrix in the order of `fields`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub fields: Vec<NumericField>,
    /// Column names, parallel to `fields`.
    pub labels: Vec<&'static str>,
    /// Row-major; `values[i][j]` is the coefficient of fields i and j.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row)?.get(col).copied()
    }

    /// Coefficient for a pair of fields, `None` if either is not in the matrix.
    pub fn value(&self, a: NumericField, b: NumericField) -> Option<f64> {
        let i = self.fields.iter().position(|f| *f == a)?;
        let j = self.fields.iter().position(|f| *f == b)?;
        self.get(i, j)
    }
}

/// Correlate every pair of `fields` over the view.
pub fn correlation_matrix(view: &DatasetView<'_>, fields: &[NumericField]) -> CorrelationMatrix {
    let columns: Vec<Vec<Option<f64>>> = fields
        .iter()
        .map(|field| view.iter().map(|r| r.numeric(*field)).collect())
        .collect();

    let n = fields.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let (x, y): (Vec<f64>, Vec<f64>) = columns[i]
                .iter()
                .zip(&columns[j])
                .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                .unzip();
            let r = pearson(&x, &y);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        fields: fields.to_vec(),
        labels: fields.iter().map(NumericField::column_name).collect(),
        values,
    }
}
