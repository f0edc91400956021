//! Equal-width histograms over numeric fields.

use crate::filter::DatasetView;
use crate::types::NumericField;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Distribution of one numeric field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub field: NumericField,
    /// Exclusive upper bound applied before binning, if any.
    pub ceiling: Option<f64>,
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Number of values that landed in a bin.
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Bin `values` into `bins` equal-width intervals spanning min..=max.
///
/// The last interval is closed so the maximum is counted. An empty input has
/// no bins; an input whose values are all equal has one.
pub fn build_bins(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let (Some(min), Some(max)) = (
        finite.iter().copied().reduce(f64::min),
        finite.iter().copied().reduce(f64::max),
    ) else {
        return Vec::new();
    };

    if (max - min).abs() < f64::EPSILON || bins <= 1 {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: finite.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for value in &finite {
        let index = (((value - min) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(idx, count)| HistogramBin {
            start: min + idx as f64 * width,
            end: min + (idx as f64 + 1.0) * width,
            count,
        })
        .collect()
}

/// Histogram of `field` over the view. With a `ceiling`, values at or above
/// it are left out.
pub fn histogram(
    view: &DatasetView<'_>,
    field: NumericField,
    bins: usize,
    ceiling: Option<f64>,
) -> Histogram {
    let values: Vec<f64> = view
        .iter()
        .filter_map(|r| r.numeric(field))
        .filter(|v| ceiling.is_none_or(|c| *v < c))
        .collect();

    Histogram {
        field,
        ceiling,
        bins: build_bins(&values, bins),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;
    use crate::types::Hotel;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bins_cover_range() {
        let bins = build_bins(&[0.0, 1.0, 2.0, 3.0, 4.0], 4);

        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[3].end, 4.0);
        let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 1, 2]);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(build_bins(&[], 10).is_empty());
        assert_eq!(
            build_bins(&[7.0, 7.0, 7.0], 10),
            vec![HistogramBin {
                start: 7.0,
                end: 7.0,
                count: 3
            }]
        );
    }

    #[test]
    fn test_ceiling_is_exclusive() {
        let records = [
            record(Hotel::CityHotel, 100.0, false),
            record(Hotel::CityHotel, 300.0, false),
            record(Hotel::ResortHotel, 500.0, false),
            record(Hotel::ResortHotel, 900.0, false),
        ];
        let view = DatasetView::from_records(&records);
        let capped = histogram(&view, NumericField::Adr, 5, Some(500.0));
        let full = histogram(&view, NumericField::Adr, 5, None);

        assert_eq!(capped.total(), 2);
        assert_eq!(full.total(), 4);
        assert_eq!(full.bins.last().map(|b| b.end), Some(900.0));
    }
}
