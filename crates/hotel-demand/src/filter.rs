//! Multi-dimensional selection over a cleaned dataset.
//!
//! A [`ViewFilter`] restricts any of three dimensions (hotel, arrival year,
//! arrival month) to an allowed set. A record passes when it is a member of
//! every dimension's set. Unrestricted dimensions resolve to the values
//! observed in the dataset when the view is built.

use crate::pipeline::CleanedDataset;
use crate::types::{BookingRecord, Hotel, Month};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Caller-supplied restrictions. `None` leaves a dimension unrestricted; an
/// empty set matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewFilter {
    pub hotels: Option<BTreeSet<Hotel>>,
    pub years: Option<BTreeSet<i64>>,
    pub months: Option<BTreeSet<Month>>,
}

/// Allowed values per dimension after resolving unrestricted dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub hotels: BTreeSet<Hotel>,
    pub years: BTreeSet<i64>,
    pub months: BTreeSet<Month>,
}

impl Selection {
    pub fn matches(&self, record: &BookingRecord) -> bool {
        self.hotels.contains(&record.hotel)
            && self.years.contains(&record.arrival_year)
            && self.months.contains(&record.arrival_month)
    }
}

impl ViewFilter {
    /// A filter that passes every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn hotels(mut self, hotels: impl IntoIterator<Item = Hotel>) -> Self {
        self.hotels = Some(hotels.into_iter().collect());
        self
    }

    pub fn years(mut self, years: impl IntoIterator<Item = i64>) -> Self {
        self.years = Some(years.into_iter().collect());
        self
    }

    pub fn months(mut self, months: impl IntoIterator<Item = Month>) -> Self {
        self.months = Some(months.into_iter().collect());
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        self.hotels.is_none() && self.years.is_none() && self.months.is_none()
    }

    /// Resolve unrestricted dimensions against `dataset`.
    pub fn resolve(&self, dataset: &CleanedDataset) -> Selection {
        Selection {
            hotels: self
                .hotels
                .clone()
                .unwrap_or_else(|| dataset.hotels().into_iter().collect()),
            years: self
                .years
                .clone()
                .unwrap_or_else(|| dataset.years().into_iter().collect()),
            months: self
                .months
                .clone()
                .unwrap_or_else(|| dataset.months().into_iter().collect()),
        }
    }

    /// Build a view of the records of `dataset` that pass this filter.
    pub fn apply<'a>(&self, dataset: &'a CleanedDataset) -> DatasetView<'a> {
        let selection = self.resolve(dataset);
        let records: Vec<&BookingRecord> = dataset
            .records()
            .iter()
            .filter(|record| selection.matches(record))
            .collect();

        debug!(
            "View selects {} of {} records",
            records.len(),
            dataset.len()
        );
        DatasetView { records }
    }
}

/// Read-only subset of a [`CleanedDataset`], in dataset order.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetView<'a> {
    records: Vec<&'a BookingRecord>,
}

impl<'a> DatasetView<'a> {
    /// A view of every record in `dataset`.
    pub fn all(dataset: &'a CleanedDataset) -> Self {
        Self {
            records: dataset.records().iter().collect(),
        }
    }

    /// A view over arbitrary records.
    pub fn from_records(records: impl IntoIterator<Item = &'a BookingRecord>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }

    pub fn records(&self) -> &[&'a BookingRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a BookingRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;
    use crate::test_support::{BookingRow, frame_from_rows};
    use pretty_assertions::assert_eq;

    fn dataset() -> CleanedDataset {
        let rows = [
            BookingRow::city(100.0),
            BookingRow {
                year: 2015,
                ..BookingRow::city(90.0)
            },
            BookingRow::resort(150.0),
            BookingRow {
                year: 2017,
                month: "January",
                ..BookingRow::resort(70.0)
            },
        ];
        Pipeline::clean_frame(frame_from_rows(&rows)).unwrap()
    }

    #[test]
    fn test_unrestricted_filter_selects_everything() {
        let ds = dataset();
        let view = ViewFilter::all().apply(&ds);

        assert!(ViewFilter::all().is_unrestricted());
        assert_eq!(view.len(), ds.len());
        assert_eq!(view, DatasetView::all(&ds));
    }

    #[test]
    fn test_filter_is_a_conjunction() {
        let ds = dataset();
        let view = ViewFilter::all()
            .hotels([Hotel::CityHotel])
            .years([2016])
            .apply(&ds);

        assert_eq!(view.len(), 1);
        for record in view.iter() {
            assert_eq!(record.hotel, Hotel::CityHotel);
            assert_eq!(record.arrival_year, 2016);
        }
        let outside = ds
            .records()
            .iter()
            .filter(|r| r.hotel == Hotel::CityHotel && r.arrival_year == 2016)
            .count();
        assert_eq!(outside, view.len());
    }

    #[test]
    fn test_unrestricted_dimensions_resolve_to_observed_values() {
        let ds = dataset();
        let selection = ViewFilter::all().months([Month::July]).resolve(&ds);

        assert_eq!(
            selection.hotels,
            BTreeSet::from([Hotel::CityHotel, Hotel::ResortHotel])
        );
        assert_eq!(selection.years, BTreeSet::from([2015, 2016, 2017]));
        assert_eq!(selection.months, BTreeSet::from([Month::July]));
    }

    #[test]
    fn test_empty_allowed_set_yields_empty_view() {
        let ds = dataset();
        let view = ViewFilter::all().years([]).apply(&ds);

        assert!(view.is_empty());
    }

    #[test]
    fn test_no_matching_records_is_not_an_error() {
        let ds = dataset();
        let view = ViewFilter::all()
            .hotels([Hotel::ResortHotel])
            .years([2015])
            .apply(&ds);

        assert_eq!(view.len(), 0);
    }

    #[test]
    fn test_view_preserves_dataset_order() {
        let ds = dataset();
        let view = ViewFilter::all().hotels([Hotel::ResortHotel]).apply(&ds);
        let adr: Vec<f64> = view.iter().map(|r| r.adr).collect();

        assert_eq!(adr, vec![150.0, 70.0]);
    }
}
