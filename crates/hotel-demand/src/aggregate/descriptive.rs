//! Scalar statistics and per-hotel means.
//!
//! Empty inputs follow one policy throughout: counts and sums are 0, ratios
//! and means are NaN.

use crate::filter::DatasetView;
use crate::types::{BookingRecord, Hotel, NumericField};
use serde::Serialize;
use std::collections::BTreeMap;

/// Arithmetic mean, NaN for an empty input.
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Number of bookings in the view.
pub fn total_bookings(view: &DatasetView<'_>) -> usize {
    view.len()
}

/// Share of canceled bookings, NaN for an empty view.
pub fn cancellation_rate(view: &DatasetView<'_>) -> f64 {
    mean_of(view, NumericField::IsCanceled)
}

/// Mean of a numeric field over the records where it is observed.
pub fn mean_of(view: &DatasetView<'_>, field: NumericField) -> f64 {
    mean(view.iter().filter_map(|r| r.numeric(field)))
}

/// Sum of a numeric field, 0 for an empty view.
pub fn sum_of(view: &DatasetView<'_>, field: NumericField) -> f64 {
    view.iter().filter_map(|r| r.numeric(field)).sum()
}

pub fn hotel_count(view: &DatasetView<'_>, hotel: Hotel) -> usize {
    view.iter().filter(|r| r.hotel == hotel).count()
}

/// Mean of `field` per hotel. Hotels without records in the view are absent
/// from the result.
pub fn grouped_mean(view: &DatasetView<'_>, field: NumericField) -> BTreeMap<Hotel, f64> {
    group_by_hotel(view)
        .into_iter()
        .map(|(hotel, records)| {
            let value = mean(records.iter().filter_map(|r| r.numeric(field)));
            (hotel, value)
        })
        .collect()
}

fn group_by_hotel<'a>(view: &DatasetView<'a>) -> BTreeMap<Hotel, Vec<&'a BookingRecord>> {
    let mut groups: BTreeMap<Hotel, Vec<&BookingRecord>> = BTreeMap::new();
    for record in view.iter() {
        groups.entry(record.hotel).or_default().push(record);
    }
    groups
}

/// Side-by-side key figures for one hotel type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelComparison {
    pub hotel: Hotel,
    pub bookings: usize,
    pub cancellation_rate: f64,
    pub avg_price: f64,
    pub avg_stay: f64,
}

/// Key figures per hotel present in the view, in hotel order.
pub fn hotel_comparison(view: &DatasetView<'_>) -> Vec<HotelComparison> {
    group_by_hotel(view)
        .into_iter()
        .map(|(hotel, records)| {
            let group = DatasetView::from_records(records);
            HotelComparison {
                hotel,
                bookings: group.len(),
                cancellation_rate: cancellation_rate(&group),
                avg_price: mean_of(&group, NumericField::Adr),
                avg_stay: mean_of(&group, NumericField::TotalStay),
            }
        })
        .collect()
}
