//! Arrival-month bucketing.
//!
//! Buckets are keyed by (arrival year, month ordinal) from the fixed month
//! table, so ordering is chronological regardless of month names.

use crate::filter::DatasetView;
use crate::types::{Hotel, Month};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Bookings of one hotel type arriving in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeBucket {
    pub year: i64,
    pub month: Month,
    pub hotel: Hotel,
    pub count: usize,
}

/// Booking counts per (year, month, hotel), chronological, hotels in order
/// within a month. Combinations without bookings are absent.
pub fn monthly_bookings(view: &DatasetView<'_>) -> Vec<TimeBucket> {
    let mut buckets: BTreeMap<(i64, Month, Hotel), usize> = BTreeMap::new();
    for record in view.iter() {
        *buckets
            .entry((record.arrival_year, record.arrival_month, record.hotel))
            .or_default() += 1;
    }

    buckets
        .into_iter()
        .map(|((year, month, hotel), count)| TimeBucket {
            year,
            month,
            hotel,
            count,
        })
        .collect()
}

/// Bookings arriving in one calendar month, all years and hotels combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarMonthCount {
    pub month: Month,
    pub count: usize,
}

/// Arrivals per calendar month regardless of year, January first. Months
/// without bookings are absent.
pub fn bookings_by_calendar_month(view: &DatasetView<'_>) -> Vec<CalendarMonthCount> {
    let mut counts = [0usize; 12];
    for record in view.iter() {
        counts[usize::from(record.arrival_month.ordinal()) - 1] += 1;
    }

    (1..=12u8)
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .filter_map(|(ordinal, count)| {
            Some(CalendarMonthCount {
                month: Month::from_ordinal(ordinal)?,
                count,
            })
        })
        .collect()
}

/// The calendar month with the most arrivals, both hotels combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BusiestMonth {
    pub year: i64,
    pub month: Month,
    pub count: usize,
}

impl fmt::Display for BusiestMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}

/// Busiest arrival month of the view; the earliest one on ties, `None` for
/// an empty view.
pub fn busiest_month(view: &DatasetView<'_>) -> Option<BusiestMonth> {
    let mut totals: BTreeMap<(i64, Month), usize> = BTreeMap::new();
    for record in view.iter() {
        *totals
            .entry((record.arrival_year, record.arrival_month))
            .or_default() += 1;
    }

    let mut best: Option<BusiestMonth> = None;
    for ((year, month), count) in totals {
        if best.is_none_or(|b| count > b.count) {
            best = Some(BusiestMonth { year, month, count });
        }
    }
    best
}
