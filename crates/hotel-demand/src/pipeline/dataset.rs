//! The immutable result of a pipeline run.

use crate::error::{PipelineError, Result};
use crate::ingest::schema::STATUS_DATE_FORMAT;
use crate::pipeline::summary::CleaningSummary;
use crate::types::{BookingRecord, Hotel, Month, UnknownLabel, columns};
use crate::utils::{f64_values, i64_values, string_values};
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::BTreeSet;
use std::str::FromStr;

/// Cleaned bookings, both as a frame (for export) and as typed records (for
/// filtering and aggregation). Records are in frame order.
///
/// Every record satisfies: no exact duplicate in the dataset, `children`,
/// `agent`, `company` and `country` observed, `0 <= adr < 10000`,
/// `total_people > 0` and `total_stay > 0`.
#[derive(Debug, Clone)]
pub struct CleanedDataset {
    frame: DataFrame,
    records: Vec<BookingRecord>,
    summary: CleaningSummary,
}

static_assertions::assert_impl_all!(CleanedDataset: Send, Sync);

impl CleanedDataset {
    /// Build a dataset from a cleaned frame that carries the derived columns.
    pub(crate) fn from_frame(frame: DataFrame, summary: CleaningSummary) -> Result<Self> {
        let records = materialize(&frame)?;
        Ok(Self {
            frame,
            records,
            summary,
        })
    }

    pub fn records(&self) -> &[BookingRecord] {
        &self.records
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn summary(&self) -> &CleaningSummary {
        &self.summary
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Hotels present in the dataset.
    pub fn hotels(&self) -> Vec<Hotel> {
        self.observed(|r| r.hotel)
    }

    /// Arrival years present in the dataset, ascending.
    pub fn years(&self) -> Vec<i64> {
        self.observed(|r| r.arrival_year)
    }

    /// Arrival months present in the dataset, in calendar order.
    pub fn months(&self) -> Vec<Month> {
        self.observed(|r| r.arrival_month)
    }

    fn observed<T: Ord>(&self, key: impl Fn(&BookingRecord) -> T) -> Vec<T> {
        self.records
            .iter()
            .map(key)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Column vectors of a cleaned frame, read once by name.
struct FrameColumns {
    hotel: Vec<Option<String>>,
    is_canceled: Vec<Option<i64>>,
    lead_time: Vec<Option<i64>>,
    arrival_year: Vec<Option<i64>>,
    arrival_month: Vec<Option<String>>,
    arrival_week: Vec<Option<i64>>,
    weekend_nights: Vec<Option<i64>>,
    week_nights: Vec<Option<i64>>,
    adults: Vec<Option<i64>>,
    children: Vec<Option<i64>>,
    babies: Vec<Option<i64>>,
    meal: Vec<Option<String>>,
    country: Vec<Option<String>>,
    market_segment: Vec<Option<String>>,
    distribution_channel: Vec<Option<String>>,
    reserved_room_type: Vec<Option<String>>,
    assigned_room_type: Vec<Option<String>>,
    deposit_type: Vec<Option<String>>,
    agent: Vec<Option<i64>>,
    company: Vec<Option<i64>>,
    customer_type: Vec<Option<String>>,
    adr: Vec<Option<f64>>,
    parking_spaces: Vec<Option<i64>>,
    special_requests: Vec<Option<i64>>,
    reservation_status: Vec<Option<String>>,
    reservation_status_date: Vec<Option<String>>,
    total_stay: Vec<Option<i64>>,
    total_people: Vec<Option<i64>>,
    total_revenue: Vec<Option<f64>>,
}

impl FrameColumns {
    fn read(df: &DataFrame) -> PolarsResult<Self> {
        Ok(Self {
            hotel: string_values(df, columns::HOTEL)?,
            is_canceled: i64_values(df, columns::IS_CANCELED)?,
            lead_time: i64_values(df, columns::LEAD_TIME)?,
            arrival_year: i64_values(df, columns::ARRIVAL_YEAR)?,
            arrival_month: string_values(df, columns::ARRIVAL_MONTH)?,
            arrival_week: i64_values(df, columns::ARRIVAL_WEEK)?,
            weekend_nights: i64_values(df, columns::WEEKEND_NIGHTS)?,
            week_nights: i64_values(df, columns::WEEK_NIGHTS)?,
            adults: i64_values(df, columns::ADULTS)?,
            children: i64_values(df, columns::CHILDREN)?,
            babies: i64_values(df, columns::BABIES)?,
            meal: string_values(df, columns::MEAL)?,
            country: string_values(df, columns::COUNTRY)?,
            market_segment: string_values(df, columns::MARKET_SEGMENT)?,
            distribution_channel: string_values(df, columns::DISTRIBUTION_CHANNEL)?,
            reserved_room_type: string_values(df, columns::RESERVED_ROOM_TYPE)?,
            assigned_room_type: string_values(df, columns::ASSIGNED_ROOM_TYPE)?,
            deposit_type: string_values(df, columns::DEPOSIT_TYPE)?,
            agent: i64_values(df, columns::AGENT)?,
            company: i64_values(df, columns::COMPANY)?,
            customer_type: string_values(df, columns::CUSTOMER_TYPE)?,
            adr: f64_values(df, columns::ADR)?,
            parking_spaces: i64_values(df, columns::PARKING_SPACES)?,
            special_requests: i64_values(df, columns::SPECIAL_REQUESTS)?,
            reservation_status: string_values(df, columns::RESERVATION_STATUS)?,
            reservation_status_date: string_values(df, columns::RESERVATION_STATUS_DATE)?,
            total_stay: i64_values(df, columns::TOTAL_STAY)?,
            total_people: i64_values(df, columns::TOTAL_PEOPLE)?,
            total_revenue: f64_values(df, columns::TOTAL_REVENUE)?,
        })
    }

    fn record(&self, row: usize) -> Result<BookingRecord> {
        let hotel: Hotel = label(&required(&self.hotel[row], columns::HOTEL, row)?)?;
        let month_name = required(&self.arrival_month[row], columns::ARRIVAL_MONTH, row)?;
        let arrival_month = Month::from_name(&month_name).ok_or_else(|| {
            PipelineError::Internal(format!("unrecognized month '{month_name}' in row {row}"))
        })?;

        Ok(BookingRecord {
            hotel,
            is_canceled: required(&self.is_canceled[row], columns::IS_CANCELED, row)? == 1,
            lead_time: self.lead_time[row],
            arrival_year: required(&self.arrival_year[row], columns::ARRIVAL_YEAR, row)?,
            arrival_month,
            arrival_week: self.arrival_week[row],
            stays_weekend_nights: required(&self.weekend_nights[row], columns::WEEKEND_NIGHTS, row)?,
            stays_week_nights: required(&self.week_nights[row], columns::WEEK_NIGHTS, row)?,
            adults: required(&self.adults[row], columns::ADULTS, row)?,
            children: required(&self.children[row], columns::CHILDREN, row)?,
            babies: required(&self.babies[row], columns::BABIES, row)?,
            meal: optional_label(&self.meal[row])?,
            country: required(&self.country[row], columns::COUNTRY, row)?,
            market_segment: optional_label(&self.market_segment[row])?,
            distribution_channel: optional_label(&self.distribution_channel[row])?,
            reserved_room_type: self.reserved_room_type[row].clone(),
            assigned_room_type: self.assigned_room_type[row].clone(),
            deposit_type: optional_label(&self.deposit_type[row])?,
            agent: required(&self.agent[row], columns::AGENT, row)?,
            company: required(&self.company[row], columns::COMPANY, row)?,
            customer_type: optional_label(&self.customer_type[row])?,
            adr: required(&self.adr[row], columns::ADR, row)?,
            required_car_parking_spaces: self.parking_spaces[row],
            total_of_special_requests: self.special_requests[row],
            reservation_status: optional_label(&self.reservation_status[row])?,
            reservation_status_date: self.reservation_status_date[row]
                .as_deref()
                .map(|raw| {
                    NaiveDate::parse_from_str(raw, STATUS_DATE_FORMAT)
                        .map_err(|e| PipelineError::Internal(format!("row {row}: {e}")))
                })
                .transpose()?,
            total_stay: required(&self.total_stay[row], columns::TOTAL_STAY, row)?,
            total_people: required(&self.total_people[row], columns::TOTAL_PEOPLE, row)?,
            total_revenue: required(&self.total_revenue[row], columns::TOTAL_REVENUE, row)?,
        })
    }
}

fn materialize(df: &DataFrame) -> Result<Vec<BookingRecord>> {
    let cols = FrameColumns::read(df)?;
    (0..df.height()).map(|row| cols.record(row)).collect()
}

/// A value the cleaning stages guarantee to be present.
fn required<T: Clone>(value: &Option<T>, column: &str, row: usize) -> Result<T> {
    value.clone().ok_or_else(|| {
        PipelineError::Internal(format!("missing '{column}' in cleaned row {row}"))
    })
}

fn label<T: FromStr<Err = UnknownLabel>>(raw: &str) -> Result<T> {
    raw.parse::<T>()
        .map_err(|e| PipelineError::Internal(e.to_string()))
}

fn optional_label<T: FromStr<Err = UnknownLabel>>(raw: &Option<String>) -> Result<Option<T>> {
    raw.as_deref().map(label::<T>).transpose()
}
