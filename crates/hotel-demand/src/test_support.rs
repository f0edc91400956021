//! Booking fixtures shared by unit tests.

use crate::types::{
    BookingRecord, CustomerType, DepositType, DistributionChannel, Hotel, MarketSegment, Meal,
    Month, ReservationStatus, columns,
};
use polars::prelude::*;

/// One raw booking row as it appears in the source table.
#[derive(Debug, Clone)]
pub struct BookingRow {
    pub hotel: &'static str,
    pub is_canceled: i64,
    pub lead_time: Option<i64>,
    pub year: i64,
    pub month: &'static str,
    pub week: Option<i64>,
    pub weekend_nights: Option<i64>,
    pub week_nights: Option<i64>,
    pub adults: Option<i64>,
    pub children: Option<i64>,
    pub babies: Option<i64>,
    pub meal: Option<&'static str>,
    pub country: Option<&'static str>,
    pub market_segment: Option<&'static str>,
    pub distribution_channel: Option<&'static str>,
    pub reserved_room_type: Option<&'static str>,
    pub assigned_room_type: Option<&'static str>,
    pub deposit_type: Option<&'static str>,
    pub agent: Option<i64>,
    pub company: Option<i64>,
    pub customer_type: Option<&'static str>,
    pub adr: Option<f64>,
    pub parking_spaces: Option<i64>,
    pub special_requests: Option<i64>,
    pub reservation_status: Option<&'static str>,
    pub reservation_status_date: Option<&'static str>,
}

impl BookingRow {
    /// Two-night stay for two adults at a city hotel in July 2016.
    pub fn city(adr: f64) -> Self {
        Self {
            hotel: "City Hotel",
            is_canceled: 0,
            lead_time: Some(30),
            year: 2016,
            month: "July",
            week: Some(27),
            weekend_nights: Some(1),
            week_nights: Some(1),
            adults: Some(2),
            children: Some(0),
            babies: Some(0),
            meal: Some("BB"),
            country: Some("PRT"),
            market_segment: Some("Online TA"),
            distribution_channel: Some("TA/TO"),
            reserved_room_type: Some("A"),
            assigned_room_type: Some("A"),
            deposit_type: Some("No Deposit"),
            agent: Some(9),
            company: Some(0),
            customer_type: Some("Transient"),
            adr: Some(adr),
            parking_spaces: Some(0),
            special_requests: Some(1),
            reservation_status: Some("Check-Out"),
            reservation_status_date: Some("2016-07-03"),
        }
    }

    /// Two-night stay for two adults at a resort hotel in August 2016.
    pub fn resort(adr: f64) -> Self {
        Self {
            hotel: "Resort Hotel",
            lead_time: Some(90),
            month: "August",
            week: Some(32),
            country: Some("GBR"),
            agent: Some(240),
            reservation_status_date: Some("2016-08-07"),
            ..Self::city(adr)
        }
    }

    fn csv_fields(&self) -> Vec<String> {
        fn int(v: Option<i64>) -> String {
            v.map_or_else(|| "NA".to_string(), |v| v.to_string())
        }
        fn text(v: Option<&str>) -> String {
            v.map_or_else(|| "NULL".to_string(), str::to_string)
        }

        vec![
            self.hotel.to_string(),
            self.is_canceled.to_string(),
            int(self.lead_time),
            self.year.to_string(),
            self.month.to_string(),
            int(self.week),
            int(self.weekend_nights),
            int(self.week_nights),
            int(self.adults),
            int(self.children),
            int(self.babies),
            text(self.meal),
            text(self.country),
            text(self.market_segment),
            text(self.distribution_channel),
            text(self.reserved_room_type),
            text(self.assigned_room_type),
            text(self.deposit_type),
            int(self.agent),
            int(self.company),
            text(self.customer_type),
            self.adr
                .map_or_else(|| "NA".to_string(), |v| v.to_string()),
            int(self.parking_spaces),
            int(self.special_requests),
            text(self.reservation_status),
            text(self.reservation_status_date),
        ]
    }
}

/// Header of the source table, in source order.
pub const CSV_HEADER: [&str; 26] = [
    columns::HOTEL,
    columns::IS_CANCELED,
    columns::LEAD_TIME,
    columns::ARRIVAL_YEAR,
    columns::ARRIVAL_MONTH,
    columns::ARRIVAL_WEEK,
    columns::WEEKEND_NIGHTS,
    columns::WEEK_NIGHTS,
    columns::ADULTS,
    columns::CHILDREN,
    columns::BABIES,
    columns::MEAL,
    columns::COUNTRY,
    columns::MARKET_SEGMENT,
    columns::DISTRIBUTION_CHANNEL,
    columns::RESERVED_ROOM_TYPE,
    columns::ASSIGNED_ROOM_TYPE,
    columns::DEPOSIT_TYPE,
    columns::AGENT,
    columns::COMPANY,
    columns::CUSTOMER_TYPE,
    columns::ADR,
    columns::PARKING_SPACES,
    columns::SPECIAL_REQUESTS,
    columns::RESERVATION_STATUS,
    columns::RESERVATION_STATUS_DATE,
];

/// Render rows as CSV text. Missing values use the `NULL`/`NA` tokens of the
/// public export.
pub fn csv_from_rows(rows: &[BookingRow]) -> String {
    let mut out = CSV_HEADER.join(",");
    out.push('\n');
    for row in rows {
        out.push_str(&row.csv_fields().join(","));
        out.push('\n');
    }
    out
}

/// Build a frame with the raw column layout produced by the CSV reader.
pub fn frame_from_rows(rows: &[BookingRow]) -> DataFrame {
    let ints = |name: &str, f: fn(&BookingRow) -> Option<i64>| {
        Column::new(name.into(), rows.iter().map(f).collect::<Vec<_>>())
    };
    let texts = |name: &str, f: fn(&BookingRow) -> Option<&'static str>| {
        Column::new(name.into(), rows.iter().map(f).collect::<Vec<_>>())
    };

    DataFrame::new(vec![
        texts(columns::HOTEL, |r| Some(r.hotel)),
        ints(columns::IS_CANCELED, |r| Some(r.is_canceled)),
        ints(columns::LEAD_TIME, |r| r.lead_time),
        ints(columns::ARRIVAL_YEAR, |r| Some(r.year)),
        texts(columns::ARRIVAL_MONTH, |r| Some(r.month)),
        ints(columns::ARRIVAL_WEEK, |r| r.week),
        ints(columns::WEEKEND_NIGHTS, |r| r.weekend_nights),
        ints(columns::WEEK_NIGHTS, |r| r.week_nights),
        ints(columns::ADULTS, |r| r.adults),
        ints(columns::CHILDREN, |r| r.children),
        ints(columns::BABIES, |r| r.babies),
        texts(columns::MEAL, |r| r.meal),
        texts(columns::COUNTRY, |r| r.country),
        texts(columns::MARKET_SEGMENT, |r| r.market_segment),
        texts(columns::DISTRIBUTION_CHANNEL, |r| r.distribution_channel),
        texts(columns::RESERVED_ROOM_TYPE, |r| r.reserved_room_type),
        texts(columns::ASSIGNED_ROOM_TYPE, |r| r.assigned_room_type),
        texts(columns::DEPOSIT_TYPE, |r| r.deposit_type),
        ints(columns::AGENT, |r| r.agent),
        ints(columns::COMPANY, |r| r.company),
        texts(columns::CUSTOMER_TYPE, |r| r.customer_type),
        Column::new(
            columns::ADR.into(),
            rows.iter().map(|r| r.adr).collect::<Vec<_>>(),
        ),
        ints(columns::PARKING_SPACES, |r| r.parking_spaces),
        ints(columns::SPECIAL_REQUESTS, |r| r.special_requests),
        texts(columns::RESERVATION_STATUS, |r| r.reservation_status),
        texts(columns::RESERVATION_STATUS_DATE, |r| {
            r.reservation_status_date
        }),
    ])
    .expect("fixture columns have equal length")
}

/// Validated frame for the given rows.
pub fn validated_frame(rows: &[BookingRow]) -> DataFrame {
    crate::ingest::schema::validate(frame_from_rows(rows)).expect("fixture rows are valid")
}

/// A cleaned two-night, two-adult booking in July 2016.
pub fn record(hotel: Hotel, adr: f64, is_canceled: bool) -> BookingRecord {
    BookingRecord {
        hotel,
        is_canceled,
        lead_time: Some(30),
        arrival_year: 2016,
        arrival_month: Month::July,
        arrival_week: Some(27),
        stays_weekend_nights: 1,
        stays_week_nights: 1,
        adults: 2,
        children: 0,
        babies: 0,
        meal: Some(Meal::BedAndBreakfast),
        country: "PRT".to_string(),
        market_segment: Some(MarketSegment::OnlineTravelAgent),
        distribution_channel: Some(DistributionChannel::TravelAgent),
        reserved_room_type: Some("A".to_string()),
        assigned_room_type: Some("A".to_string()),
        deposit_type: Some(DepositType::NoDeposit),
        agent: 9,
        company: 0,
        customer_type: Some(CustomerType::Transient),
        adr,
        required_car_parking_spaces: Some(0),
        total_of_special_requests: Some(1),
        reservation_status: Some(if is_canceled {
            ReservationStatus::Canceled
        } else {
            ReservationStatus::CheckOut
        }),
        reservation_status_date: None,
        total_stay: 2,
        total_people: 2,
        total_revenue: adr * 2.0,
    }
}
