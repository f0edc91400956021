//! Domain types for booking records.
//!
//! Categorical columns whose domain is known up front (hotel, month,
//! customer type, ...) are closed enums; open-ended ones (country, room
//! types) stay strings and agent/company stay integer identifiers.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Column names of the booking table.
pub mod columns {
    pub const HOTEL: &str = "hotel";
    pub const IS_CANCELED: &str = "is_canceled";
    pub const LEAD_TIME: &str = "lead_time";
    pub const ARRIVAL_YEAR: &str = "arrival_date_year";
    pub const ARRIVAL_MONTH: &str = "arrival_date_month";
    pub const ARRIVAL_WEEK: &str = "arrival_date_week_number";
    pub const WEEKEND_NIGHTS: &str = "stays_in_weekend_nights";
    pub const WEEK_NIGHTS: &str = "stays_in_week_nights";
    pub const ADULTS: &str = "adults";
    pub const CHILDREN: &str = "children";
    pub const BABIES: &str = "babies";
    pub const MEAL: &str = "meal";
    pub const COUNTRY: &str = "country";
    pub const MARKET_SEGMENT: &str = "market_segment";
    pub const DISTRIBUTION_CHANNEL: &str = "distribution_channel";
    pub const RESERVED_ROOM_TYPE: &str = "reserved_room_type";
    pub const ASSIGNED_ROOM_TYPE: &str = "assigned_room_type";
    pub const DEPOSIT_TYPE: &str = "deposit_type";
    pub const AGENT: &str = "agent";
    pub const COMPANY: &str = "company";
    pub const CUSTOMER_TYPE: &str = "customer_type";
    pub const ADR: &str = "adr";
    pub const PARKING_SPACES: &str = "required_car_parking_spaces";
    pub const SPECIAL_REQUESTS: &str = "total_of_special_requests";
    pub const RESERVATION_STATUS: &str = "reservation_status";
    pub const RESERVATION_STATUS_DATE: &str = "reservation_status_date";

    pub const TOTAL_STAY: &str = "total_stay";
    pub const TOTAL_PEOPLE: &str = "total_people";
    pub const TOTAL_REVENUE: &str = "total_revenue";
}

/// A label that does not belong to a closed category domain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{value}' is not a valid {expected}")]
pub struct UnknownLabel {
    pub expected: &'static str,
    pub value: String,
}

macro_rules! closed_category {
    (
        $(#[$meta:meta])*
        $name:ident as $expected:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every member of the domain, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Human-readable name of the domain, used in diagnostics.
            pub const EXPECTED: &'static str = $expected;

            /// The label used in the source data.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownLabel;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($label => Ok($name::$variant),)+
                    _ => Err(UnknownLabel {
                        expected: $expected,
                        value: value.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let label = String::deserialize(deserializer)?;
                label.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

closed_category! {
    /// Hotel type. Ordering follows the labels alphabetically.
    Hotel as "hotel type" {
        CityHotel => "City Hotel",
        ResortHotel => "Resort Hotel",
    }
}

closed_category! {
    CustomerType as "customer type" {
        Transient => "Transient",
        Contract => "Contract",
        TransientParty => "Transient-Party",
        Group => "Group",
    }
}

closed_category! {
    DepositType as "deposit type" {
        NoDeposit => "No Deposit",
        Refundable => "Refundable",
        NonRefund => "Non Refund",
    }
}

closed_category! {
    /// Meal package booked (bed & breakfast, half board, ...).
    Meal as "meal package" {
        BedAndBreakfast => "BB",
        HalfBoard => "HB",
        FullBoard => "FB",
        SelfCatering => "SC",
        Undefined => "Undefined",
    }
}

closed_category! {
    MarketSegment as "market segment" {
        Direct => "Direct",
        Corporate => "Corporate",
        OnlineTravelAgent => "Online TA",
        OfflineTravelAgent => "Offline TA/TO",
        Complementary => "Complementary",
        Groups => "Groups",
        Aviation => "Aviation",
        Undefined => "Undefined",
    }
}

closed_category! {
    DistributionChannel as "distribution channel" {
        Direct => "Direct",
        Corporate => "Corporate",
        TravelAgent => "TA/TO",
        GlobalDistributionSystem => "GDS",
        Undefined => "Undefined",
    }
}

closed_category! {
    ReservationStatus as "reservation status" {
        CheckOut => "Check-Out",
        Canceled => "Canceled",
        NoShow => "No-Show",
    }
}

/// Calendar month of arrival.
///
/// Ordinals come from [`MONTH_TABLE`], never from locale-aware parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January = 1,
    February = 2,
    March = 3,
    April = 4,
    May = 5,
    June = 6,
    July = 7,
    August = 8,
    September = 9,
    October = 10,
    November = 11,
    December = 12,
}

/// Fixed English month name → month lookup, in calendar order.
pub const MONTH_TABLE: [(&str, Month); 12] = [
    ("January", Month::January),
    ("February", Month::February),
    ("March", Month::March),
    ("April", Month::April),
    ("May", Month::May),
    ("June", Month::June),
    ("July", Month::July),
    ("August", Month::August),
    ("September", Month::September),
    ("October", Month::October),
    ("November", Month::November),
    ("December", Month::December),
];

impl Month {
    /// Look up a full English month name. Matching is exact.
    pub fn from_name(name: &str) -> Option<Month> {
        MONTH_TABLE
            .iter()
            .find(|(label, _)| *label == name)
            .map(|(_, month)| *month)
    }

    /// Month for a calendar ordinal in 1..=12.
    pub fn from_ordinal(ordinal: u8) -> Option<Month> {
        MONTH_TABLE
            .get(usize::from(ordinal).checked_sub(1)?)
            .map(|(_, month)| *month)
    }

    /// Calendar ordinal, 1 for January through 12 for December.
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        MONTH_TABLE[usize::from(self.ordinal()) - 1].0
    }
}

impl FromStr for Month {
    type Err = UnknownLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Month::from_name(value).ok_or_else(|| UnknownLabel {
            expected: "month name",
            value: value.to_string(),
        })
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// One cleaned reservation with its derived totals.
///
/// Fields the cleaning pipeline guarantees are plain values; fields it
/// passes through untouched stay optional.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingRecord {
    pub hotel: Hotel,
    pub is_canceled: bool,
    pub lead_time: Option<i64>,
    pub arrival_year: i64,
    pub arrival_month: Month,
    pub arrival_week: Option<i64>,
    pub stays_weekend_nights: i64,
    pub stays_week_nights: i64,
    pub adults: i64,
    pub children: i64,
    pub babies: i64,
    pub meal: Option<Meal>,
    pub country: String,
    pub market_segment: Option<MarketSegment>,
    pub distribution_channel: Option<DistributionChannel>,
    pub reserved_room_type: Option<String>,
    pub assigned_room_type: Option<String>,
    pub deposit_type: Option<DepositType>,
    pub agent: i64,
    pub company: i64,
    pub customer_type: Option<CustomerType>,
    pub adr: f64,
    pub required_car_parking_spaces: Option<i64>,
    pub total_of_special_requests: Option<i64>,
    pub reservation_status: Option<ReservationStatus>,
    pub reservation_status_date: Option<NaiveDate>,
    pub total_stay: i64,
    pub total_people: i64,
    pub total_revenue: f64,
}

impl BookingRecord {
    /// Value of a numeric field, `None` when the source left it unobserved.
    pub fn numeric(&self, field: NumericField) -> Option<f64> {
        match field {
            NumericField::IsCanceled => Some(if self.is_canceled { 1.0 } else { 0.0 }),
            NumericField::LeadTime => self.lead_time.map(|v| v as f64),
            NumericField::ArrivalYear => Some(self.arrival_year as f64),
            NumericField::ArrivalWeek => self.arrival_week.map(|v| v as f64),
            NumericField::WeekendNights => Some(self.stays_weekend_nights as f64),
            NumericField::WeekNights => Some(self.stays_week_nights as f64),
            NumericField::Adults => Some(self.adults as f64),
            NumericField::Children => Some(self.children as f64),
            NumericField::Babies => Some(self.babies as f64),
            NumericField::Adr => Some(self.adr),
            NumericField::ParkingSpaces => self.required_car_parking_spaces.map(|v| v as f64),
            NumericField::SpecialRequests => self.total_of_special_requests.map(|v| v as f64),
            NumericField::TotalStay => Some(self.total_stay as f64),
            NumericField::TotalPeople => Some(self.total_people as f64),
            NumericField::TotalRevenue => Some(self.total_revenue),
        }
    }

    /// Label of a categorical field, `None` when unobserved.
    pub fn category(&self, field: CategoricalField) -> Option<Cow<'_, str>> {
        match field {
            CategoricalField::Hotel => Some(Cow::Borrowed(self.hotel.as_str())),
            CategoricalField::ArrivalMonth => Some(Cow::Borrowed(self.arrival_month.name())),
            CategoricalField::Country => Some(Cow::Borrowed(self.country.as_str())),
            CategoricalField::CustomerType => self.customer_type.map(|v| Cow::Borrowed(v.as_str())),
            CategoricalField::MarketSegment => {
                self.market_segment.map(|v| Cow::Borrowed(v.as_str()))
            }
            CategoricalField::DepositType => self.deposit_type.map(|v| Cow::Borrowed(v.as_str())),
            CategoricalField::Meal => self.meal.map(|v| Cow::Borrowed(v.as_str())),
            CategoricalField::DistributionChannel => {
                self.distribution_channel.map(|v| Cow::Borrowed(v.as_str()))
            }
            CategoricalField::ReservedRoomType => {
                self.reserved_room_type.as_deref().map(Cow::Borrowed)
            }
            CategoricalField::AssignedRoomType => {
                self.assigned_room_type.as_deref().map(Cow::Borrowed)
            }
            CategoricalField::ReservationStatus => {
                self.reservation_status.map(|v| Cow::Borrowed(v.as_str()))
            }
            CategoricalField::Agent => Some(Cow::Owned(self.agent.to_string())),
            CategoricalField::Company => Some(Cow::Owned(self.company.to_string())),
        }
    }
}

/// Numeric fields addressable by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    IsCanceled,
    LeadTime,
    ArrivalYear,
    ArrivalWeek,
    WeekendNights,
    WeekNights,
    Adults,
    Children,
    Babies,
    Adr,
    ParkingSpaces,
    SpecialRequests,
    TotalStay,
    TotalPeople,
    TotalRevenue,
}

impl NumericField {
    /// Column name of the field in the booking table.
    pub fn column_name(&self) -> &'static str {
        match self {
            Self::IsCanceled => columns::IS_CANCELED,
            Self::LeadTime => columns::LEAD_TIME,
            Self::ArrivalYear => columns::ARRIVAL_YEAR,
            Self::ArrivalWeek => columns::ARRIVAL_WEEK,
            Self::WeekendNights => columns::WEEKEND_NIGHTS,
            Self::WeekNights => columns::WEEK_NIGHTS,
            Self::Adults => columns::ADULTS,
            Self::Children => columns::CHILDREN,
            Self::Babies => columns::BABIES,
            Self::Adr => columns::ADR,
            Self::ParkingSpaces => columns::PARKING_SPACES,
            Self::SpecialRequests => columns::SPECIAL_REQUESTS,
            Self::TotalStay => columns::TOTAL_STAY,
            Self::TotalPeople => columns::TOTAL_PEOPLE,
            Self::TotalRevenue => columns::TOTAL_REVENUE,
        }
    }
}

/// Categorical fields addressable by crosstabs and frequency counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    Hotel,
    ArrivalMonth,
    Country,
    CustomerType,
    MarketSegment,
    DepositType,
    Meal,
    DistributionChannel,
    ReservedRoomType,
    AssignedRoomType,
    ReservationStatus,
    Agent,
    Company,
}

impl CategoricalField {
    pub fn column_name(&self) -> &'static str {
        match self {
            Self::Hotel => columns::HOTEL,
            Self::ArrivalMonth => columns::ARRIVAL_MONTH,
            Self::Country => columns::COUNTRY,
            Self::CustomerType => columns::CUSTOMER_TYPE,
            Self::MarketSegment => columns::MARKET_SEGMENT,
            Self::DepositType => columns::DEPOSIT_TYPE,
            Self::Meal => columns::MEAL,
            Self::DistributionChannel => columns::DISTRIBUTION_CHANNEL,
            Self::ReservedRoomType => columns::RESERVED_ROOM_TYPE,
            Self::AssignedRoomType => columns::ASSIGNED_ROOM_TYPE,
            Self::ReservationStatus => columns::RESERVATION_STATUS,
            Self::Agent => columns::AGENT,
            Self::Company => columns::COMPANY,
        }
    }
}
