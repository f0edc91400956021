//! Aggregation module.
//!
//! Everything here is a pure function of a [`DatasetView`]. [`DerivedStatistics`]
//! bundles the named metrics that presentation layers look up by name.

pub mod categorical;
pub mod correlation;
pub mod descriptive;
pub mod histogram;
pub mod temporal;

pub use categorical::{Crosstab, FrequencyEntry, crosstab, top_n, value_counts};
pub use correlation::{
    CHART_FIELDS, CorrelationMatrix, DASHBOARD_FIELDS, correlation_matrix, pearson,
};
pub use descriptive::{
    HotelComparison, cancellation_rate, grouped_mean, hotel_comparison, hotel_count, mean,
    mean_of, sum_of, total_bookings,
};
pub use histogram::{Histogram, HistogramBin, build_bins, histogram};
pub use temporal::{
    BusiestMonth, CalendarMonthCount, TimeBucket, bookings_by_calendar_month, busiest_month,
    monthly_bookings,
};

use crate::filter::DatasetView;
use crate::types::{CategoricalField, Hotel, NumericField};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::debug;

/// Stable metric names.
pub mod metrics {
    pub const TOTAL_BOOKINGS: &str = "total_bookings";
    pub const CANCELLATION_RATE: &str = "cancellation_rate";
    pub const AVG_PRICE: &str = "avg_price";
    pub const AVG_STAY: &str = "avg_stay";
    pub const AVG_ADULTS: &str = "avg_adults";
    pub const TOTAL_REVENUE: &str = "total_revenue";
    pub const CITY_HOTEL_BOOKINGS: &str = "city_hotel_bookings";
    pub const RESORT_HOTEL_BOOKINGS: &str = "resort_hotel_bookings";
    pub const BUSIEST_MONTH: &str = "busiest_month";
    pub const CANCELLATION_RATE_BY_HOTEL: &str = "cancellation_rate_by_hotel";
    pub const ADR_BY_HOTEL: &str = "adr_by_hotel";
    pub const TOTAL_STAY_BY_HOTEL: &str = "total_stay_by_hotel";
    pub const LEAD_TIME_BY_HOTEL: &str = "lead_time_by_hotel";
    pub const MONTHLY_BOOKINGS: &str = "monthly_bookings";
    pub const BOOKINGS_BY_CALENDAR_MONTH: &str = "bookings_by_calendar_month";
    pub const CUSTOMER_TYPE_BY_HOTEL: &str = "customer_type_by_hotel";
    pub const TOP_COUNTRIES: &str = "top_countries";
    pub const MARKET_SEGMENTS: &str = "market_segments";
    pub const ADR_DISTRIBUTION: &str = "adr_distribution";
    pub const LEAD_TIME_DISTRIBUTION: &str = "lead_time_distribution";
    pub const CORRELATION_MATRIX: &str = "correlation_matrix";
    pub const HOTEL_COMPARISON: &str = "hotel_comparison";
}

/// One computed metric. Non-finite numbers serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Scalar(f64),
    Count(usize),
    Label(Option<String>),
    Grouped(BTreeMap<Hotel, f64>),
    TimeSeries(Vec<TimeBucket>),
    Seasonality(Vec<CalendarMonthCount>),
    Crosstab(Crosstab),
    Ranking(Vec<FrequencyEntry>),
    Histogram(Histogram),
    Matrix(CorrelationMatrix),
    Comparison(Vec<HotelComparison>),
}

impl MetricValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<usize> {
        match self {
            Self::Count(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_grouped(&self) -> Option<&BTreeMap<Hotel, f64>> {
        match self {
            Self::Grouped(v) => Some(v),
            _ => None,
        }
    }
}

/// Tunables for [`DerivedStatistics::compute`].
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsOptions {
    /// Length of the `top_countries` ranking.
    pub top_n: usize,
    pub histogram_bins: usize,
    /// Exclusive upper bound for `adr_distribution`.
    pub adr_histogram_ceiling: f64,
    pub correlation_fields: Vec<NumericField>,
}

impl Default for StatisticsOptions {
    fn default() -> Self {
        Self {
            top_n: 10,
            histogram_bins: 50,
            adr_histogram_ceiling: 500.0,
            correlation_fields: DASHBOARD_FIELDS.to_vec(),
        }
    }
}

/// Named metrics computed from one view, in a fixed order.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedStatistics {
    metrics: Vec<(&'static str, MetricValue)>,
}

impl DerivedStatistics {
    pub fn compute(view: &DatasetView<'_>, options: &StatisticsOptions) -> Self {
        let start = Instant::now();

        let entries = vec![
            (
                metrics::TOTAL_BOOKINGS,
                MetricValue::Count(total_bookings(view)),
            ),
            (
                metrics::CANCELLATION_RATE,
                MetricValue::Scalar(cancellation_rate(view)),
            ),
            (
                metrics::AVG_PRICE,
                MetricValue::Scalar(mean_of(view, NumericField::Adr)),
            ),
            (
                metrics::AVG_STAY,
                MetricValue::Scalar(mean_of(view, NumericField::TotalStay)),
            ),
            (
                metrics::AVG_ADULTS,
                MetricValue::Scalar(mean_of(view, NumericField::Adults)),
            ),
            (
                metrics::TOTAL_REVENUE,
                MetricValue::Scalar(sum_of(view, NumericField::TotalRevenue)),
            ),
            (
                metrics::CITY_HOTEL_BOOKINGS,
                MetricValue::Count(hotel_count(view, Hotel::CityHotel)),
            ),
            (
                metrics::RESORT_HOTEL_BOOKINGS,
                MetricValue::Count(hotel_count(view, Hotel::ResortHotel)),
            ),
            (
                metrics::BUSIEST_MONTH,
                MetricValue::Label(busiest_month(view).map(|m| m.to_string())),
            ),
            (
                metrics::CANCELLATION_RATE_BY_HOTEL,
                MetricValue::Grouped(grouped_mean(view, NumericField::IsCanceled)),
            ),
            (
                metrics::ADR_BY_HOTEL,
                MetricValue::Grouped(grouped_mean(view, NumericField::Adr)),
            ),
            (
                metrics::TOTAL_STAY_BY_HOTEL,
                MetricValue::Grouped(grouped_mean(view, NumericField::TotalStay)),
            ),
            (
                metrics::LEAD_TIME_BY_HOTEL,
                MetricValue::Grouped(grouped_mean(view, NumericField::LeadTime)),
            ),
            (
                metrics::MONTHLY_BOOKINGS,
                MetricValue::TimeSeries(monthly_bookings(view)),
            ),
            (
                metrics::BOOKINGS_BY_CALENDAR_MONTH,
                MetricValue::Seasonality(bookings_by_calendar_month(view)),
            ),
            (
                metrics::CUSTOMER_TYPE_BY_HOTEL,
                MetricValue::Crosstab(crosstab(view, CategoricalField::CustomerType)),
            ),
            (
                metrics::TOP_COUNTRIES,
                MetricValue::Ranking(top_n(view, CategoricalField::Country, options.top_n)),
            ),
            (
                metrics::MARKET_SEGMENTS,
                MetricValue::Ranking(value_counts(view, CategoricalField::MarketSegment)),
            ),
            (
                metrics::ADR_DISTRIBUTION,
                MetricValue::Histogram(histogram(
                    view,
                    NumericField::Adr,
                    options.histogram_bins,
                    Some(options.adr_histogram_ceiling),
                )),
            ),
            (
                metrics::LEAD_TIME_DISTRIBUTION,
                MetricValue::Histogram(histogram(
                    view,
                    NumericField::LeadTime,
                    options.histogram_bins,
                    None,
                )),
            ),
            (
                metrics::CORRELATION_MATRIX,
                MetricValue::Matrix(correlation_matrix(view, &options.correlation_fields)),
            ),
            (
                metrics::HOTEL_COMPARISON,
                MetricValue::Comparison(hotel_comparison(view)),
            ),
        ];

        debug!(
            "Computed {} metrics over {} records in {:?}",
            entries.len(),
            view.len(),
            start.elapsed()
        );
        Self { metrics: entries }
    }

    pub fn get(&self, name: &str) -> Option<&MetricValue> {
        self.metrics
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.get(name)?.as_scalar()
    }

    pub fn count(&self, name: &str) -> Option<usize> {
        self.get(name)?.as_count()
    }

    pub fn grouped(&self, name: &str) -> Option<&BTreeMap<Hotel, f64>> {
        self.get(name)?.as_grouped()
    }

    /// Metric names in computation order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.metrics.iter().map(|(name, _)| *name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &MetricValue)> + '_ {
        self.metrics.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl Serialize for DerivedStatistics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
