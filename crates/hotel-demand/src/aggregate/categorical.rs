//! Crosstabs and frequency rankings over categorical fields.

use crate::filter::DatasetView;
use crate::types::{CategoricalField, Hotel};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Counts of (hotel, category value) pairs.
///
/// Only observed pairs are stored; [`Crosstab::get`] reports 0 for the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crosstab {
    pub field: CategoricalField,
    pub cells: BTreeMap<Hotel, BTreeMap<String, usize>>,
}

impl Crosstab {
    pub fn get(&self, hotel: Hotel, value: &str) -> usize {
        self.cells
            .get(&hotel)
            .and_then(|row| row.get(value))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Every category value observed for any hotel, sorted.
    pub fn column_labels(&self) -> Vec<&str> {
        let labels: BTreeSet<&str> = self
            .cells
            .values()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect();
        labels.into_iter().collect()
    }

    /// Total count for one hotel across all values.
    pub fn row_total(&self, hotel: Hotel) -> usize {
        self.cells
            .get(&hotel)
            .map_or(0, |row| row.values().sum())
    }
}

/// Count records per (hotel, value of `field`). Records where the field is
/// unobserved are skipped.
pub fn crosstab(view: &DatasetView<'_>, field: CategoricalField) -> Crosstab {
    let mut cells: BTreeMap<Hotel, BTreeMap<String, usize>> = BTreeMap::new();
    for record in view.iter() {
        let Some(value) = record.category(field) else {
            continue;
        };
        *cells
            .entry(record.hotel)
            .or_default()
            .entry(value.into_owned())
            .or_default() += 1;
    }
    Crosstab { field, cells }
}

/// One category value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: usize,
}

/// Occurrence counts of every observed value of `field`, most frequent
/// first. Ties keep the order in which values first appear in the view.
pub fn value_counts(view: &DatasetView<'_>, field: CategoricalField) -> Vec<FrequencyEntry> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<FrequencyEntry> = Vec::new();

    for record in view.iter() {
        let Some(value) = record.category(field) else {
            continue;
        };
        match positions.get(&*value) {
            Some(&index) => entries[index].count += 1,
            None => {
                positions.insert(value.to_string(), entries.len());
                entries.push(FrequencyEntry {
                    value: value.into_owned(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

/// The `n` most frequent values of `field`; fewer when fewer exist.
pub fn top_n(view: &DatasetView<'_>, field: CategoricalField, n: usize) -> Vec<FrequencyEntry> {
    let mut entries = value_counts(view, field);
    entries.truncate(n);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;
    use crate::types::{BookingRecord, CustomerType};
    use pretty_assertions::assert_eq;

    fn from_country(hotel: Hotel, country: &str) -> BookingRecord {
        let mut r = record(hotel, 100.0, false);
        r.country = country.to_string();
        r
    }

    #[test]
    fn test_crosstab_counts_pairs() {
        let mut group = record(Hotel::ResortHotel, 100.0, false);
        group.customer_type = Some(CustomerType::Group);
        let records = [
            record(Hotel::CityHotel, 100.0, false),
            record(Hotel::CityHotel, 90.0, true),
            record(Hotel::ResortHotel, 80.0, false),
            group,
        ];
        let view = DatasetView::from_records(&records);
        let table = crosstab(&view, CategoricalField::CustomerType);

        assert_eq!(table.get(Hotel::CityHotel, "Transient"), 2);
        assert_eq!(table.get(Hotel::ResortHotel, "Transient"), 1);
        assert_eq!(table.get(Hotel::ResortHotel, "Group"), 1);
        assert_eq!(table.get(Hotel::CityHotel, "Group"), 0);
        assert_eq!(table.column_labels(), vec!["Group", "Transient"]);
        assert_eq!(table.row_total(Hotel::CityHotel), 2);
    }

    #[test]
    fn test_crosstab_skips_unobserved_values() {
        let mut unknown = record(Hotel::CityHotel, 100.0, false);
        unknown.customer_type = None;
        let records = [unknown];
        let view = DatasetView::from_records(&records);

        assert!(crosstab(&view, CategoricalField::CustomerType).is_empty());
    }

    #[test]
    fn test_top_n_orders_by_count() {
        let records = [
            from_country(Hotel::CityHotel, "FRA"),
            from_country(Hotel::CityHotel, "PRT"),
            from_country(Hotel::ResortHotel, "PRT"),
            from_country(Hotel::ResortHotel, "GBR"),
            from_country(Hotel::CityHotel, "PRT"),
            from_country(Hotel::CityHotel, "GBR"),
        ];
        let view = DatasetView::from_records(&records);
        let top = top_n(&view, CategoricalField::Country, 2);

        assert_eq!(
            top,
            vec![
                FrequencyEntry {
                    value: "PRT".to_string(),
                    count: 3
                },
                FrequencyEntry {
                    value: "GBR".to_string(),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn test_top_n_ties_keep_first_seen_order() {
        let records = [
            from_country(Hotel::CityHotel, "ESP"),
            from_country(Hotel::CityHotel, "DEU"),
            from_country(Hotel::CityHotel, "ITA"),
        ];
        let view = DatasetView::from_records(&records);
        let values: Vec<String> = top_n(&view, CategoricalField::Country, 10)
            .into_iter()
            .map(|e| e.value)
            .collect();

        assert_eq!(values, vec!["ESP", "DEU", "ITA"]);
    }

    #[test]
    fn test_top_n_larger_than_distinct_values() {
        let records = [from_country(Hotel::CityHotel, "PRT")];
        let view = DatasetView::from_records(&records);

        assert_eq!(top_n(&view, CategoricalField::Country, 5).len(), 1);
        assert!(top_n(&view, CategoricalField::Country, 0).is_empty());
        assert!(top_n(&DatasetView::from_records(&[]), CategoricalField::Country, 5).is_empty());
    }

    #[test]
    fn test_numeric_codes_count_as_categories() {
        let records = [
            record(Hotel::CityHotel, 100.0, false),
            record(Hotel::ResortHotel, 100.0, false),
        ];
        let view = DatasetView::from_records(&records);

        assert_eq!(
            value_counts(&view, CategoricalField::Agent),
            vec![FrequencyEntry {
                value: "9".to_string(),
                count: 2
            }]
        );
    }
}
