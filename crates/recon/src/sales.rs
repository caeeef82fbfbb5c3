//! Sales rollups over stored day-part and destination records.
//!
//! Only the known items of each category are reported; every known item is
//! present even when no record exists for it.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use totem_reports::SalesCategory;

use crate::model::SaleRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemShare {
    pub item: &'static str,
    pub amount_cents: i64,
    /// Share of the category total, 0..=100.
    pub percent: f64,
}

/// One day broken out by day part and destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesDayDetail {
    pub day_parts: Vec<ItemShare>,
    pub destinations: Vec<ItemShare>,
    pub day_part_total_cents: i64,
    pub destination_total_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySalesSummary {
    pub date: NaiveDate,
    pub day_part_total_cents: i64,
    pub destination_total_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeItem {
    pub item: &'static str,
    pub total_cents: i64,
    /// Per day with sales.
    pub average_cents: i64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRangeSummary {
    /// Newest first.
    pub days: Vec<DailySalesSummary>,
    pub day_parts: Vec<RangeItem>,
    pub destinations: Vec<RangeItem>,
    pub day_part_total_cents: i64,
    pub destination_total_cents: i64,
}

fn percent(part: i64, total: i64) -> f64 {
    if total > 0 {
        part as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

fn is_known(record: &SaleRecord) -> bool {
    record.category.items().contains(&record.item.as_str())
}

fn category_amount(records: &[&SaleRecord], category: SalesCategory, item: &str) -> i64 {
    records
        .iter()
        .filter(|r| r.category == category && r.item == item)
        .map(|r| r.amount_cents)
        .fold(0i64, i64::saturating_add)
}

fn shares(records: &[&SaleRecord], category: SalesCategory) -> (Vec<ItemShare>, i64) {
    let amounts: Vec<(&'static str, i64)> = category
        .items()
        .into_iter()
        .map(|item| (item, category_amount(records, category, item)))
        .collect();
    let total = amounts.iter().map(|(_, a)| *a).fold(0i64, i64::saturating_add);
    let shares = amounts
        .into_iter()
        .map(|(item, amount_cents)| ItemShare {
            item,
            amount_cents,
            percent: percent(amount_cents, total),
        })
        .collect();
    (shares, total)
}

/// Detail for the records of a single day.
pub fn day_detail(records: &[SaleRecord]) -> SalesDayDetail {
    let known: Vec<&SaleRecord> = records.iter().filter(|r| is_known(r)).collect();
    let (day_parts, day_part_total_cents) = shares(&known, SalesCategory::DayPart);
    let (destinations, destination_total_cents) = shares(&known, SalesCategory::Destination);
    SalesDayDetail {
        day_parts,
        destinations,
        day_part_total_cents,
        destination_total_cents,
    }
}

/// Daily totals plus per-item totals, averages and percents over a range.
pub fn range_summary(records: &[SaleRecord]) -> SalesRangeSummary {
    let known: Vec<&SaleRecord> = records.iter().filter(|r| is_known(r)).collect();

    let mut by_day: BTreeMap<NaiveDate, DailySalesSummary> = BTreeMap::new();
    for record in &known {
        let day = by_day.entry(record.date).or_insert(DailySalesSummary {
            date: record.date,
            day_part_total_cents: 0,
            destination_total_cents: 0,
        });
        match record.category {
            SalesCategory::DayPart => {
                day.day_part_total_cents = day.day_part_total_cents.saturating_add(record.amount_cents)
            }
            SalesCategory::Destination => {
                day.destination_total_cents = day.destination_total_cents.saturating_add(record.amount_cents)
            }
        }
    }
    let day_count = by_day.len() as i64;
    let days: Vec<DailySalesSummary> = by_day.into_values().rev().collect();

    let items = |category: SalesCategory| {
        let (shares, total) = shares(&known, category);
        let items = shares
            .into_iter()
            .map(|s| RangeItem {
                item: s.item,
                total_cents: s.amount_cents,
                average_cents: if day_count > 0 {
                    (s.amount_cents as f64 / day_count as f64).round() as i64
                } else {
                    0
                },
                percent: s.percent,
            })
            .collect::<Vec<_>>();
        (items, total)
    };
    let (day_parts, day_part_total_cents) = items(SalesCategory::DayPart);
    let (destinations, destination_total_cents) = items(SalesCategory::Destination);

    SalesRangeSummary {
        days,
        day_parts,
        destinations,
        day_part_total_cents,
        destination_total_cents,
    }
}

/// Destination total over all records; the figure used for productivity.
pub fn total_sales_cents(records: &[SaleRecord]) -> i64 {
    records
        .iter()
        .filter(|r| r.category == SalesCategory::Destination && is_known(r))
        .map(|r| r.amount_cents)
        .fold(0i64, i64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: NaiveDate, category: SalesCategory, item: &str, cents: i64) -> SaleRecord {
        SaleRecord {
            location_id: 1,
            date,
            category,
            item: item.into(),
            amount_cents: cents,
        }
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn day_detail_fills_every_item() {
        let records = vec![
            rec(d(1), SalesCategory::DayPart, "Lunch", 7500),
            rec(d(1), SalesCategory::DayPart, "Dinner", 2500),
            rec(d(1), SalesCategory::Destination, "Carry Out", 1000),
            rec(d(1), SalesCategory::Destination, "Patio", 999),
        ];
        let detail = day_detail(&records);
        assert_eq!(detail.day_parts.len(), 5);
        assert_eq!(detail.destinations.len(), 9);
        assert_eq!(detail.day_part_total_cents, 10000);
        assert_eq!(detail.destination_total_cents, 1000);
        let lunch = detail.day_parts.iter().find(|s| s.item == "Lunch").unwrap();
        assert_eq!(lunch.percent, 75.0);
        let breakfast = detail.day_parts.iter().find(|s| s.item == "Breakfast").unwrap();
        assert_eq!(breakfast.amount_cents, 0);
        assert_eq!(breakfast.percent, 0.0);
    }

    #[test]
    fn empty_day_has_zero_percents() {
        let detail = day_detail(&[]);
        assert!(detail.day_parts.iter().all(|s| s.percent == 0.0));
    }

    #[test]
    fn range_summary_sorts_newest_first_and_averages() {
        let records = vec![
            rec(d(1), SalesCategory::Destination, "Dine-In", 1000),
            rec(d(3), SalesCategory::Destination, "Dine-In", 2000),
            rec(d(3), SalesCategory::DayPart, "Lunch", 3000),
        ];
        let summary = range_summary(&records);
        let dates: Vec<NaiveDate> = summary.days.iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![d(3), d(1)]);
        assert_eq!(summary.days[0].day_part_total_cents, 3000);
        assert_eq!(summary.days[0].destination_total_cents, 2000);

        let dine_in = summary.destinations.iter().find(|i| i.item == "Dine-In").unwrap();
        assert_eq!(dine_in.total_cents, 3000);
        assert_eq!(dine_in.average_cents, 1500);
        assert_eq!(dine_in.percent, 100.0);
        let lunch = summary.day_parts.iter().find(|i| i.item == "Lunch").unwrap();
        assert_eq!(lunch.average_cents, 1500);
        assert_eq!(total_sales_cents(&records), 3000);
    }
}
