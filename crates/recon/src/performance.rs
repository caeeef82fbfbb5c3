//! Daily sales vs labor, and range totals.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use totem_reports::money::to_dollars;
use totem_reports::SalesCategory;

use crate::model::{LaborRecord, SaleRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPerformanceRecord {
    pub date: NaiveDate,
    pub sales_cents: i64,
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub total_hours: f64,
    pub labor_wages_cents: i64,
    /// Sales dollars per labor hour.
    pub productivity: f64,
    /// Labor wages as a percent of sales.
    pub labor_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub days: usize,
    pub total_sales_cents: i64,
    pub total_hours: f64,
    pub total_labor_wages_cents: i64,
    pub productivity: f64,
    pub labor_percent: f64,
}

fn productivity(sales_cents: i64, hours: f64) -> f64 {
    if hours > 0.0 {
        to_dollars(sales_cents) / hours
    } else {
        0.0
    }
}

fn labor_percent(wages_cents: i64, sales_cents: i64) -> f64 {
    if sales_cents > 0 {
        wages_cents as f64 / sales_cents as f64 * 100.0
    } else {
        0.0
    }
}

/// One record per date with sales or labor, oldest first.
///
/// Daily sales are the destination totals.
pub fn performance_report(sales: &[SaleRecord], labor: &[LaborRecord]) -> Vec<DailyPerformanceRecord> {
    let mut sales_by_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for record in sales.iter().filter(|r| r.category == SalesCategory::Destination) {
        let day = sales_by_day.entry(record.date).or_default();
        *day = day.saturating_add(record.amount_cents);
    }
    let labor_by_day: BTreeMap<NaiveDate, &LaborRecord> = labor.iter().map(|l| (l.date, l)).collect();

    let mut dates: Vec<NaiveDate> = sales_by_day.keys().chain(labor_by_day.keys()).copied().collect();
    dates.sort();
    dates.dedup();

    dates
        .into_iter()
        .map(|date| {
            let sales_cents = sales_by_day.get(&date).copied().unwrap_or(0);
            let labor = labor_by_day.get(&date);
            let regular_hours = labor.map(|l| l.regular_hours).unwrap_or(0.0);
            let overtime_hours = labor.map(|l| l.overtime_hours).unwrap_or(0.0);
            let labor_wages_cents = labor.map(|l| l.total_wages_cents()).unwrap_or(0);
            let total_hours = regular_hours + overtime_hours;
            DailyPerformanceRecord {
                date,
                sales_cents,
                regular_hours,
                overtime_hours,
                total_hours,
                labor_wages_cents,
                productivity: productivity(sales_cents, total_hours),
                labor_percent: labor_percent(labor_wages_cents, sales_cents),
            }
        })
        .collect()
}

impl PerformanceSummary {
    pub fn calculate(records: &[DailyPerformanceRecord]) -> Self {
        let total_sales_cents = records.iter().map(|r| r.sales_cents).fold(0i64, i64::saturating_add);
        let total_hours = records.iter().map(|r| r.total_hours).sum();
        let total_labor_wages_cents = records
            .iter()
            .map(|r| r.labor_wages_cents)
            .fold(0i64, i64::saturating_add);
        Self {
            days: records.len(),
            total_sales_cents,
            total_hours,
            total_labor_wages_cents,
            productivity: productivity(total_sales_cents, total_hours),
            labor_percent: labor_percent(total_labor_wages_cents, total_sales_cents),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn sale(date: NaiveDate, category: SalesCategory, cents: i64) -> SaleRecord {
        SaleRecord {
            location_id: 1,
            date,
            category,
            item: "Carry Out".into(),
            amount_cents: cents,
        }
    }

    fn labor(date: NaiveDate, regular: f64, overtime: f64, wages: i64) -> LaborRecord {
        LaborRecord {
            location_id: 1,
            date,
            regular_hours: regular,
            overtime_hours: overtime,
            regular_wages_cents: wages,
            overtime_wages_cents: 0,
        }
    }

    #[test]
    fn joins_sales_and_labor_by_date() {
        let sales = vec![
            sale(d(1), SalesCategory::Destination, 100_000),
            sale(d(1), SalesCategory::DayPart, 100_000),
            sale(d(3), SalesCategory::Destination, 50_000),
        ];
        let labor = vec![labor(d(1), 18.0, 2.0, 25_000), labor(d(2), 8.0, 0.0, 10_000)];
        let records = performance_report(&sales, &labor);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].date, d(1));
        assert_eq!(records[0].sales_cents, 100_000);
        assert_eq!(records[0].total_hours, 20.0);
        assert_eq!(records[0].productivity, 50.0);
        assert_eq!(records[0].labor_percent, 25.0);
        // Labor without sales.
        assert_eq!(records[1].sales_cents, 0);
        assert_eq!(records[1].labor_percent, 0.0);
        // Sales without labor.
        assert_eq!(records[2].total_hours, 0.0);
        assert_eq!(records[2].productivity, 0.0);
    }

    #[test]
    fn summary_ratios_use_range_totals() {
        let records = performance_report(
            &[sale(d(1), SalesCategory::Destination, 100_000), sale(d(2), SalesCategory::Destination, 300_000)],
            &[labor(d(1), 10.0, 0.0, 20_000), labor(d(2), 30.0, 0.0, 60_000)],
        );
        let summary = PerformanceSummary::calculate(&records);
        assert_eq!(summary.days, 2);
        assert_eq!(summary.total_sales_cents, 400_000);
        assert_eq!(summary.total_hours, 40.0);
        assert_eq!(summary.productivity, 100.0);
        assert_eq!(summary.labor_percent, 20.0);
        assert_eq!(PerformanceSummary::calculate(&[]), PerformanceSummary::default());
    }
}
