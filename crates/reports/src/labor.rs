//! Labor "raw text" report → grand-total hours and wages.

use serde::Serialize;
use tracing::warn;

use crate::money::{parse_hours, parse_money};

const GRAND_TOTAL_PREFIX: &str = "All Employees Grand Total";
const MIN_FIELDS: usize = 9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LaborTotals {
    pub regular_hours: f64,
    pub regular_wages_cents: i64,
    pub overtime_hours: f64,
    pub overtime_wages_cents: i64,
}

impl LaborTotals {
    pub fn total_hours(&self) -> f64 {
        self.regular_hours + self.overtime_hours
    }

    pub fn total_wages_cents(&self) -> i64 {
        self.regular_wages_cents.saturating_add(self.overtime_wages_cents)
    }
}

/// Parse the first grand total line.
///
/// Fields 5..=8 (whitespace split) are regular hours, regular wages,
/// overtime hours and overtime wages. A missing or short line yields zeros.
pub fn parse_labor_report(text: &str) -> LaborTotals {
    let Some(line) = text
        .lines()
        .map(str::trim)
        .find(|l| l.starts_with(GRAND_TOTAL_PREFIX))
    else {
        warn!("labor report has no grand total line");
        return LaborTotals::default();
    };

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MIN_FIELDS {
        warn!(fields = fields.len(), "labor grand total line is too short");
        return LaborTotals::default();
    }

    LaborTotals {
        regular_hours: parse_hours(fields[5]),
        regular_wages_cents: parse_money(fields[6]),
        overtime_hours: parse_hours(fields[7]),
        overtime_wages_cents: parse_money(fields[8]),
    }
}
