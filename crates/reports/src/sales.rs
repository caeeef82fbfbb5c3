//! Point-of-sale "raw text" sales report → day-part and destination totals.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::money::parse_money;

/// Marker after which destination lines repeat as report totals.
const REPORT_TOTALS_PREFIX: &str = "Report Totals:";

/// Day parts in display order.
pub const DAY_PARTS: &[&str] = &["Breakfast", "Lunch", "Afternoon", "Dinner", "Evening"];

/// (line prefix, destination name) in display order.
pub const DESTINATIONS: &[(&str, &str)] = &[
    ("CARRY OUT", "Carry Out"),
    ("DELIVERY", "Catering Delivery"),
    ("PICKUP", "Catering Pickup"),
    ("DINE IN", "Dine-In"),
    ("DRIVE THRU", "Drive-Thru"),
    ("M-CARRYOUT", "Mobile Carryout"),
    ("M-DINEIN", "Mobile Dine-In"),
    ("M-DRIVE-THRU", "Mobile Drive-Thru"),
    ("ON DEMAND", "Third-Party Delivery"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SalesCategory {
    DayPart,
    Destination,
}

impl SalesCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DayPart => "DayPart",
            Self::Destination => "Destination",
        }
    }

    /// Canonical item name for `name`, matched case-insensitively.
    pub fn item_named(&self, name: &str) -> Option<&'static str> {
        let name = name.trim();
        self.items().into_iter().find(|item| item.eq_ignore_ascii_case(name))
    }

    /// Known item names for this category, in display order.
    pub fn items(&self) -> Vec<&'static str> {
        match self {
            Self::DayPart => DAY_PARTS.to_vec(),
            Self::Destination => DESTINATIONS.iter().map(|(_, name)| *name).collect(),
        }
    }
}

impl std::fmt::Display for SalesCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesLine {
    pub category: SalesCategory,
    pub item: String,
    pub amount_cents: i64,
}

/// Summed lines, day parts first, each in display order. Items absent from
/// the report are absent here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SalesReport {
    pub lines: Vec<SalesLine>,
}

impl SalesReport {
    pub fn amount(&self, category: SalesCategory, item: &str) -> Option<i64> {
        self.lines
            .iter()
            .find(|l| l.category == category && l.item == item)
            .map(|l| l.amount_cents)
    }

    pub fn total(&self, category: SalesCategory) -> i64 {
        self.lines
            .iter()
            .filter(|l| l.category == category)
            .map(|l| l.amount_cents)
            .fold(0i64, i64::saturating_add)
    }

    fn add(&mut self, category: SalesCategory, item: &str, amount_cents: i64) {
        match self
            .lines
            .iter_mut()
            .find(|l| l.category == category && l.item == item)
        {
            Some(line) => line.amount_cents = line.amount_cents.saturating_add(amount_cents),
            None => self.lines.push(SalesLine {
                category,
                item: item.to_string(),
                amount_cents,
            }),
        }
    }

    fn sort(&mut self) {
        let rank = |line: &SalesLine| {
            let pos = line
                .category
                .items()
                .iter()
                .position(|name| *name == line.item)
                .unwrap_or(usize::MAX);
            (line.category, pos)
        };
        self.lines.sort_by_key(rank);
    }
}

/// Hand-entered lines; repeated items sum and the result is in display order.
impl FromIterator<SalesLine> for SalesReport {
    fn from_iter<I: IntoIterator<Item = SalesLine>>(iter: I) -> Self {
        let mut report = SalesReport::default();
        for line in iter {
            report.add(line.category, &line.item, line.amount_cents);
        }
        report.sort();
        report
    }
}

/// Parse a raw-text sales report. Never fails; unrecognized lines are
/// ignored.
pub fn parse_sales_report(text: &str) -> SalesReport {
    let mut report = SalesReport::default();
    let mut seen_report_totals = false;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with(REPORT_TOTALS_PREFIX) {
            seen_report_totals = true;
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            continue;
        }

        if let Some(day_part) = match_day_part(&tokens) {
            report.add(SalesCategory::DayPart, day_part, parse_money(tokens[4]));
            continue;
        }

        if seen_report_totals {
            continue;
        }
        if let Some((prefix, name)) = match_destination(line) {
            let idx = prefix.split_whitespace().count() + 1;
            if let Some(token) = tokens.get(idx) {
                report.add(SalesCategory::Destination, name, parse_money(token));
            }
        }
    }

    report.sort();
    debug!(lines = report.lines.len(), "parsed sales report");
    report
}

/// `N - <DayPart> <count> <amount> ...`
fn match_day_part(tokens: &[&str]) -> Option<&'static str> {
    if tokens.len() < 5 || tokens[1] != "-" {
        return None;
    }
    DAY_PARTS.iter().copied().find(|part| *part == tokens[2])
}

/// Longest matching destination prefix.
fn match_destination(line: &str) -> Option<(&'static str, &'static str)> {
    DESTINATIONS
        .iter()
        .copied()
        .filter(|(prefix, _)| line.starts_with(prefix))
        .max_by_key(|(prefix, _)| prefix.len())
}
