//! Time-punch text report → per-employee hours and wages.
//!
//! The export is a printed report flattened to text. Each employee block is
//! a name line, one line per punch (prefixed with a weekday abbreviation)
//! and an `Employee Totals` line. The report ends with an
//! `All Employees Grand Total` line.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::dates::parse_date;
use crate::error::ReportError;
use crate::money::{parse_hours, parse_money};

const GRAND_TOTAL_PREFIX: &str = "All Employees Grand Total";
const EMPLOYEE_TOTALS_PREFIX: &str = "Employee Totals";
const WEEKDAYS: &[&str] = &["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimePunchEmployeeTotals {
    /// Name exactly as printed on the report.
    pub name: String,
    pub hours: f64,
    pub wages_cents: i64,
}

/// Report-level totals from the grand total line.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimePunchTotals {
    pub total_hours: f64,
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub regular_wages_cents: i64,
    pub overtime_wages_cents: i64,
    pub total_wages_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimePunchReport {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub employees: Vec<TimePunchEmployeeTotals>,
    pub totals: TimePunchTotals,
}

fn time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d+:\d{2}\b").expect("static regex"))
}

fn money_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?\$-?[\d,]+(?:\.\d+)?").expect("static regex"))
}

fn range_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bfrom\s+(\S+)\s+through\s+(\S+)").expect("static regex"))
}

/// Parse a time-punch report. Fails only when no employee totals are found.
pub fn parse_time_punch(text: &str) -> Result<TimePunchReport, ReportError> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();

    let mut report = TimePunchReport {
        start: None,
        end: None,
        employees: Vec::new(),
        totals: TimePunchTotals::default(),
    };
    // Name lookups never cross the previous totals line.
    let mut block_start = 0usize;

    for (i, line) in lines.iter().enumerate() {
        if line.starts_with(GRAND_TOTAL_PREFIX) {
            report.totals = grand_totals(line);
            block_start = i + 1;
            continue;
        }

        if let Some(caps) = range_re().captures(line) {
            let start = caps.get(1).and_then(|m| parse_date(m.as_str()));
            let end = caps.get(2).and_then(|m| parse_date(m.as_str()));
            if start.is_some() || end.is_some() {
                report.start = start;
                report.end = end;
            }
        }

        if line.starts_with(EMPLOYEE_TOTALS_PREFIX) {
            match find_employee_name(&lines[block_start..i]) {
                Some(name) => report.employees.push(TimePunchEmployeeTotals {
                    name: name.to_string(),
                    hours: time_re().find(line).map(|m| parse_hours(m.as_str())).unwrap_or(0.0),
                    wages_cents: money_re()
                        .find_iter(line)
                        .last()
                        .map(|m| parse_money(m.as_str()))
                        .unwrap_or(0),
                }),
                None => debug!(line = i + 1, "employee totals without a name line"),
            }
            block_start = i + 1;
        }
    }

    if report.employees.is_empty() {
        return Err(ReportError::NoEmployeeTotals);
    }
    debug!(employees = report.employees.len(), "parsed time punch report");
    Ok(report)
}

/// Nearest line before the totals line that reads as `Last, First`.
fn find_employee_name<'a>(block: &[&'a str]) -> Option<&'a str> {
    block.iter().rev().copied().find(|line| is_name_line(line))
}

fn is_name_line(line: &str) -> bool {
    if line.is_empty() || line.starts_with("* ") || !line.contains(',') {
        return false;
    }
    let first_token = line.split_whitespace().next().unwrap_or("");
    !WEEKDAYS.contains(&first_token)
}

/// Hour tokens: total, regular, overtime. Money tokens: regular, overtime,
/// total wages. Missing tokens stay zero.
fn grand_totals(line: &str) -> TimePunchTotals {
    let hours: Vec<f64> = time_re().find_iter(line).map(|m| parse_hours(m.as_str())).collect();
    let money: Vec<i64> = money_re().find_iter(line).map(|m| parse_money(m.as_str())).collect();
    let hour = |i: usize| hours.get(i).copied().unwrap_or(0.0);
    let cents = |i: usize| money.get(i).copied().unwrap_or(0);

    TimePunchTotals {
        total_hours: hour(0),
        regular_hours: hour(1),
        overtime_hours: hour(2),
        regular_wages_cents: cents(0),
        overtime_wages_cents: cents(1),
        total_wages_cents: cents(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "\
Time Detail Report
Location 01234 from 1/1/2024 through 1/7/2024

Smith, John
Mon 1/1/2024 8:00 AM 4:30 PM 8:30 $127.50
Tue 1/2/2024 8:00 AM 12:00 PM 4:00 $60.00
* Missed break, manager approved
Employee Totals 12:30 12:30 0:00 $187.50 $0.00 $187.50

Doe, Jane
Wed 1/3/2024 9:00 AM 7:00 PM 10:00 $160.00
Employee Totals 10:00 10:00 0:00 $160.00 $0.00 $160.00

All Employees Grand Total 22:30 22:00 0:30 $340.00 $7.50 $347.50
";

    #[test]
    fn parses_employee_totals() {
        let report = parse_time_punch(REPORT).unwrap();
        assert_eq!(report.employees.len(), 2);
        assert_eq!(report.employees[0].name, "Smith, John");
        assert_eq!(report.employees[0].hours, 12.5);
        assert_eq!(report.employees[0].wages_cents, 18750);
        assert_eq!(report.employees[1].name, "Doe, Jane");
        assert_eq!(report.employees[1].hours, 10.0);
        assert_eq!(report.employees[1].wages_cents, 16000);
    }

    #[test]
    fn parses_range_and_grand_totals() {
        let report = parse_time_punch(REPORT).unwrap();
        assert_eq!(report.start, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(report.end, NaiveDate::from_ymd_opt(2024, 1, 7));
        assert_eq!(report.totals.total_hours, 22.5);
        assert_eq!(report.totals.regular_hours, 22.0);
        assert_eq!(report.totals.overtime_hours, 0.5);
        assert_eq!(report.totals.regular_wages_cents, 34000);
        assert_eq!(report.totals.overtime_wages_cents, 750);
        assert_eq!(report.totals.total_wages_cents, 34750);
    }

    #[test]
    fn totals_without_name_are_skipped() {
        let text = "\
Mon 1/1/2024 8:00 $10.00
Employee Totals 8:00 $10.00
Lee, Ann
Employee Totals 2:00 $20.00
";
        let report = parse_time_punch(text).unwrap();
        assert_eq!(report.employees.len(), 1);
        assert_eq!(report.employees[0].name, "Lee, Ann");
        assert_eq!(report.start, None);
    }

    #[test]
    fn missing_tokens_degrade_to_zero() {
        let report = parse_time_punch("Lee, Ann\nEmployee Totals n/a\nAll Employees Grand Total").unwrap();
        assert_eq!(report.employees[0].hours, 0.0);
        assert_eq!(report.employees[0].wages_cents, 0);
        assert_eq!(report.totals, TimePunchTotals::default());
    }

    #[test]
    fn no_employee_totals_is_an_error() {
        assert_eq!(
            parse_time_punch("All Employees Grand Total 1:00 $1.00"),
            Err(ReportError::NoEmployeeTotals)
        );
        assert_eq!(parse_time_punch(""), Err(ReportError::NoEmployeeTotals));
    }
}
