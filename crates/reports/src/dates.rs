//! Date normalization for loosely formatted export cells.

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

/// Field order of a date layout.
#[derive(Clone, Copy)]
enum Order {
    YearMonthDay,
    MonthDayYear,
}

/// Accepted date layouts in priority order: ISO, US slash, US dash, with
/// four- before two-digit years.
const DATE_LAYOUTS: &[(&str, Order)] = &[
    (r"^(\d{4})-(\d{1,2})-(\d{1,2})$", Order::YearMonthDay),
    (r"^(\d{1,2})/(\d{1,2})/(\d{4})$", Order::MonthDayYear),
    (r"^(\d{1,2})/(\d{1,2})/(\d{2})$", Order::MonthDayYear),
    (r"^(\d{1,2})-(\d{1,2})-(\d{4})$", Order::MonthDayYear),
    (r"^(\d{1,2})-(\d{1,2})-(\d{2})$", Order::MonthDayYear),
];

const TIMESTAMP_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

fn layouts() -> &'static [(Regex, Order)] {
    static LAYOUTS: OnceLock<Vec<(Regex, Order)>> = OnceLock::new();
    LAYOUTS.get_or_init(|| {
        DATE_LAYOUTS
            .iter()
            .map(|(shape, order)| (Regex::new(shape).expect("static date shape"), *order))
            .collect()
    })
}

/// Parse a birthday-style value: ISO, US slash or dash, 2- or 4-digit
/// years, or an ISO timestamp. First matching layout wins.
/// Two-digit years 00-68 map to 20xx, 69-99 to 19xx.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for (shape, order) in layouts() {
        let Some(caps) = shape.captures(value) else {
            continue;
        };
        let field = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or("");
        let (year, month, day) = match order {
            Order::YearMonthDay => (field(1), field(2), field(3)),
            Order::MonthDayYear => (field(3), field(1), field(2)),
        };
        if let Some(date) = build_date(year, month, day) {
            return Some(date);
        }
    }

    NaiveDateTime::parse_from_str(value, TIMESTAMP_LAYOUT)
        .ok()
        .map(|ts| ts.date())
}

fn build_date(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let mut y: i32 = year.parse().ok()?;
    if year.len() == 2 {
        y += if y < 69 { 2000 } else { 1900 };
    }
    NaiveDate::from_ymd_opt(y, month.parse().ok()?, day.parse().ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn all_layouts_normalize_to_same_day() {
        for value in [
            "2006-01-02",
            "1/2/2006",
            "01/02/2006",
            "1/2/06",
            "01/02/06",
            "1-2-2006",
            "01-02-2006",
            "1-2-06",
            "01-02-06",
            "2006-01-02 15:04:05",
        ] {
            assert_eq!(parse_date(value), Some(ymd(2006, 1, 2)), "{value}");
        }
    }

    #[test]
    fn two_digit_year_pivot() {
        assert_eq!(parse_date("3/4/68"), Some(ymd(2068, 3, 4)));
        assert_eq!(parse_date("3/4/69"), Some(ymd(1969, 3, 4)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("soon"), None);
        assert_eq!(parse_date("13/45/2006"), None);
        assert_eq!(parse_date("2006/01/02"), None);
    }
}
