//! Report date ranges.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

/// Preset ranges offered next to a date filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonRanges {
    pub month_start: NaiveDate,
    pub ninety_start: NaiveDate,
    pub ytd_start: NaiveDate,
    pub today: NaiveDate,
}

impl CommonRanges {
    pub fn for_today(today: NaiveDate) -> Self {
        Self {
            month_start: today.with_day(1).unwrap_or(today),
            ninety_start: today - Duration::days(90),
            ytd_start: NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
            today,
        }
    }
}

/// Fill a partially specified range.
///
/// Neither end: the last `default_days` days ending today. Only an end:
/// `default_days` before it. Only a start: through today.
pub fn resolve_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
    default_days: u32,
) -> (NaiveDate, NaiveDate) {
    let span = Duration::days(i64::from(default_days));
    match (start, end) {
        (Some(start), Some(end)) => (start, end),
        (Some(start), None) => (start, today),
        (None, Some(end)) => (end - span, end),
        (None, None) => (today - span, today),
    }
}
