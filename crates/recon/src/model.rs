use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use totem_reports::names::{canonical_time_punch_key_from_value, canonical_time_punch_name};
use totem_reports::{Department, SalesCategory};

pub type LocationId = i64;
pub type EmployeeId = i64;

// ---------------------------------------------------------------------------
// Locations + employees
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    /// Store number as printed on exports.
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub location_id: LocationId,
    pub first_name: String,
    pub last_name: String,
    /// Raw punch-clock name; empty means derive from first/last.
    #[serde(default)]
    pub time_punch_name: String,
    #[serde(default)]
    pub department: Department,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub annual_salary_cents: Option<i64>,
    /// `None` while active.
    #[serde(default)]
    pub termination_date: Option<NaiveDate>,
}

impl Employee {
    pub fn is_active(&self) -> bool {
        self.termination_date.is_none()
    }

    /// Canonical `"last, first"` key, preferring the stored punch name.
    pub fn time_punch_key(&self) -> String {
        let stored = canonical_time_punch_key_from_value(&self.time_punch_name);
        if stored.is_empty() {
            canonical_time_punch_name(&self.first_name, &self.last_name)
        } else {
            stored
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fields for a new employee; the store assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub time_punch_name: String,
    pub department: Department,
    pub birthday: Option<NaiveDate>,
    pub annual_salary_cents: Option<i64>,
}

// ---------------------------------------------------------------------------
// Sales + labor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub location_id: LocationId,
    pub date: NaiveDate,
    pub category: SalesCategory,
    pub item: String,
    pub amount_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborRecord {
    pub location_id: LocationId,
    pub date: NaiveDate,
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub regular_wages_cents: i64,
    pub overtime_wages_cents: i64,
}

impl LaborRecord {
    pub fn total_hours(&self) -> f64 {
        self.regular_hours + self.overtime_hours
    }

    pub fn total_wages_cents(&self) -> i64 {
        self.regular_wages_cents.saturating_add(self.overtime_wages_cents)
    }
}

// ---------------------------------------------------------------------------
// Payroll events + salaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayrollEventType {
    Bonus,
    #[serde(rename = "Tip Out")]
    TipOut,
    Adjustment,
    Reimbursement,
    Other,
}

impl PayrollEventType {
    pub const ALL: [PayrollEventType; 5] = [
        Self::Bonus,
        Self::TipOut,
        Self::Adjustment,
        Self::Reimbursement,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bonus => "Bonus",
            Self::TipOut => "Tip Out",
            Self::Adjustment => "Adjustment",
            Self::Reimbursement => "Reimbursement",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for PayrollEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayrollEventType {
    type Err = String;

    /// Case-insensitive; spaces, dashes and underscores are ignored so
    /// `tip-out` and `TipOut` both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squash = |v: &str| {
            v.chars()
                .filter(|c| !matches!(c, ' ' | '-' | '_'))
                .collect::<String>()
                .to_lowercase()
        };
        let wanted = squash(s);
        Self::ALL
            .into_iter()
            .find(|t| squash(t.as_str()) == wanted)
            .ok_or_else(|| format!("unknown payroll event type: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollEvent {
    pub id: i64,
    pub location_id: LocationId,
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub event_type: PayrollEventType,
    pub description: String,
    pub amount_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayrollEvent {
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub event_type: PayrollEventType,
    pub description: String,
    pub amount_cents: i64,
}

/// Location-level salary line, independent of the employee roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salary {
    pub id: i64,
    pub location_id: LocationId,
    pub name: String,
    pub annual_cents: i64,
}

impl Salary {
    /// `annual / 365`, rounded to cents.
    pub fn daily_cents(&self) -> i64 {
        daily_rate_cents(self.annual_cents)
    }
}

pub fn daily_rate_cents(annual_cents: i64) -> i64 {
    (annual_cents as f64 / 365.0).round() as i64
}

/// Annual and daily totals over a set of salaries.
pub fn salary_totals(salaries: &[Salary]) -> (i64, i64) {
    salaries.iter().fold((0i64, 0i64), |(annual, daily), s| {
        (annual.saturating_add(s.annual_cents), daily.saturating_add(s.daily_cents()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(first: &str, last: &str, punch: &str) -> Employee {
        Employee {
            id: 1,
            location_id: 1,
            first_name: first.into(),
            last_name: last.into(),
            time_punch_name: punch.into(),
            department: Department::None,
            birthday: None,
            annual_salary_cents: None,
            termination_date: None,
        }
    }

    #[test]
    fn time_punch_key_prefers_stored_name() {
        assert_eq!(employee("John", "Smith", "").time_punch_key(), "smith, john");
        assert_eq!(
            employee("Johnny", "Smith", "Smith, John").time_punch_key(),
            "smith, john"
        );
    }

    #[test]
    fn payroll_event_type_parsing() {
        assert_eq!("tip out".parse::<PayrollEventType>(), Ok(PayrollEventType::TipOut));
        assert_eq!("Tip-Out".parse::<PayrollEventType>(), Ok(PayrollEventType::TipOut));
        assert_eq!("BONUS".parse::<PayrollEventType>(), Ok(PayrollEventType::Bonus));
        assert!("raise".parse::<PayrollEventType>().is_err());
    }

    #[test]
    fn salary_daily_rate() {
        let s = Salary {
            id: 1,
            location_id: 1,
            name: "GM".into(),
            annual_cents: 3_650_000,
        };
        assert_eq!(s.daily_cents(), 10_000);
        assert_eq!(salary_totals(&[s.clone(), s]), (7_300_000, 20_000));
    }
}
