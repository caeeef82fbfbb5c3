//! Time-punch report + roster + payroll events → labor summary.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use totem_reports::money::to_dollars;
use totem_reports::names::canonical_time_punch_key_from_value;
use totem_reports::{Department, TimePunchReport};
use tracing::debug;

use crate::model::{Employee, EmployeeId, PayrollEvent};
use crate::reconcile::EmployeeIndex;

/// Summary bucket: a stored department, or the synthetic terminated bucket
/// for terminated and unmatched employees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    Department(Department),
    Terminated,
}

impl Bucket {
    /// Every bucket in display order, terminated last.
    pub fn all() -> impl Iterator<Item = Bucket> {
        Department::ALL
            .into_iter()
            .map(Bucket::Department)
            .chain(std::iter::once(Bucket::Terminated))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Department(d) => d.as_str(),
            Self::Terminated => "TERMINATED",
        }
    }

    fn for_employee(employee: &Employee) -> Self {
        if employee.is_active() {
            Self::Department(employee.department)
        } else {
            Self::Terminated
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Bucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeSummary {
    /// Report name, or `Last, First` for rows without punches.
    pub name: String,
    pub employee_id: Option<EmployeeId>,
    pub department: Bucket,
    pub hours: f64,
    pub wages_cents: i64,
    pub payroll_cents: i64,
    pub salary_cents: i64,
}

impl EmployeeSummary {
    pub fn total_cents(&self) -> i64 {
        self.wages_cents
            .saturating_add(self.payroll_cents)
            .saturating_add(self.salary_cents)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentSummary {
    pub department: Bucket,
    pub hours: f64,
    /// Punch wages plus payroll events plus prorated salary.
    pub wages_cents: i64,
    pub employees: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimePunchSummary {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub day_count: i64,
    pub employees: Vec<EmployeeSummary>,
    pub departments: Vec<DepartmentSummary>,
    pub total_hours: f64,
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub punch_wages_cents: i64,
    pub payroll_amount_cents: i64,
    pub salary_amount_cents: i64,
    pub total_wages_cents: i64,
    /// Punch names that matched no employee.
    pub unmatched: usize,
    pub total_sales_cents: Option<i64>,
    /// Sales dollars per labor hour.
    pub productivity: Option<f64>,
}

impl TimePunchSummary {
    /// Fill in sales and productivity. Productivity stays `None` without
    /// labor hours.
    pub fn with_sales(mut self, total_sales_cents: i64) -> Self {
        self.total_sales_cents = Some(total_sales_cents);
        self.productivity = if self.total_hours > 0.0 {
            Some(to_dollars(total_sales_cents) / self.total_hours)
        } else {
            None
        };
        self
    }

    pub fn department(&self, bucket: Bucket) -> Option<&DepartmentSummary> {
        self.departments.iter().find(|d| d.department == bucket)
    }
}

/// Inclusive day count, or 0 when either end is missing or the range is
/// reversed.
pub fn day_count(start: Option<NaiveDate>, end: Option<NaiveDate>) -> i64 {
    match (start, end) {
        (Some(start), Some(end)) if end >= start => (end - start).num_days() + 1,
        _ => 0,
    }
}

/// `annual / 365 * days`, rounded to cents.
pub fn prorate_salary(annual_cents: i64, days: i64) -> i64 {
    (annual_cents as f64 / 365.0 * days as f64).round() as i64
}

/// Roll up a time-punch report over `start..=end`.
///
/// `employees` is the location roster; `events` are the payroll events
/// already filtered to the range.
pub fn summarize(
    report: &TimePunchReport,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    employees: &[Employee],
    events: &[PayrollEvent],
) -> TimePunchSummary {
    let index = EmployeeIndex::new(employees);
    let mut rows: Vec<EmployeeSummary> = Vec::new();
    let mut row_of: HashMap<EmployeeId, usize> = HashMap::new();
    let mut punched: HashSet<EmployeeId> = HashSet::new();
    let mut unmatched = 0usize;

    for punch in &report.employees {
        let key = canonical_time_punch_key_from_value(&punch.name);
        let Some(employee) = index.by_time_punch_key(&key) else {
            unmatched += 1;
            rows.push(EmployeeSummary {
                name: punch.name.clone(),
                employee_id: None,
                department: Bucket::Terminated,
                hours: punch.hours,
                wages_cents: punch.wages_cents,
                payroll_cents: 0,
                salary_cents: 0,
            });
            continue;
        };
        punched.insert(employee.id);
        let row = row_for(&mut rows, &mut row_of, employee, &punch.name);
        row.hours += punch.hours;
        row.wages_cents = row.wages_cents.saturating_add(punch.wages_cents);
    }

    let mut payroll_amount_cents: i64 = 0;
    for event in events {
        let Some(employee) = employees.iter().find(|e| e.id == event.employee_id) else {
            debug!(event = event.id, employee = event.employee_id, "payroll event for unknown employee");
            continue;
        };
        let row = row_for(&mut rows, &mut row_of, employee, &roster_name(employee));
        row.payroll_cents = row.payroll_cents.saturating_add(event.amount_cents);
        payroll_amount_cents = payroll_amount_cents.saturating_add(event.amount_cents);
    }

    let days = day_count(start, end);
    let mut salary_amount_cents: i64 = 0;
    if let Some(range_start) = start.filter(|_| days > 0) {
        for employee in employees {
            let annual = employee.annual_salary_cents.unwrap_or(0);
            if annual <= 0 || punched.contains(&employee.id) {
                continue;
            }
            if employee.termination_date.is_some_and(|t| t < range_start) {
                continue;
            }
            let prorated = prorate_salary(annual, days);
            let row = row_for(&mut rows, &mut row_of, employee, &roster_name(employee));
            row.salary_cents = row.salary_cents.saturating_add(prorated);
            salary_amount_cents = salary_amount_cents.saturating_add(prorated);
        }
    }

    rows.sort_by(|a, b| a.department.cmp(&b.department).then_with(|| a.name.cmp(&b.name)));

    let departments: Vec<DepartmentSummary> = Bucket::all()
        .map(|bucket| {
            let members = rows.iter().filter(|r| r.department == bucket);
            members.fold(
                DepartmentSummary {
                    department: bucket,
                    hours: 0.0,
                    wages_cents: 0,
                    employees: 0,
                },
                |mut acc, r| {
                    acc.hours += r.hours;
                    acc.wages_cents = acc.wages_cents.saturating_add(r.total_cents());
                    acc.employees += 1;
                    acc
                },
            )
        })
        .collect();

    let punch_hours: f64 = report.employees.iter().map(|p| p.hours).sum();
    let punch_wages_cents = report
        .employees
        .iter()
        .map(|p| p.wages_cents)
        .fold(0i64, i64::saturating_add);
    let total_hours = if report.totals.total_hours > 0.0 {
        report.totals.total_hours
    } else {
        punch_hours
    };

    debug!(rows = rows.len(), unmatched, days, "summarized time punch report");
    TimePunchSummary {
        start,
        end,
        day_count: days,
        employees: rows,
        departments,
        total_hours,
        regular_hours: report.totals.regular_hours,
        overtime_hours: report.totals.overtime_hours,
        punch_wages_cents,
        payroll_amount_cents,
        salary_amount_cents,
        total_wages_cents: punch_wages_cents
            .saturating_add(payroll_amount_cents)
            .saturating_add(salary_amount_cents),
        unmatched,
        total_sales_cents: None,
        productivity: None,
    }
}

fn roster_name(employee: &Employee) -> String {
    format!("{}, {}", employee.last_name, employee.first_name)
}

/// The summary row for `employee`, created on first use.
fn row_for<'r>(
    rows: &'r mut Vec<EmployeeSummary>,
    row_of: &mut HashMap<EmployeeId, usize>,
    employee: &Employee,
    name: &str,
) -> &'r mut EmployeeSummary {
    let idx = *row_of.entry(employee.id).or_insert_with(|| {
        rows.push(EmployeeSummary {
            name: name.to_string(),
            employee_id: Some(employee.id),
            department: Bucket::for_employee(employee),
            hours: 0.0,
            wages_cents: 0,
            payroll_cents: 0,
            salary_cents: 0,
        });
        rows.len() - 1
    });
    &mut rows[idx]
}
