//! Imported roster rows → employee changes.
//!
//! Planning is pure: it reads the current employees of a location and a
//! parsed upload and returns the ordered changes. [`apply`] then issues the
//! changes one store call at a time and stops at the first failure.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;
use totem_reports::names::{canonical_time_punch_name, normalize_name_key};
use totem_reports::{BioEmployeeRow, BirthdateRow, Department, DepartmentRow};
use tracing::{debug, info};

use crate::error::{ReconError, StoreError};
use crate::model::{Employee, EmployeeId, LocationId, NewEmployee};
use crate::store::Store;

/// Lookups over a location's employees. Later employees win on key clashes.
pub struct EmployeeIndex<'a> {
    by_time_punch: HashMap<String, &'a Employee>,
    by_name: HashMap<String, &'a Employee>,
}

impl<'a> EmployeeIndex<'a> {
    pub fn new(employees: &'a [Employee]) -> Self {
        let mut by_time_punch = HashMap::with_capacity(employees.len());
        let mut by_name = HashMap::with_capacity(employees.len());
        for employee in employees {
            by_time_punch.insert(employee.time_punch_key(), employee);
            if let Some(key) = normalize_name_key(&employee.first_name, &employee.last_name) {
                by_name.insert(key, employee);
            }
        }
        Self { by_time_punch, by_name }
    }

    pub fn by_time_punch_key(&self, key: &str) -> Option<&'a Employee> {
        self.by_time_punch.get(key).copied()
    }

    pub fn by_name_key(&self, key: &str) -> Option<&'a Employee> {
        self.by_name.get(key).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum EmployeeChange {
    Create {
        first_name: String,
        last_name: String,
    },
    Rename {
        id: EmployeeId,
        first_name: String,
        last_name: String,
    },
    Reinstate {
        id: EmployeeId,
    },
    Terminate {
        id: EmployeeId,
        date: NaiveDate,
    },
    SetBirthday {
        id: EmployeeId,
        birthday: NaiveDate,
    },
    SetDepartment {
        id: EmployeeId,
        department: Department,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcilePlan {
    pub changes: Vec<EmployeeChange>,
    /// Upload rows that matched no employee.
    pub unmatched: usize,
}

/// Counts of applied changes by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileOutcome {
    pub created: usize,
    pub renamed: usize,
    pub reinstated: usize,
    pub terminated: usize,
    pub birthdays: usize,
    pub departments: usize,
    pub unmatched: usize,
}

impl ReconcileOutcome {
    pub fn applied(&self) -> usize {
        self.created + self.renamed + self.reinstated + self.terminated + self.birthdays + self.departments
    }
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// Diff a bio roster against the current employees.
///
/// Active roster rows are keyed by time-punch key. A known key may reinstate
/// and rename the same employee; an unknown key creates one. Every active
/// employee whose key is missing from the active roster is terminated on
/// `run_date`.
pub fn plan_bio_import(existing: &[Employee], rows: &[BioEmployeeRow], run_date: NaiveDate) -> ReconcilePlan {
    let index = EmployeeIndex::new(existing);

    let mut active: BTreeMap<&str, &BioEmployeeRow> = BTreeMap::new();
    for row in rows.iter().filter(|r| !r.terminated) {
        active.insert(row.time_punch_key.as_str(), row);
    }

    let mut changes = Vec::new();
    for (key, row) in &active {
        match index.by_time_punch_key(key) {
            Some(employee) => {
                if !employee.is_active() {
                    changes.push(EmployeeChange::Reinstate { id: employee.id });
                }
                if employee.first_name != row.first_name || employee.last_name != row.last_name {
                    changes.push(EmployeeChange::Rename {
                        id: employee.id,
                        first_name: row.first_name.clone(),
                        last_name: row.last_name.clone(),
                    });
                }
            }
            None => changes.push(EmployeeChange::Create {
                first_name: row.first_name.clone(),
                last_name: row.last_name.clone(),
            }),
        }
    }

    for employee in existing.iter().filter(|e| e.is_active()) {
        if !active.contains_key(employee.time_punch_key().as_str()) {
            changes.push(EmployeeChange::Terminate {
                id: employee.id,
                date: run_date,
            });
        }
    }

    debug!(rows = rows.len(), active = active.len(), changes = changes.len(), "planned bio import");
    ReconcilePlan { changes, unmatched: 0 }
}

/// Match birthdays by time-punch key; only changed birthdays are written.
pub fn plan_birthdate_import(existing: &[Employee], rows: &[BirthdateRow]) -> ReconcilePlan {
    let index = EmployeeIndex::new(existing);
    let mut current: HashMap<EmployeeId, Option<NaiveDate>> = HashMap::new();
    let mut plan = ReconcilePlan::default();

    for row in rows {
        let Some(employee) = index.by_time_punch_key(&row.time_punch_key) else {
            plan.unmatched += 1;
            continue;
        };
        let birthday = current.entry(employee.id).or_insert(employee.birthday);
        if *birthday == Some(row.birthday) {
            continue;
        }
        *birthday = Some(row.birthday);
        plan.changes.push(EmployeeChange::SetBirthday {
            id: employee.id,
            birthday: row.birthday,
        });
    }

    debug!(rows = rows.len(), changes = plan.changes.len(), unmatched = plan.unmatched, "planned birthdate import");
    plan
}

/// Match staff-table rows by strict name key, then by preferred name, then
/// by time-punch key. Only changed departments are written.
pub fn plan_department_import(existing: &[Employee], rows: &[DepartmentRow]) -> ReconcilePlan {
    let index = EmployeeIndex::new(existing);
    let mut current: HashMap<EmployeeId, Department> = HashMap::new();
    let mut plan = ReconcilePlan::default();

    for row in rows {
        let Some(employee) = match_department_row(&index, row) else {
            plan.unmatched += 1;
            continue;
        };
        let department = current.entry(employee.id).or_insert(employee.department);
        if *department == row.department {
            continue;
        }
        *department = row.department;
        plan.changes.push(EmployeeChange::SetDepartment {
            id: employee.id,
            department: row.department,
        });
    }

    debug!(rows = rows.len(), changes = plan.changes.len(), unmatched = plan.unmatched, "planned department import");
    plan
}

fn match_department_row<'a>(index: &EmployeeIndex<'a>, row: &DepartmentRow) -> Option<&'a Employee> {
    let primary = normalize_name_key(&row.first_name, &row.last_name).and_then(|k| index.by_name_key(&k));
    if primary.is_some() {
        return primary;
    }
    if !row.preferred_name.is_empty() {
        let preferred =
            normalize_name_key(&row.preferred_name, &row.last_name).and_then(|k| index.by_name_key(&k));
        if preferred.is_some() {
            return preferred;
        }
    }
    index.by_time_punch_key(&canonical_time_punch_name(&row.first_name, &row.last_name))
}

// ---------------------------------------------------------------------------
// Apply
// ---------------------------------------------------------------------------

/// Issue the plan's changes in order. The first store error aborts the rest;
/// earlier writes are kept.
pub fn apply<S: Store + ?Sized>(
    store: &mut S,
    location: LocationId,
    plan: &ReconcilePlan,
) -> Result<ReconcileOutcome, ReconError> {
    let mut outcome = ReconcileOutcome {
        unmatched: plan.unmatched,
        ..ReconcileOutcome::default()
    };

    for change in &plan.changes {
        apply_change(store, location, change, &mut outcome).map_err(|source| ReconError {
            applied: outcome.applied(),
            source,
        })?;
    }

    info!(
        location,
        created = outcome.created,
        renamed = outcome.renamed,
        reinstated = outcome.reinstated,
        terminated = outcome.terminated,
        birthdays = outcome.birthdays,
        departments = outcome.departments,
        unmatched = outcome.unmatched,
        "applied employee changes"
    );
    Ok(outcome)
}

fn apply_change<S: Store + ?Sized>(
    store: &mut S,
    location: LocationId,
    change: &EmployeeChange,
    outcome: &mut ReconcileOutcome,
) -> Result<(), StoreError> {
    match change {
        EmployeeChange::Create { first_name, last_name } => {
            let created = store.create_employee(
                location,
                NewEmployee {
                    first_name: first_name.clone(),
                    last_name: last_name.clone(),
                    ..NewEmployee::default()
                },
            )?;
            debug!(id = created.id, name = %created.display_name(), "created employee");
            outcome.created += 1;
        }
        EmployeeChange::Rename { id, first_name, last_name } => {
            let mut employee = store.get_employee(*id)?;
            employee.first_name = first_name.clone();
            employee.last_name = last_name.clone();
            store.update_employee(&employee)?;
            outcome.renamed += 1;
        }
        EmployeeChange::Reinstate { id } => {
            store.reinstate_employee(*id)?;
            outcome.reinstated += 1;
        }
        EmployeeChange::Terminate { id, date } => {
            store.terminate_employee(*id, *date)?;
            outcome.terminated += 1;
        }
        EmployeeChange::SetBirthday { id, birthday } => {
            let mut employee = store.get_employee(*id)?;
            employee.birthday = Some(*birthday);
            store.update_employee(&employee)?;
            outcome.birthdays += 1;
        }
        EmployeeChange::SetDepartment { id, department } => {
            let mut employee = store.get_employee(*id)?;
            employee.department = *department;
            store.update_employee(&employee)?;
            outcome.departments += 1;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Store-backed entry points
// ---------------------------------------------------------------------------

fn load_employees<S: Store + ?Sized>(store: &S, location: LocationId) -> Result<Vec<Employee>, ReconError> {
    store
        .list_employees(location)
        .map_err(|source| ReconError { applied: 0, source })
}

pub fn import_bio<S: Store + ?Sized>(
    store: &mut S,
    location: LocationId,
    rows: &[BioEmployeeRow],
    run_date: NaiveDate,
) -> Result<ReconcileOutcome, ReconError> {
    let existing = load_employees(store, location)?;
    let plan = plan_bio_import(&existing, rows, run_date);
    apply(store, location, &plan)
}

pub fn import_birthdates<S: Store + ?Sized>(
    store: &mut S,
    location: LocationId,
    rows: &[BirthdateRow],
) -> Result<ReconcileOutcome, ReconError> {
    let existing = load_employees(store, location)?;
    let plan = plan_birthdate_import(&existing, rows);
    apply(store, location, &plan)
}

pub fn import_departments<S: Store + ?Sized>(
    store: &mut S,
    location: LocationId,
    rows: &[DepartmentRow],
) -> Result<ReconcileOutcome, ReconError> {
    let existing = load_employees(store, location)?;
    let plan = plan_department_import(&existing, rows);
    apply(store, location, &plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn emp(id: EmployeeId, first: &str, last: &str) -> Employee {
        Employee {
            id,
            location_id: 1,
            first_name: first.into(),
            last_name: last.into(),
            time_punch_name: String::new(),
            department: Department::None,
            birthday: None,
            annual_salary_cents: None,
            termination_date: None,
        }
    }

    fn bio(first: &str, last: &str, terminated: bool) -> BioEmployeeRow {
        BioEmployeeRow {
            first_name: first.into(),
            last_name: last.into(),
            time_punch_key: canonical_time_punch_name(first, last),
            terminated,
        }
    }

    fn dept(first: &str, last: &str, preferred: &str, department: Department) -> DepartmentRow {
        DepartmentRow {
            first_name: first.into(),
            last_name: last.into(),
            preferred_name: preferred.into(),
            department,
        }
    }

    #[test]
    fn bio_creates_renames_and_terminates() {
        let existing = vec![emp(1, "JOHN", "Smith"), emp(2, "Ann", "Lee")];
        let rows = vec![bio("John", "Smith", false), bio("Kim", "Park", false), bio("Ann", "Lee", true)];
        let plan = plan_bio_import(&existing, &rows, d(2024, 5, 1));
        assert_eq!(
            plan.changes,
            vec![
                EmployeeChange::Create { first_name: "Kim".into(), last_name: "Park".into() },
                EmployeeChange::Rename { id: 1, first_name: "John".into(), last_name: "Smith".into() },
                EmployeeChange::Terminate { id: 2, date: d(2024, 5, 1) },
            ]
        );
    }

    #[test]
    fn bio_reinstates_terminated_employee() {
        let mut john = emp(1, "John", "Smith");
        john.termination_date = Some(d(2023, 1, 1));
        let plan = plan_bio_import(&[john], &[bio("John", "Smith", false)], d(2024, 5, 1));
        assert_eq!(plan.changes, vec![EmployeeChange::Reinstate { id: 1 }]);
    }

    #[test]
    fn bio_leaves_terminated_absentees_alone() {
        let mut ann = emp(2, "Ann", "Lee");
        ann.termination_date = Some(d(2023, 1, 1));
        let plan = plan_bio_import(&[ann], &[], d(2024, 5, 1));
        assert!(plan.changes.is_empty());
    }

    #[test]
    fn bio_matches_on_stored_punch_name() {
        let mut johnny = emp(1, "Johnny", "Smith");
        johnny.time_punch_name = "Smith, John".into();
        let plan = plan_bio_import(&[johnny], &[bio("John", "Smith", false)], d(2024, 5, 1));
        assert_eq!(
            plan.changes,
            vec![EmployeeChange::Rename { id: 1, first_name: "John".into(), last_name: "Smith".into() }]
        );
    }

    #[test]
    fn birthdays_only_when_changed() {
        let mut john = emp(1, "John", "Smith");
        john.birthday = Some(d(1990, 1, 1));
        let ann = emp(2, "Ann", "Lee");
        let rows = vec![
            BirthdateRow { time_punch_key: "smith, john".into(), birthday: d(1990, 1, 1) },
            BirthdateRow { time_punch_key: "lee, ann".into(), birthday: d(1995, 6, 1) },
            BirthdateRow { time_punch_key: "lee, ann".into(), birthday: d(1995, 6, 1) },
            BirthdateRow { time_punch_key: "nobody, here".into(), birthday: d(1995, 6, 1) },
        ];
        let plan = plan_birthdate_import(&[john, ann], &rows);
        assert_eq!(plan.changes, vec![EmployeeChange::SetBirthday { id: 2, birthday: d(1995, 6, 1) }]);
        assert_eq!(plan.unmatched, 1);
    }

    #[test]
    fn department_match_priority() {
        let mut zed = emp(3, "Z", "Ng");
        zed.time_punch_name = "Ng, Zed".into();
        let existing = vec![emp(1, "Robert (Bob)", "Jones"), emp(2, "Bobby", "Jones-Smith"), zed];
        let rows = vec![
            dept("Robert", "Jones", "", Department::Foh),
            dept("Robert", "Jones Smith", "Bobby", Department::Boh),
            dept("Zed", "Ng", "", Department::Director),
            dept("No", "Match", "", Department::Partner),
        ];
        let plan = plan_department_import(&existing, &rows);
        assert_eq!(
            plan.changes,
            vec![
                EmployeeChange::SetDepartment { id: 1, department: Department::Foh },
                EmployeeChange::SetDepartment { id: 2, department: Department::Boh },
                EmployeeChange::SetDepartment { id: 3, department: Department::Director },
            ]
        );
        assert_eq!(plan.unmatched, 1);
    }

    #[test]
    fn unchanged_department_is_skipped() {
        let mut john = emp(1, "John", "Smith");
        john.department = Department::Boh;
        let plan = plan_department_import(&[john], &[dept("John", "Smith", "", Department::Boh)]);
        assert!(plan.changes.is_empty());
        assert_eq!(plan.unmatched, 0);
    }
}
