use chrono::NaiveDate;
use totem_recon::reconcile::{apply, import_bio, import_departments, plan_bio_import};
use totem_recon::summary::summarize;
use totem_recon::{
    Bucket, Employee, MemoryStore, NewEmployee, NewPayrollEvent, PayrollEventType, ReconError, Store,
    StoreError,
};
use totem_reports::{parse_departments, parse_time_punch, BioEmployeeRow, Department};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn bio(first: &str, last: &str) -> BioEmployeeRow {
    BioEmployeeRow {
        first_name: first.into(),
        last_name: last.into(),
        time_punch_key: format!("{}, {}", last.to_lowercase(), first.to_lowercase()),
        terminated: false,
    }
}

fn new_employee(first: &str, last: &str) -> NewEmployee {
    NewEmployee {
        first_name: first.into(),
        last_name: last.into(),
        ..NewEmployee::default()
    }
}

fn setup() -> (MemoryStore, i64) {
    let mut store = MemoryStore::new();
    let loc = store.create_location("Main Street", "01234").unwrap();
    (store, loc.id)
}

// -------------------------------------------------------------------------
// Reconciliation
// -------------------------------------------------------------------------

#[test]
fn terminated_employee_reappearing_is_reinstated_not_duplicated() {
    let (mut store, loc) = setup();
    let john = store.create_employee(loc, new_employee("John", "Smith")).unwrap();
    store.terminate_employee(john.id, d(2024, 1, 31)).unwrap();

    let outcome = import_bio(&mut store, loc, &[bio("John", "Smith")], d(2024, 3, 1)).unwrap();
    assert_eq!(outcome.reinstated, 1);
    assert_eq!(outcome.created, 0);

    let employees = store.list_employees(loc).unwrap();
    assert_eq!(employees.len(), 1);
    assert_eq!(employees[0].id, john.id);
    assert_eq!(employees[0].termination_date, None);
}

#[test]
fn bio_import_terminates_absent_and_is_idempotent() {
    let (mut store, loc) = setup();
    store.create_employee(loc, new_employee("Ann", "Lee")).unwrap();
    store.create_employee(loc, new_employee("John", "Smith")).unwrap();

    let rows = vec![bio("John", "Smith"), bio("Kim", "Park")];
    let first = import_bio(&mut store, loc, &rows, d(2024, 3, 1)).unwrap();
    assert_eq!(first.created, 1);
    assert_eq!(first.terminated, 1);

    let ann = store
        .list_employees(loc)
        .unwrap()
        .into_iter()
        .find(|e| e.first_name == "Ann")
        .unwrap();
    assert_eq!(ann.termination_date, Some(d(2024, 3, 1)));

    let second = import_bio(&mut store, loc, &rows, d(2024, 3, 2)).unwrap();
    assert_eq!(second.applied(), 0);
    let ann = store.get_employee(ann.id).unwrap();
    assert_eq!(ann.termination_date, Some(d(2024, 3, 1)));
}

#[test]
fn apply_stops_at_first_store_error() {
    let (mut store, loc) = setup();
    let ann = store.create_employee(loc, new_employee("Ann", "Lee")).unwrap();
    let bob = store.create_employee(loc, new_employee("Bob", "Stone")).unwrap();

    let existing = store.list_employees(loc).unwrap();
    let plan = plan_bio_import(&existing, &[bio("Zed", "Young")], d(2024, 3, 1));
    // Create Zed, terminate Ann, terminate Bob.
    assert_eq!(plan.changes.len(), 3);

    store.delete_employee(ann.id).unwrap();
    let err = apply(&mut store, loc, &plan).unwrap_err();
    assert_eq!(
        err,
        ReconError {
            applied: 1,
            source: StoreError::EmployeeNotFound(ann.id),
        }
    );

    // The create before the failure stays; Bob was never reached.
    let names: Vec<String> = store.list_employees(loc).unwrap().iter().map(Employee::display_name).collect();
    assert_eq!(names, vec!["Bob Stone", "Zed Young"]);
    assert!(store.get_employee(bob.id).unwrap().is_active());
}

#[test]
fn departments_from_staff_table() {
    let (mut store, loc) = setup();
    let john = store.create_employee(loc, new_employee("John", "Smith")).unwrap();
    let ann = store.create_employee(loc, new_employee("Annabelle", "Lee")).unwrap();

    let html = r#"<table id="stafftable"><tbody>
        <tr><td></td><td><a>John Smith</a></td><td>-</td><td></td><td></td><td></td><td>BOH General</td></tr>
        <tr><td></td><td><a>Ann Lee</a></td><td>Annabelle</td><td></td><td></td><td></td><td>Lemons</td></tr>
        <tr><td></td><td><a>Who Knows</a></td><td></td><td></td><td></td><td></td><td>FOH General</td></tr>
    </tbody></table>"#;
    let rows = parse_departments(html).unwrap();
    let outcome = import_departments(&mut store, loc, &rows).unwrap();
    assert_eq!(outcome.departments, 2);
    assert_eq!(outcome.unmatched, 1);
    assert_eq!(store.get_employee(john.id).unwrap().department, Department::Boh);
    assert_eq!(store.get_employee(ann.id).unwrap().department, Department::Central);
}

// -------------------------------------------------------------------------
// Summary
// -------------------------------------------------------------------------

const PUNCHES: &str = "\
Time Detail Report from 3/1/2024 through 3/10/2024
Smith, John
Mon 3/4/2024 8:00 AM 4:00 PM 8:00 $120.00
Employee Totals 8:00 8:00 0:00 $120.00 $0.00 $120.00
Lee, Ann
Tue 3/5/2024 8:00 AM 12:00 PM 4:00 $60.00
Employee Totals 4:00 4:00 0:00 $60.00 $0.00 $60.00
Drifter, Dan
Wed 3/6/2024 8:00 AM 10:00 AM 2:00 $30.00
Employee Totals 2:00 2:00 0:00 $30.00 $0.00 $30.00
All Employees Grand Total 14:00 14:00 0:00 $210.00 $0.00 $210.00
";

#[test]
fn salaried_employee_is_prorated_over_range() {
    let (mut store, loc) = setup();
    let mut john = store.create_employee(loc, new_employee("John", "Smith")).unwrap();
    john.department = Department::Foh;
    store.update_employee(&john).unwrap();
    let ann = store.create_employee(loc, new_employee("Ann", "Lee")).unwrap();
    store.terminate_employee(ann.id, d(2024, 3, 8)).unwrap();
    let mut gm = store.create_employee(loc, new_employee("Grace", "Manager")).unwrap();
    gm.department = Department::Director;
    gm.annual_salary_cents = Some(3_650_000);
    store.update_employee(&gm).unwrap();
    let mut old = store.create_employee(loc, new_employee("Old", "Salaried")).unwrap();
    old.annual_salary_cents = Some(9_000_000);
    store.update_employee(&old).unwrap();
    store.terminate_employee(old.id, d(2024, 2, 1)).unwrap();

    store
        .create_payroll_event(
            loc,
            NewPayrollEvent {
                employee_id: john.id,
                date: d(2024, 3, 5),
                event_type: PayrollEventType::Bonus,
                description: "Catering".into(),
                amount_cents: 5_000,
            },
        )
        .unwrap();

    let report = parse_time_punch(PUNCHES).unwrap();
    let employees = store.list_employees(loc).unwrap();
    let events = store.payroll_events_in_range(loc, d(2024, 3, 1), d(2024, 3, 10)).unwrap();
    let summary = summarize(&report, report.start, report.end, &employees, &events);

    assert_eq!(summary.day_count, 10);
    assert_eq!(summary.salary_amount_cents, 100_000);
    assert_eq!(summary.payroll_amount_cents, 5_000);
    assert_eq!(summary.punch_wages_cents, 21_000);
    assert_eq!(summary.total_wages_cents, 126_000);
    assert_eq!(summary.unmatched, 1);

    let director = summary.department(Bucket::Department(Department::Director)).unwrap();
    assert_eq!(director.wages_cents, 100_000);
    assert_eq!(director.employees, 1);

    let foh = summary.department(Bucket::Department(Department::Foh)).unwrap();
    assert_eq!(foh.hours, 8.0);
    assert_eq!(foh.wages_cents, 17_000);

    let terminated = summary.department(Bucket::Terminated).unwrap();
    assert_eq!(terminated.employees, 2);
    assert_eq!(terminated.hours, 6.0);
    assert_eq!(terminated.wages_cents, 9_000);
    assert_eq!(summary.departments.last().unwrap().department, Bucket::Terminated);
}

#[test]
fn reversed_range_skips_proration() {
    let (mut store, loc) = setup();
    let mut gm = store.create_employee(loc, new_employee("Grace", "Manager")).unwrap();
    gm.annual_salary_cents = Some(3_650_000);
    store.update_employee(&gm).unwrap();

    let report = parse_time_punch(PUNCHES).unwrap();
    let employees = store.list_employees(loc).unwrap();
    let summary = summarize(&report, Some(d(2024, 3, 10)), Some(d(2024, 3, 1)), &employees, &[]);
    assert_eq!(summary.day_count, 0);
    assert_eq!(summary.salary_amount_cents, 0);
    assert_eq!(summary.unmatched, 3);
}

#[test]
fn payroll_without_punches_adds_zero_hour_row_and_productivity() {
    let (mut store, loc) = setup();
    let kim = store.create_employee(loc, new_employee("Kim", "Park")).unwrap();
    let event = store
        .create_payroll_event(
            loc,
            NewPayrollEvent {
                employee_id: kim.id,
                date: d(2024, 3, 2),
                event_type: PayrollEventType::TipOut,
                description: "Tips".into(),
                amount_cents: 2_500,
            },
        )
        .unwrap();

    let report = parse_time_punch(PUNCHES).unwrap();
    let employees = store.list_employees(loc).unwrap();
    let summary = summarize(&report, report.start, report.end, &employees, &[event]).with_sales(140_000);

    let kim_row = summary.employees.iter().find(|r| r.employee_id == Some(kim.id)).unwrap();
    assert_eq!(kim_row.hours, 0.0);
    assert_eq!(kim_row.payroll_cents, 2_500);
    assert_eq!(kim_row.name, "Park, Kim");
    assert_eq!(summary.total_hours, 14.0);
    assert_eq!(summary.productivity, Some(100.0));
}
