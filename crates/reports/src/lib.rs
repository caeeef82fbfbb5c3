//! `totem-reports` - parsers for third-party restaurant exports.
//!
//! Pure crate: every parser takes raw text or bytes and returns typed rows.
//! No store access. Field-level problems degrade to zero or skip; only
//! structural problems surface as [`ReportError`].

pub mod dates;
pub mod departments;
pub mod error;
pub mod hotschedules;
pub mod labor;
pub mod money;
pub mod names;
pub mod roster;
pub mod sales;
pub mod time_punch;

pub use departments::Department;
pub use error::ReportError;
pub use hotschedules::{parse_departments, DepartmentRow};
pub use labor::{parse_labor_report, LaborTotals};
pub use names::PersonName;
pub use roster::{parse_bio_roster, parse_birthdates, BioEmployeeRow, BirthdateRow};
pub use sales::{parse_sales_report, SalesCategory, SalesLine, SalesReport};
pub use time_punch::{parse_time_punch, TimePunchEmployeeTotals, TimePunchReport, TimePunchTotals};
