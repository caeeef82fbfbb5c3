//! `totem-recon` - employee reconciliation, labor summaries and sales rollups.
//!
//! Works on parsed report rows from `totem-reports` and a [`Store`]. Planning
//! and rollups are pure; only [`reconcile::apply`] and the `import_*` entry
//! points write.

pub mod error;
pub mod model;
pub mod performance;
pub mod ranges;
pub mod reconcile;
pub mod sales;
pub mod store;
pub mod summary;

pub use error::{ReconError, StoreError};
pub use model::{
    Employee, EmployeeId, LaborRecord, Location, LocationId, NewEmployee, NewPayrollEvent, PayrollEvent,
    PayrollEventType, SaleRecord, Salary,
};
pub use performance::{performance_report, DailyPerformanceRecord, PerformanceSummary};
pub use ranges::{resolve_range, CommonRanges};
pub use reconcile::{EmployeeChange, ReconcileOutcome, ReconcilePlan};
pub use store::{MemoryStore, Store};
pub use summary::{day_count, summarize, Bucket, TimePunchSummary};
