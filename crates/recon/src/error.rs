use thiserror::Error;

use crate::model::{EmployeeId, LocationId};

/// Persistence failure reported by a [`crate::Store`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("location {0} not found")]
    LocationNotFound(LocationId),
    #[error("employee {0} not found")]
    EmployeeNotFound(EmployeeId),
    #[error("payroll event {0} not found")]
    PayrollEventNotFound(i64),
    #[error("salary {0} not found")]
    SalaryNotFound(i64),
    /// Backend failure (file write, snapshot decode, ...).
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Failure while applying a reconciliation plan.
///
/// `applied` writes stay committed; the remaining changes were not issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("reconciliation aborted after {applied} change(s): {source}")]
pub struct ReconError {
    pub applied: usize,
    #[source]
    pub source: StoreError,
}
