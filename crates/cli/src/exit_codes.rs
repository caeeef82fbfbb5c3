//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract. Scripts rely on them.
//!
//! # Exit Codes
//!
//! | Code | Description                                               |
//! |------|-----------------------------------------------------------|
//! | 0    | Success                                                   |
//! | 2    | Usage error (bad args, bad date/amount, unknown id)       |
//! | 3    | I/O error (cannot read input, cannot write output)        |
//! | 4    | Report parse error (missing column, no table rows, ...)   |
//! | 5    | Store error (missing row, store file unreadable/unwritable) |
//! | 6    | Config error (malformed settings file)                    |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, unparseable dates or amounts.
pub const EXIT_USAGE: u8 = 2;

/// Input file unreadable or output file unwritable.
pub const EXIT_IO: u8 = 3;

/// An uploaded report failed structurally.
pub const EXIT_PARSE: u8 = 4;

/// The store rejected an operation or could not be loaded/saved.
pub const EXIT_STORE: u8 = 5;

/// The settings file exists but is malformed.
pub const EXIT_CONFIG: u8 = 6;

use totem_recon::StoreError;

/// Map a StoreError to its exit code. Missing rows are usage errors: the
/// caller passed an id that does not exist.
pub fn store_exit_code(err: &StoreError) -> u8 {
    match err {
        StoreError::LocationNotFound(_)
        | StoreError::EmployeeNotFound(_)
        | StoreError::PayrollEventNotFound(_)
        | StoreError::SalaryNotFound(_) => EXIT_USAGE,
        StoreError::Backend(_) => EXIT_STORE,
    }
}
