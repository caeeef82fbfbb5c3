//! Bio roster and birthdate spreadsheet exports.
//!
//! Both exports are single-sheet spreadsheets whose first row is a header.
//! Columns are located by trimmed, lowercased header text.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::dates::parse_date;
use crate::error::ReportError;
use crate::names::split_time_punch_name;

/// One employee from the bio roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BioEmployeeRow {
    pub first_name: String,
    pub last_name: String,
    pub time_punch_key: String,
    pub terminated: bool,
}

/// One employee birthday from the birthdate export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthdateRow {
    pub time_punch_key: String,
    pub birthday: NaiveDate,
}

const BIRTHDAY_HEADERS: &[&str] = &["birth date", "birthdate", "birthday"];

/// Parse a bio roster upload (`.xls` or `.xlsx`).
pub fn parse_bio_roster(data: &[u8], filename: &str) -> Result<Vec<BioEmployeeRow>, ReportError> {
    let rows = totem_io::read_rows(data, filename)?;
    bio_rows_from_grid(&rows)
}

/// Parse a birthdate upload (`.xls` or `.xlsx`).
pub fn parse_birthdates(data: &[u8], filename: &str) -> Result<Vec<BirthdateRow>, ReportError> {
    let rows = totem_io::read_rows(data, filename)?;
    birthdate_rows_from_grid(&rows)
}

/// Bio roster rows from an already-read grid.
///
/// `employee name` is required; `employee status` and `termination date`
/// are optional. Rows whose name cannot be split are dropped.
pub fn bio_rows_from_grid(rows: &[Vec<String>]) -> Result<Vec<BioEmployeeRow>, ReportError> {
    let Some((header, body)) = rows.split_first() else {
        return Err(ReportError::MissingColumn("employee name"));
    };
    let index = header_index(header);

    let name_idx = *index
        .get("employee name")
        .ok_or(ReportError::MissingColumn("employee name"))?;
    let status_idx = index.get("employee status").copied();
    let term_idx = index.get("termination date").copied();

    let mut out = Vec::new();
    for row in body {
        let Some(name) = split_time_punch_name(cell_value(row, Some(name_idx))) else {
            continue;
        };
        let status = cell_value(row, status_idx);
        let termination_date = cell_value(row, term_idx);
        out.push(BioEmployeeRow {
            first_name: name.first,
            last_name: name.last,
            time_punch_key: name.time_punch_key,
            terminated: is_terminated(status, termination_date),
        });
    }
    debug!(rows = body.len(), parsed = out.len(), "parsed bio roster");
    Ok(out)
}

/// Birthdate rows from an already-read grid.
///
/// The birthday column is the first present of `birth date`, `birthdate`,
/// `birthday`. Empty or unparseable birthdays are skipped.
pub fn birthdate_rows_from_grid(rows: &[Vec<String>]) -> Result<Vec<BirthdateRow>, ReportError> {
    let Some((header, body)) = rows.split_first() else {
        return Err(ReportError::MissingColumn("employee name"));
    };
    let index = header_index(header);

    let name_idx = *index
        .get("employee name")
        .ok_or(ReportError::MissingColumn("employee name"))?;
    let birth_idx = BIRTHDAY_HEADERS
        .iter()
        .find_map(|h| index.get(*h).copied())
        .ok_or(ReportError::MissingColumn("birth date"))?;

    let mut out = Vec::new();
    for row in body {
        let Some(name) = split_time_punch_name(cell_value(row, Some(name_idx))) else {
            continue;
        };
        let Some(birthday) = parse_date(cell_value(row, Some(birth_idx))) else {
            continue;
        };
        out.push(BirthdateRow {
            time_punch_key: name.time_punch_key,
            birthday,
        });
    }
    debug!(rows = body.len(), parsed = out.len(), "parsed birthdates");
    Ok(out)
}

/// Terminated when a termination date is present, or the status mentions
/// termination or inactivity.
pub fn is_terminated(status: &str, termination_date: &str) -> bool {
    if !termination_date.trim().is_empty() {
        return true;
    }
    let status = status.trim().to_lowercase();
    status.contains("terminat") || status.contains("inactive")
}

/// Header text → column index. Later duplicates win.
fn header_index(header: &[String]) -> HashMap<String, usize> {
    header
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect()
}

fn cell_value(row: &[String], idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).map(|s| s.trim()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn bio_roster_flags_terminations() {
        let rows = grid(&[
            &[" Employee Name ", "Employee Status", "Termination Date"],
            &["Smith, John", "Active", ""],
            &["Doe, Jane", "Terminated", ""],
            &["Lee, Ann", "Active", "2024-03-01"],
            &["Park, Min", "INACTIVE - leave", ""],
            &["Cher", "Active", ""],
        ]);
        let out = bio_rows_from_grid(&rows).unwrap();
        assert_eq!(out.len(), 4);
        assert_eq!(out[0].time_punch_key, "smith, john");
        assert!(!out[0].terminated);
        assert!(out[1].terminated);
        assert!(out[2].terminated);
        assert!(out[3].terminated);
    }

    #[test]
    fn bio_roster_optional_columns() {
        let rows = grid(&[&["employee name"], &["John Smith"]]);
        let out = bio_rows_from_grid(&rows).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].first_name, "John");
        assert_eq!(out[0].last_name, "Smith");
        assert!(!out[0].terminated);
    }

    #[test]
    fn bio_roster_requires_name_column() {
        let rows = grid(&[&["Name", "Status"], &["Smith, John", "Active"]]);
        assert_eq!(
            bio_rows_from_grid(&rows),
            Err(ReportError::MissingColumn("employee name"))
        );
    }

    #[test]
    fn short_rows_read_as_empty_cells() {
        let rows = grid(&[&["Employee Name", "Employee Status", "Termination Date"], &["Smith, John"]]);
        let out = bio_rows_from_grid(&rows).unwrap();
        assert!(!out[0].terminated);
    }

    #[test]
    fn birthdates_pick_first_known_column() {
        let rows = grid(&[
            &["Employee Name", "Birthday", "Birth Date"],
            &["Smith, John", "ignored", "1/2/2006"],
            &["Doe, Jane", "", "01-02-06"],
            &["Lee, Ann", "", ""],
            &["Park, Min", "", "someday"],
        ]);
        let out = birthdate_rows_from_grid(&rows).unwrap();
        assert_eq!(out.len(), 2);
        let day = NaiveDate::from_ymd_opt(2006, 1, 2).unwrap();
        assert_eq!(out[0], BirthdateRow { time_punch_key: "smith, john".into(), birthday: day });
        assert_eq!(out[1].birthday, day);
    }

    #[test]
    fn birthdates_require_birthday_column() {
        let rows = grid(&[&["Employee Name", "Hire Date"], &["Smith, John", "1/2/2006"]]);
        assert_eq!(
            birthdate_rows_from_grid(&rows),
            Err(ReportError::MissingColumn("birth date"))
        );
    }
}
