// Spreadsheet import (xls, xlsx) for roster and birthdate exports
//
// Import: One-way. Every cell is rendered as text and the sheet is returned
//         as a row-major grid. Callers treat the first row as the header.

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Range, Reader, Xls, Xlsx};
use thiserror::Error;
use tracing::debug;

/// Maximum number of rows read from a single sheet
const MAX_ROWS: usize = 100_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpreadsheetError {
    /// The bytes could not be opened as the format implied by the filename.
    #[error("failed to open spreadsheet: {0}")]
    Open(String),
    #[error("no worksheet found")]
    NoWorksheet,
    #[error("multiple worksheets found; please upload a file with a single sheet")]
    MultipleSheets,
    #[error("worksheet is empty")]
    EmptySheet,
}

/// Spreadsheet flavor implied by the uploaded filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetKind {
    /// Legacy BIFF `.xls`
    Xls,
    /// Everything else is treated as OOXML `.xlsx`
    Xlsx,
}

impl SpreadsheetKind {
    pub fn from_filename(filename: &str) -> Self {
        let is_xls = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("xls"))
            .unwrap_or(false);
        if is_xls {
            Self::Xls
        } else {
            Self::Xlsx
        }
    }
}

/// Read the sheet of a roster-style export into a grid of strings.
///
/// `.xls` uploads must contain exactly one sheet. Other uploads are read as
/// `.xlsx` and only the first sheet is used.
pub fn read_rows(data: &[u8], filename: &str) -> Result<Vec<Vec<String>>, SpreadsheetError> {
    let cursor = Cursor::new(data.to_vec());
    let kind = SpreadsheetKind::from_filename(filename);
    debug!(filename, ?kind, bytes = data.len(), "reading spreadsheet");

    match kind {
        SpreadsheetKind::Xls => {
            let workbook: Xls<_> =
                Xls::new(cursor).map_err(|e| SpreadsheetError::Open(e.to_string()))?;
            read_single_sheet(workbook, true)
        }
        SpreadsheetKind::Xlsx => {
            let workbook: Xlsx<_> =
                Xlsx::new(cursor).map_err(|e| SpreadsheetError::Open(e.to_string()))?;
            read_single_sheet(workbook, false)
        }
    }
}

fn read_single_sheet<R>(mut workbook: R, reject_multiple: bool) -> Result<Vec<Vec<String>>, SpreadsheetError>
where
    R: Reader<Cursor<Vec<u8>>>,
    R::Error: std::fmt::Display,
{
    let sheet_names = workbook.sheet_names();
    let first = match sheet_names.first() {
        Some(name) => name.clone(),
        None => return Err(SpreadsheetError::NoWorksheet),
    };
    if reject_multiple && sheet_names.len() > 1 {
        return Err(SpreadsheetError::MultipleSheets);
    }

    let range = workbook
        .worksheet_range(&first)
        .map_err(|e| SpreadsheetError::Open(format!("failed to read sheet '{}': {}", first, e)))?;

    let rows = range_to_rows(&range);
    if rows.is_empty() {
        return Err(SpreadsheetError::EmptySheet);
    }
    Ok(rows)
}

/// Flatten a calamine range into text rows, padding for a range that does
/// not begin in column A. Trailing empty cells are dropped from each row.
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let (height, width) = range.get_size();
    if height == 0 || width == 0 {
        return Vec::new();
    }
    let (_, start_col) = range.start().unwrap_or((0, 0));

    let mut rows = Vec::with_capacity(height.min(MAX_ROWS));
    for row in range.rows().take(MAX_ROWS) {
        let mut out: Vec<String> = vec![String::new(); start_col as usize];
        out.extend(row.iter().map(cell_text));
        while out.last().map(|s| s.is_empty()).unwrap_or(false) {
            out.pop();
        }
        rows.push(out);
    }
    rows
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Format nicely: integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ts) if ts.time() == chrono::NaiveTime::MIN => ts.format("%Y-%m-%d").to_string(),
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format!("{}", dt.as_f64()),
        },
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    fn xlsx_bytes(build: impl FnOnce(&mut Workbook)) -> Vec<u8> {
        let mut workbook = Workbook::new();
        build(&mut workbook);
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn kind_from_filename() {
        assert_eq!(SpreadsheetKind::from_filename("bio.xls"), SpreadsheetKind::Xls);
        assert_eq!(SpreadsheetKind::from_filename("BIO.XLS"), SpreadsheetKind::Xls);
        assert_eq!(SpreadsheetKind::from_filename("bio.xlsx"), SpreadsheetKind::Xlsx);
        assert_eq!(SpreadsheetKind::from_filename("bio"), SpreadsheetKind::Xlsx);
    }

    #[test]
    fn reads_strings_and_numbers() {
        let bytes = xlsx_bytes(|wb| {
            let ws = wb.add_worksheet();
            ws.write_string(0, 0, "Employee Name").unwrap();
            ws.write_string(0, 1, "Count").unwrap();
            ws.write_string(1, 0, "Smith, John").unwrap();
            ws.write_number(1, 1, 42.0).unwrap();
            ws.write_number(2, 1, 1.5).unwrap();
        });

        let rows = read_rows(&bytes, "roster.xlsx").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["Employee Name", "Count"]);
        assert_eq!(rows[1], vec!["Smith, John", "42"]);
        assert_eq!(rows[2], vec!["", "1.5"]);
    }

    #[test]
    fn date_cells_render_as_iso() {
        let bytes = xlsx_bytes(|wb| {
            let ws = wb.add_worksheet();
            let date_format = Format::new().set_num_format("yyyy-mm-dd");
            ws.write_string(0, 0, "Birth Date").unwrap();
            let date = ExcelDateTime::from_ymd(2006, 1, 2).unwrap();
            ws.write_datetime_with_format(1, 0, &date, &date_format).unwrap();
        });

        let rows = read_rows(&bytes, "birthdays.xlsx").unwrap();
        assert_eq!(rows[1], vec!["2006-01-02"]);
    }

    #[test]
    fn empty_sheet_is_an_error() {
        let bytes = xlsx_bytes(|wb| {
            wb.add_worksheet();
        });
        assert_eq!(read_rows(&bytes, "empty.xlsx"), Err(SpreadsheetError::EmptySheet));
    }

    #[test]
    fn garbage_bytes_fail_to_open() {
        let err = read_rows(b"not a spreadsheet", "roster.xlsx").unwrap_err();
        assert!(matches!(err, SpreadsheetError::Open(_)));

        let err = read_rows(b"not a spreadsheet", "roster.xls").unwrap_err();
        assert!(matches!(err, SpreadsheetError::Open(_)));
    }

    #[test]
    fn xlsx_reads_first_sheet_only() {
        let bytes = xlsx_bytes(|wb| {
            wb.add_worksheet().write_string(0, 0, "first").unwrap();
            wb.add_worksheet().write_string(0, 0, "second").unwrap();
        });
        let rows = read_rows(&bytes, "two.xlsx").unwrap();
        assert_eq!(rows, vec![vec!["first".to_string()]]);
    }
}
