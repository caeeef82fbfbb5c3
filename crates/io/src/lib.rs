// Spreadsheet I/O

pub mod spreadsheet;

pub use spreadsheet::{read_rows, SpreadsheetError};
