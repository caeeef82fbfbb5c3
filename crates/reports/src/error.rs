use thiserror::Error;
use totem_io::SpreadsheetError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error(transparent)]
    Spreadsheet(#[from] SpreadsheetError),
    /// Header row lacks a column the parser cannot work without.
    #[error("missing required column: {0}")]
    MissingColumn(&'static str),
    #[error("hot schedules html is required")]
    EmptyHtml,
    #[error("could not find employee table rows")]
    NoTableRows,
    #[error("no mappable employees found in html")]
    NoMappableRows,
    #[error("no employee totals found in time punch report")]
    NoEmployeeTotals,
}
