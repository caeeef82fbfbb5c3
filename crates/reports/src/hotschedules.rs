//! HotSchedules staff table (pasted HTML) → employee departments.
//!
//! The staff page is scraped, not exported, so the table is located through
//! a list of selector fallbacks and cells are read by position:
//! cell 1 display name, cell 2 preferred name, cell 6 jobs.

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use tracing::debug;

use crate::departments::{map_department_from_jobs, Department};
use crate::error::ReportError;
use crate::names::{collapse_whitespace, split_display_name};

/// Tried in order; the first selector that yields rows is used.
const ROW_SELECTORS: &[&str] = &[
    "#stafftable tbody tr",
    "table#stafftable tr",
    "table.data-table tbody tr",
];

const MIN_CELLS: usize = 7;
const NAME_CELL: usize = 1;
const PREFERRED_CELL: usize = 2;
const JOBS_CELL: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentRow {
    pub first_name: String,
    pub last_name: String,
    /// Empty when the table shows `-` or nothing.
    pub preferred_name: String,
    pub department: Department,
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Parse the staff table and map each employee's jobs to a department.
pub fn parse_departments(html: &str) -> Result<Vec<DepartmentRow>, ReportError> {
    let trimmed = html.trim();
    if trimmed.is_empty() {
        return Err(ReportError::EmptyHtml);
    }

    let doc = Html::parse_document(trimmed);
    let rows: Vec<ElementRef> = ROW_SELECTORS
        .iter()
        .map(|css| doc.select(&selector(css)).collect::<Vec<_>>())
        .find(|rows| !rows.is_empty())
        .ok_or(ReportError::NoTableRows)?;

    let td = selector("td");
    let mut out = Vec::new();
    for row in &rows {
        let cells: Vec<ElementRef> = row.select(&td).collect();
        if cells.len() < MIN_CELLS {
            continue;
        }
        if let Some(parsed) = parse_row(&cells) {
            out.push(parsed);
        }
    }

    debug!(rows = rows.len(), mapped = out.len(), "parsed hotschedules staff table");
    if out.is_empty() {
        return Err(ReportError::NoMappableRows);
    }
    Ok(out)
}

fn parse_row(cells: &[ElementRef]) -> Option<DepartmentRow> {
    let name_cell = cells[NAME_CELL];
    let link_text = name_cell
        .select(&selector("a"))
        .next()
        .map(element_text)
        .unwrap_or_default();
    let name = if link_text.is_empty() {
        element_text(name_cell)
    } else {
        link_text
    };
    let (first_name, last_name) = split_display_name(&name)?;

    let mut preferred_name = element_text(cells[PREFERRED_CELL]);
    if preferred_name == "-" {
        preferred_name.clear();
    }

    let jobs = extract_jobs(cells[JOBS_CELL]);
    let department = map_department_from_jobs(&jobs.join(" | "))?;

    Some(DepartmentRow {
        first_name,
        last_name,
        preferred_name,
        department,
    })
}

/// Jobs listed in the cell's tooltip (`<li>` items), else the visible text.
fn extract_jobs(cell: ElementRef) -> Vec<String> {
    let tooltip = cell
        .select(&selector("[tooltip]"))
        .filter_map(|el| el.value().attr("tooltip"))
        .find(|value| !value.trim().is_empty());

    let mut jobs = tooltip.map(tooltip_items).unwrap_or_default();

    if jobs.is_empty() {
        let text = element_text(cell);
        if !text.is_empty() && text != "-" {
            jobs.push(text);
        }
    }
    jobs
}

/// The tooltip holds an escaped `<ul><li>…</li></ul>` list. The HTML parser
/// already decoded one level of entities; a second level is decoded by
/// reading the fragment's text before looking for list items again.
fn tooltip_items(markup: &str) -> Vec<String> {
    let items = list_items(markup);
    if !items.is_empty() || !markup.contains('&') {
        return items;
    }
    let decoded: String = Html::parse_fragment(markup).root_element().text().collect();
    list_items(&decoded)
}

fn list_items(markup: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(markup);
    fragment
        .select(&selector("li"))
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}

fn element_text(el: ElementRef) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}
