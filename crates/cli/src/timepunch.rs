//! `totem timepunch summary`

use std::path::PathBuf;

use clap::Subcommand;
use serde::Serialize;
use totem_recon::sales::total_sales_cents;
use totem_recon::summary::EmployeeSummary;
use totem_recon::{summarize, LocationId, Store, TimePunchSummary};
use totem_reports::parse_time_punch;

use crate::output::{hours, money, pad_left, pad_right, print_json, write_csv};
use crate::{parse_date_arg, read_text_input, CliError, Context};

#[derive(Subcommand)]
pub enum TimepunchCommands {
    /// Roll a time-punch report up by department, with payroll and salaries
    #[command(after_help = "\
Examples:
  totem timepunch summary --location 1 punches.txt
  totem timepunch summary --location 1 punches.txt --json
  totem timepunch summary --location 1 punches.txt --out employees.csv

The range defaults to the one printed in the report header. Productivity is
reported when sales were imported for the range.")]
    Summary {
        #[arg(long)]
        location: LocationId,
        file: PathBuf,
        /// Override the report's start date
        #[arg(long)]
        start: Option<String>,
        /// Override the report's end date
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        json: bool,
        /// Write per-employee rows as CSV
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct EmployeeCsvRow<'a> {
    name: &'a str,
    department: &'static str,
    hours: String,
    wages: String,
    payroll: String,
    salary: String,
    total: String,
}

const CSV_HEADER: &[&str] = &["name", "department", "hours", "wages", "payroll", "salary", "total"];

fn dollars(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

fn csv_row(row: &EmployeeSummary) -> EmployeeCsvRow<'_> {
    EmployeeCsvRow {
        name: &row.name,
        department: row.department.as_str(),
        hours: hours(row.hours),
        wages: dollars(row.wages_cents),
        payroll: dollars(row.payroll_cents),
        salary: dollars(row.salary_cents),
        total: dollars(row.total_cents()),
    }
}

pub fn cmd_timepunch(ctx: &mut Context, cmd: TimepunchCommands) -> Result<(), CliError> {
    match cmd {
        TimepunchCommands::Summary {
            location,
            file,
            start,
            end,
            json,
            out,
        } => {
            ctx.store.get_location(location)?;
            let text = read_text_input(&file)?;
            let report = parse_time_punch(&text)?;

            let start = match start {
                Some(s) => Some(parse_date_arg(&s)?),
                None => report.start,
            };
            let end = match end {
                Some(e) => Some(parse_date_arg(&e)?),
                None => report.end,
            };

            let employees = ctx.store.list_employees(location)?;
            let (events, sales) = match (start, end) {
                (Some(s), Some(e)) => (
                    ctx.store.payroll_events_in_range(location, s, e)?,
                    ctx.store.sales_in_range(location, s, e)?,
                ),
                _ => {
                    tracing::warn!("report has no date range; payroll events and salaries skipped");
                    (Vec::new(), Vec::new())
                }
            };

            let mut summary = summarize(&report, start, end, &employees, &events);
            if !sales.is_empty() {
                summary = summary.with_sales(total_sales_cents(&sales));
            }

            if let Some(path) = &out {
                let rows: Vec<EmployeeCsvRow> = summary.employees.iter().map(csv_row).collect();
                let label = write_csv(&rows, CSV_HEADER, Some(path))?;
                eprintln!("wrote {} employee rows to {}", rows.len(), label);
            }

            if json {
                print_json(&summary)
            } else {
                print_summary(&summary);
                Ok(())
            }
        }
    }
}

fn print_summary(summary: &TimePunchSummary) {
    let range = match (summary.start, summary.end) {
        (Some(s), Some(e)) => format!("{s} through {e} ({} days)", summary.day_count),
        _ => "no date range".to_string(),
    };
    println!("{range}");
    println!();

    for dept in &summary.departments {
        let members: Vec<&EmployeeSummary> = summary
            .employees
            .iter()
            .filter(|r| r.department == dept.department)
            .collect();
        if members.is_empty() {
            continue;
        }
        println!(
            "{}{}{}",
            pad_right(dept.department.as_str(), 32),
            pad_left(&hours(dept.hours), 9),
            pad_left(&money(dept.wages_cents), 14)
        );
        for row in members {
            println!(
                "  {}{}{}",
                pad_right(&row.name, 30),
                pad_left(&hours(row.hours), 9),
                pad_left(&money(row.total_cents()), 14)
            );
        }
    }

    println!();
    println!(
        "hours      {} ({} regular, {} overtime)",
        hours(summary.total_hours),
        hours(summary.regular_hours),
        hours(summary.overtime_hours)
    );
    println!("punch      {}", money(summary.punch_wages_cents));
    println!("payroll    {}", money(summary.payroll_amount_cents));
    println!("salary     {}", money(summary.salary_amount_cents));
    println!("total      {}", money(summary.total_wages_cents));
    if let (Some(sales), Some(productivity)) = (summary.total_sales_cents, summary.productivity) {
        println!("sales      {}", money(sales));
        println!("sales/hour {:.2}", productivity);
    }
    if summary.unmatched > 0 {
        eprintln!(
            "{} punch name(s) matched no employee and were counted as TERMINATED",
            summary.unmatched
        );
    }
}
