//! `totem sales` and `totem labor` subcommands.

use std::path::PathBuf;

use clap::Subcommand;
use totem_recon::sales::{day_detail, range_summary, ItemShare, RangeItem};
use chrono::NaiveDate;
use totem_recon::{LaborRecord, LocationId, SaleRecord, Store};
use totem_reports::money::parse_hours;
use totem_reports::{parse_labor_report, parse_sales_report, SalesCategory, SalesLine, SalesReport};

use crate::output::{hours, money, pad_left, pad_right, percent, print_json};
use crate::{parse_amount_arg, parse_date_arg, read_text_input, CliError, Context, RangeArgs};

#[derive(Subcommand)]
pub enum SalesCommands {
    /// Import a raw-text sales report for one business date
    #[command(after_help = "\
Examples:
  totem sales import --location 1 --date 2024-03-04 sales.txt

Re-importing the same date replaces the stored amounts item by item.")]
    Import {
        #[arg(long)]
        location: LocationId,
        #[arg(long)]
        date: String,
        file: PathBuf,
    },

    /// Enter day-part and destination amounts by hand
    #[command(after_help = "\
Examples:
  totem sales set --location 1 --date 2024-03-04 --day-part Breakfast=400 --day-part Lunch=1,000
  totem sales set --location 1 --date 2024-03-04 --destination \"Carry Out=1,250.00\"

Items are matched case-insensitively against the known day parts and
destinations. Amounts replace what is stored for the same item.")]
    Set {
        #[arg(long)]
        location: LocationId,
        #[arg(long)]
        date: String,
        /// ITEM=AMOUNT, repeatable
        #[arg(long = "day-part", value_name = "ITEM=AMOUNT")]
        day_parts: Vec<String>,
        /// ITEM=AMOUNT, repeatable
        #[arg(long = "destination", value_name = "ITEM=AMOUNT")]
        destinations: Vec<String>,
    },

    /// Day-part and destination breakdown for one date
    Day {
        #[arg(long)]
        location: LocationId,
        #[arg(long)]
        date: String,
        #[arg(long)]
        json: bool,
    },

    /// Daily totals and item averages over a range
    #[command(after_help = "\
Examples:
  totem sales history --location 1
  totem sales history --location 1 --start 2024-01-01 --end 2024-01-31 --json
  totem sales history --location 1 --preset ytd")]
    History {
        #[arg(long)]
        location: LocationId,
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum LaborCommands {
    /// Import a raw-text labor report for one business date
    #[command(after_help = "\
Examples:
  totem labor import --location 1 --date 2024-03-04 labor.txt")]
    Import {
        #[arg(long)]
        location: LocationId,
        #[arg(long)]
        date: String,
        file: PathBuf,
    },

    /// Enter one day's labor totals by hand
    #[command(after_help = "\
Examples:
  totem labor set --location 1 --date 2024-03-04 --regular 427:34 --regular-wages 6,328.40
  totem labor set --location 1 --date 2024-03-04 --regular 80.5 --overtime 2 --regular-wages 1200 --overtime-wages 45")]
    Set {
        #[arg(long)]
        location: LocationId,
        #[arg(long)]
        date: String,
        /// Hours as H:MM or decimal
        #[arg(long, default_value = "0")]
        regular: String,
        #[arg(long, default_value = "0")]
        overtime: String,
        /// Dollars
        #[arg(long, default_value = "0")]
        regular_wages: String,
        #[arg(long, default_value = "0")]
        overtime_wages: String,
    },

    /// Stored labor for one date
    Show {
        #[arg(long)]
        location: LocationId,
        #[arg(long)]
        date: String,
        #[arg(long)]
        json: bool,
    },

    /// Stored labor days over a range
    List {
        #[arg(long)]
        location: LocationId,
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long)]
        json: bool,
    },
}

pub fn cmd_sales(ctx: &mut Context, cmd: SalesCommands) -> Result<(), CliError> {
    match cmd {
        SalesCommands::Import { location, date, file } => {
            let date = parse_date_arg(&date)?;
            ctx.store.get_location(location)?;
            let text = read_text_input(&file)?;
            let report = parse_sales_report(&text);
            if report.lines.is_empty() {
                return Err(CliError::parse(format!("no sales lines found in {}", file.display()))
                    .with_hint("expected day-part lines (\"1 - Breakfast ...\") or destination lines"));
            }
            save_sales(ctx, location, date, &report)
        }
        SalesCommands::Set {
            location,
            date,
            day_parts,
            destinations,
        } => {
            let date = parse_date_arg(&date)?;
            ctx.store.get_location(location)?;
            let entries = day_parts
                .iter()
                .map(|entry| sales_entry(SalesCategory::DayPart, entry))
                .chain(destinations.iter().map(|entry| sales_entry(SalesCategory::Destination, entry)));
            let report = entries.collect::<Result<SalesReport, CliError>>()?;
            if report.lines.is_empty() {
                return Err(CliError::args("nothing to save").with_hint("pass --day-part or --destination ITEM=AMOUNT"));
            }
            save_sales(ctx, location, date, &report)
        }
        SalesCommands::Day { location, date, json } => {
            let date = parse_date_arg(&date)?;
            ctx.store.get_location(location)?;
            let records = ctx.store.sales_by_date(location, date)?;
            let detail = day_detail(&records);
            if json {
                return print_json(&detail);
            }
            if records.is_empty() {
                eprintln!("no sales recorded for {date}");
            }
            print_shares("Day part", &detail.day_parts, detail.day_part_total_cents);
            println!();
            print_shares("Destination", &detail.destinations, detail.destination_total_cents);
            Ok(())
        }
        SalesCommands::History { location, range, json } => {
            let (start, end) = ctx.range(&range)?;
            ctx.store.get_location(location)?;
            let records = ctx.store.sales_in_range(location, start, end)?;
            let summary = range_summary(&records);
            if json {
                return print_json(&summary);
            }
            println!("{start} through {end}, {} day(s) with sales", summary.days.len());
            for day in &summary.days {
                println!(
                    "  {}  {}  {}",
                    day.date,
                    pad_left(&money(day.day_part_total_cents), 14),
                    pad_left(&money(day.destination_total_cents), 14)
                );
            }
            println!();
            print_range_items("Day part", &summary.day_parts, summary.day_part_total_cents);
            println!();
            print_range_items("Destination", &summary.destinations, summary.destination_total_cents);
            Ok(())
        }
    }
}

fn save_sales(ctx: &mut Context, location: LocationId, date: NaiveDate, report: &SalesReport) -> Result<(), CliError> {
    let records: Vec<SaleRecord> = report
        .lines
        .iter()
        .map(|line| SaleRecord {
            location_id: location,
            date,
            category: line.category,
            item: line.item.clone(),
            amount_cents: line.amount_cents,
        })
        .collect();
    ctx.store.save_sales_batch(location, date, &records)?;
    eprintln!("saved {} sales lines for {}", records.len(), date);
    print_json(report)
}

/// `"Carry Out=1,250.00"` → a line under `category`.
fn sales_entry(category: SalesCategory, entry: &str) -> Result<SalesLine, CliError> {
    let (item, amount) = entry
        .split_once('=')
        .ok_or_else(|| CliError::args(format!("expected ITEM=AMOUNT, got {entry:?}")))?;
    let item = category.item_named(item).ok_or_else(|| {
        CliError::args(format!("unknown {} item: {}", category, item.trim()))
            .with_hint(format!("one of {}", category.items().join(", ")))
    })?;
    Ok(SalesLine {
        category,
        item: item.to_string(),
        amount_cents: parse_amount_arg(amount)?,
    })
}

/// Decimal hours or `H:MM`.
fn parse_hours_arg(value: &str) -> Result<f64, CliError> {
    let value = value.trim();
    let parsed = match value.split_once(':') {
        Some((h, m)) => match (h.parse::<u32>(), m.parse::<u32>()) {
            (Ok(_), Ok(m)) if m < 60 => Some(parse_hours(value)),
            _ => None,
        },
        None => value.parse::<f64>().ok().filter(|h| h.is_finite()),
    };
    match parsed {
        Some(h) if h >= 0.0 => Ok(h),
        _ => Err(CliError::args(format!("invalid hours: {value}")).with_hint("use decimal hours or H:MM")),
    }
}

fn print_labor(record: &LaborRecord) {
    println!(
        "{}  {} reg  {} ot  {}",
        record.date,
        pad_left(&hours(record.regular_hours), 8),
        pad_left(&hours(record.overtime_hours), 7),
        pad_left(&money(record.total_wages_cents()), 13)
    );
}

fn print_shares(title: &str, shares: &[ItemShare], total_cents: i64) {
    println!("{}", title);
    for share in shares {
        println!(
            "  {}{}{}",
            pad_right(share.item, 18),
            pad_left(&money(share.amount_cents), 14),
            pad_left(&percent(share.percent), 8)
        );
    }
    println!("  {}{}", pad_right("Total", 18), pad_left(&money(total_cents), 14));
}

fn print_range_items(title: &str, items: &[RangeItem], total_cents: i64) {
    println!("{}", pad_right(title, 20) + "         total      avg/day");
    for item in items {
        println!(
            "  {}{}{}{}",
            pad_right(item.item, 18),
            pad_left(&money(item.total_cents), 14),
            pad_left(&money(item.average_cents), 13),
            pad_left(&percent(item.percent), 8)
        );
    }
    println!("  {}{}", pad_right("Total", 18), pad_left(&money(total_cents), 14));
}

pub fn cmd_labor(ctx: &mut Context, cmd: LaborCommands) -> Result<(), CliError> {
    match cmd {
        LaborCommands::Import { location, date, file } => {
            let date = parse_date_arg(&date)?;
            ctx.store.get_location(location)?;
            let text = read_text_input(&file)?;
            let totals = parse_labor_report(&text);
            save_labor(
                ctx,
                LaborRecord {
                    location_id: location,
                    date,
                    regular_hours: totals.regular_hours,
                    overtime_hours: totals.overtime_hours,
                    regular_wages_cents: totals.regular_wages_cents,
                    overtime_wages_cents: totals.overtime_wages_cents,
                },
            )
        }
        LaborCommands::Set {
            location,
            date,
            regular,
            overtime,
            regular_wages,
            overtime_wages,
        } => {
            let date = parse_date_arg(&date)?;
            ctx.store.get_location(location)?;
            save_labor(
                ctx,
                LaborRecord {
                    location_id: location,
                    date,
                    regular_hours: parse_hours_arg(&regular)?,
                    overtime_hours: parse_hours_arg(&overtime)?,
                    regular_wages_cents: parse_amount_arg(&regular_wages)?,
                    overtime_wages_cents: parse_amount_arg(&overtime_wages)?,
                },
            )
        }
        LaborCommands::Show { location, date, json } => {
            let date = parse_date_arg(&date)?;
            let record = ctx.store.labor_by_date(location, date)?;
            if json {
                return print_json(&record);
            }
            match &record {
                Some(record) => print_labor(record),
                None => eprintln!("no labor recorded for {date}"),
            }
            Ok(())
        }
        LaborCommands::List { location, range, json } => {
            let (start, end) = ctx.range(&range)?;
            ctx.store.get_location(location)?;
            let records = ctx.store.labor_in_range(location, start, end)?;
            if json {
                return print_json(&records);
            }
            records.iter().for_each(print_labor);
            Ok(())
        }
    }
}

fn save_labor(ctx: &mut Context, record: LaborRecord) -> Result<(), CliError> {
    ctx.store.save_labor(record.clone())?;
    eprintln!(
        "saved labor for {}: {} hours, {}",
        record.date,
        hours(record.total_hours()),
        money(record.total_wages_cents())
    );
    print_json(&record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sales_entries_resolve_known_items() {
        let line = sales_entry(SalesCategory::Destination, "carry out=1,250.50").unwrap();
        assert_eq!(line.item, "Carry Out");
        assert_eq!(line.amount_cents, 125_050);
        assert!(sales_entry(SalesCategory::DayPart, "Brunch=10").is_err());
        assert!(sales_entry(SalesCategory::DayPart, "Lunch").is_err());
        assert!(sales_entry(SalesCategory::DayPart, "Lunch=lots").is_err());
    }

    #[test]
    fn hours_accept_decimal_and_clock() {
        assert_eq!(parse_hours_arg("8.5").unwrap(), 8.5);
        assert_eq!(parse_hours_arg("7:30").unwrap(), 7.5);
        assert_eq!(parse_hours_arg("0:00").unwrap(), 0.0);
        assert!(parse_hours_arg("-1").is_err());
        assert!(parse_hours_arg("soon").is_err());
        assert!(parse_hours_arg("x:yy").is_err());
    }
}
