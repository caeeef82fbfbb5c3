//! `totem payroll` and `totem salary` subcommands.

use std::collections::HashMap;

use clap::Subcommand;
use serde::Serialize;
use totem_recon::model::salary_totals;
use totem_recon::{EmployeeId, LocationId, NewPayrollEvent, PayrollEvent, PayrollEventType, Salary, Store};

use crate::output::{money, pad_left, pad_right, print_json};
use crate::{parse_amount_arg, parse_date_arg, CliError, Context, RangeArgs};

#[derive(Subcommand)]
pub enum PayrollCommands {
    /// Record a payroll event for an employee
    #[command(after_help = "\
Examples:
  totem payroll add --location 1 --employee 7 --type bonus --amount 150 --date 2024-03-04
  totem payroll add --location 1 --employee 7 --type tip-out --amount 42.50 --description \"Catering\"")]
    Add {
        #[arg(long)]
        location: LocationId,
        #[arg(long)]
        employee: EmployeeId,
        /// Bonus, Tip Out, Adjustment, Reimbursement or Other
        #[arg(long = "type")]
        event_type: String,
        /// Dollars; negative for deductions
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
        /// Defaults to today
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Payroll events over a range, newest first
    List {
        #[arg(long)]
        location: LocationId,
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long)]
        json: bool,
    },

    /// Delete a payroll event
    Remove { id: i64 },
}

#[derive(Subcommand)]
pub enum SalaryCommands {
    /// Add a salary line to a location
    #[command(after_help = "\
Examples:
  totem salary add --location 1 \"General Manager\" 65,000")]
    Add {
        #[arg(long)]
        location: LocationId,
        name: String,
        /// Annual dollars
        annual: String,
    },

    /// Salary lines with annual and daily totals
    List {
        #[arg(long)]
        location: LocationId,
        #[arg(long)]
        json: bool,
    },

    /// Delete a salary line
    Remove { id: i64 },
}

#[derive(Serialize)]
struct PayrollListing<'a> {
    events: &'a [PayrollEvent],
    total_cents: i64,
}

#[derive(Serialize)]
struct SalaryListing<'a> {
    salaries: &'a [Salary],
    annual_total_cents: i64,
    daily_total_cents: i64,
}

pub fn cmd_payroll(ctx: &mut Context, cmd: PayrollCommands) -> Result<(), CliError> {
    match cmd {
        PayrollCommands::Add {
            location,
            employee,
            event_type,
            amount,
            date,
            description,
        } => {
            let event_type: PayrollEventType = event_type.parse().map_err(|e: String| {
                CliError::args(e).with_hint("one of Bonus, Tip Out, Adjustment, Reimbursement, Other")
            })?;
            let amount_cents = parse_amount_arg(&amount)?;
            let date = match date {
                Some(d) => parse_date_arg(&d)?,
                None => ctx.today,
            };
            ctx.store.get_location(location)?;
            let owner = ctx.store.get_employee(employee)?;
            if owner.location_id != location {
                return Err(CliError::args(format!(
                    "employee {} does not belong to location {}",
                    employee, location
                )));
            }
            let event = ctx.store.create_payroll_event(
                location,
                NewPayrollEvent {
                    employee_id: employee,
                    date,
                    event_type,
                    description,
                    amount_cents,
                },
            )?;
            println!(
                "recorded {} {} for {} (event {})",
                event.event_type,
                money(event.amount_cents),
                owner.display_name(),
                event.id
            );
            Ok(())
        }
        PayrollCommands::List { location, range, json } => {
            let (start, end) = ctx.range(&range)?;
            ctx.store.get_location(location)?;
            let events = ctx.store.payroll_events_in_range(location, start, end)?;
            let total_cents = events.iter().map(|e| e.amount_cents).fold(0i64, i64::saturating_add);
            if json {
                return print_json(&PayrollListing {
                    events: &events,
                    total_cents,
                });
            }
            let names: HashMap<EmployeeId, String> = ctx
                .store
                .list_employees(location)?
                .into_iter()
                .map(|e| (e.id, e.display_name()))
                .collect();
            for e in &events {
                let name = names.get(&e.employee_id).map(String::as_str).unwrap_or("?");
                println!(
                    "{:>5}  {}  {}  {}{}  {}",
                    e.id,
                    e.date,
                    pad_right(name, 24),
                    pad_right(e.event_type.as_str(), 14),
                    pad_left(&money(e.amount_cents), 12),
                    e.description
                );
            }
            println!("total {}", money(total_cents));
            Ok(())
        }
        PayrollCommands::Remove { id } => {
            ctx.store.delete_payroll_event(id)?;
            println!("removed payroll event {id}");
            Ok(())
        }
    }
}

pub fn cmd_salary(ctx: &mut Context, cmd: SalaryCommands) -> Result<(), CliError> {
    match cmd {
        SalaryCommands::Add { location, name, annual } => {
            let annual_cents = parse_amount_arg(&annual)?;
            if annual_cents <= 0 {
                return Err(CliError::args(format!("annual salary must be positive: {annual}")));
            }
            let salary = ctx.store.create_salary(location, name.trim(), annual_cents)?;
            println!(
                "added salary {} ({}: {}/yr, {}/day)",
                salary.id,
                salary.name,
                money(salary.annual_cents),
                money(salary.daily_cents())
            );
            Ok(())
        }
        SalaryCommands::List { location, json } => {
            ctx.store.get_location(location)?;
            let salaries = ctx.store.list_salaries(location)?;
            let (annual_total_cents, daily_total_cents) = salary_totals(&salaries);
            if json {
                return print_json(&SalaryListing {
                    salaries: &salaries,
                    annual_total_cents,
                    daily_total_cents,
                });
            }
            for s in &salaries {
                println!(
                    "{:>5}  {}{}{}",
                    s.id,
                    pad_right(&s.name, 28),
                    pad_left(&money(s.annual_cents), 14),
                    pad_left(&money(s.daily_cents()), 11)
                );
            }
            println!(
                "       {}{}{}",
                pad_right("Total", 28),
                pad_left(&money(annual_total_cents), 14),
                pad_left(&money(daily_total_cents), 11)
            );
            Ok(())
        }
        SalaryCommands::Remove { id } => {
            ctx.store.delete_salary(id)?;
            println!("removed salary {id}");
            Ok(())
        }
    }
}
