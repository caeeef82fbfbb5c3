//! `totem import` - reconcile uploaded rosters against stored employees.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde::Serialize;
use totem_recon::reconcile::{apply, plan_bio_import, plan_birthdate_import, plan_department_import};
use totem_recon::{LocationId, ReconcileOutcome, ReconcilePlan, Store};
use totem_reports::{parse_bio_roster, parse_birthdates, parse_departments};

use crate::output::print_json;
use crate::{parse_date_arg, read_input, read_text_input, CliError, Context};

#[derive(Subcommand)]
pub enum ImportCommands {
    /// Employee bio roster (.xlsx/.xls): create, rename, reinstate, terminate
    #[command(after_help = "\
Examples:
  totem import bio --location 1 EmployeeBio.xlsx
  totem import bio --location 1 EmployeeBio.xlsx --date 2024-03-01 --dry-run

Active employees missing from the roster are terminated as of --date
(default: today).")]
    Bio {
        #[arg(long)]
        location: LocationId,
        file: PathBuf,
        /// Termination date for employees absent from the roster
        #[arg(long)]
        date: Option<String>,
        /// Print the planned changes as JSON without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Birthdate spreadsheet (.xlsx/.xls)
    Birthdates {
        #[arg(long)]
        location: LocationId,
        file: PathBuf,
        #[arg(long)]
        dry_run: bool,
    },

    /// HotSchedules staff page (saved HTML)
    #[command(after_help = "\
Examples:
  totem import departments --location 1 staff.html")]
    Departments {
        #[arg(long)]
        location: LocationId,
        file: PathBuf,
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Serialize)]
struct ImportReport<'a> {
    rows: usize,
    #[serde(flatten)]
    outcome: &'a ReconcileOutcome,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn cmd_import(ctx: &mut Context, cmd: ImportCommands) -> Result<(), CliError> {
    let (location, rows, plan, dry_run) = match cmd {
        ImportCommands::Bio {
            location,
            file,
            date,
            dry_run,
        } => {
            let run_date = match date {
                Some(d) => parse_date_arg(&d)?,
                None => ctx.today,
            };
            let data = read_input(&file)?;
            let rows = parse_bio_roster(&data, &file_name(&file))?;
            let existing = employees(ctx, location)?;
            (location, rows.len(), plan_bio_import(&existing, &rows, run_date), dry_run)
        }
        ImportCommands::Birthdates { location, file, dry_run } => {
            let data = read_input(&file)?;
            let rows = parse_birthdates(&data, &file_name(&file))?;
            let existing = employees(ctx, location)?;
            (location, rows.len(), plan_birthdate_import(&existing, &rows), dry_run)
        }
        ImportCommands::Departments { location, file, dry_run } => {
            let html = read_text_input(&file)?;
            let rows = parse_departments(&html)?;
            let existing = employees(ctx, location)?;
            (location, rows.len(), plan_department_import(&existing, &rows), dry_run)
        }
    };

    if dry_run {
        return print_json(&plan);
    }
    run_plan(ctx, location, rows, &plan)
}

fn employees(ctx: &Context, location: LocationId) -> Result<Vec<totem_recon::Employee>, CliError> {
    ctx.store.get_location(location)?;
    Ok(ctx.store.list_employees(location)?)
}

fn run_plan(ctx: &mut Context, location: LocationId, rows: usize, plan: &ReconcilePlan) -> Result<(), CliError> {
    match apply(&mut ctx.store, location, plan) {
        Ok(outcome) => {
            eprintln!(
                "{} rows: {} created, {} renamed, {} reinstated, {} terminated, {} birthdays, {} departments, {} unmatched",
                rows,
                outcome.created,
                outcome.renamed,
                outcome.reinstated,
                outcome.terminated,
                outcome.birthdays,
                outcome.departments,
                outcome.unmatched
            );
            print_json(&ImportReport { rows, outcome: &outcome })
        }
        Err(err) => {
            let applied = err.applied;
            Err(CliError::from(err).with_hint(format!(
                "{applied} change(s) were saved; re-running the import applies the rest"
            )))
        }
    }
}
