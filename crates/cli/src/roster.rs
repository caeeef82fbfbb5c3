//! `totem location` and `totem employee` subcommands.

use clap::Subcommand;
use totem_recon::{Employee, LocationId, NewEmployee, Store};
use totem_reports::Department;

use crate::output::{money, pad_right, print_json};
use crate::{parse_amount_arg, parse_date_arg, CliError, Context};

#[derive(Subcommand)]
pub enum LocationCommands {
    /// Create a location
    #[command(after_help = "\
Examples:
  totem location add \"Main Street\" 01234")]
    Add {
        name: String,
        /// Store number as printed on the reports
        number: String,
    },

    /// List locations
    List {
        #[arg(long)]
        json: bool,
    },

    /// Rename or renumber a location
    Edit {
        id: LocationId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        number: Option<String>,
    },

    /// Remove a location and everything recorded under it
    Remove { id: LocationId },
}

#[derive(Subcommand)]
pub enum EmployeeCommands {
    /// List employees of a location
    #[command(after_help = "\
Examples:
  totem employee list --location 1
  totem employee list --location 1 --all --json")]
    List {
        #[arg(long)]
        location: LocationId,
        /// Include terminated employees
        #[arg(long)]
        all: bool,
        #[arg(long)]
        json: bool,
    },

    /// Add an employee by hand
    Add {
        #[arg(long)]
        location: LocationId,
        #[arg(long)]
        first: String,
        #[arg(long)]
        last: String,
        /// Name as the punch clock prints it ("Last, First")
        #[arg(long)]
        time_punch_name: Option<String>,
        /// NONE, PARTNER, EXECUTIVE, CENTRAL, DIRECTOR, BOH or FOH
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        birthday: Option<String>,
        /// Annual salary in dollars
        #[arg(long)]
        salary: Option<String>,
    },

    /// Change fields of an employee
    #[command(after_help = "\
Examples:
  totem employee edit 7 --department FOH
  totem employee edit 7 --salary 52,000
  totem employee edit 7 --terminate 2024-03-01
  totem employee edit 7 --reinstate")]
    Edit {
        id: i64,
        #[arg(long)]
        first: Option<String>,
        #[arg(long)]
        last: Option<String>,
        #[arg(long)]
        time_punch_name: Option<String>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        birthday: Option<String>,
        /// Annual salary in dollars; "0" clears it
        #[arg(long)]
        salary: Option<String>,
        /// Terminate as of this date
        #[arg(long, conflicts_with = "reinstate")]
        terminate: Option<String>,
        /// Clear the termination date
        #[arg(long)]
        reinstate: bool,
    },

    /// Delete an employee record
    Remove { id: i64 },
}

pub fn cmd_location(ctx: &mut Context, cmd: LocationCommands) -> Result<(), CliError> {
    match cmd {
        LocationCommands::Add { name, number } => {
            if name.trim().is_empty() {
                return Err(CliError::args("location name is empty"));
            }
            let location = ctx.store.create_location(name.trim(), number.trim())?;
            println!("created location {} ({})", location.id, location.name);
            Ok(())
        }
        LocationCommands::List { json } => {
            let locations = ctx.store.list_locations()?;
            if json {
                return print_json(&locations);
            }
            if locations.is_empty() {
                eprintln!("no locations; add one with `totem location add NAME NUMBER`");
            }
            for location in &locations {
                println!("{:>4}  {}  {}", location.id, pad_right(&location.number, 8), location.name);
            }
            Ok(())
        }
        LocationCommands::Edit { id, name, number } => {
            let current = ctx.store.get_location(id)?;
            let name = name.unwrap_or(current.name);
            let number = number.unwrap_or(current.number);
            ctx.store.update_location(id, &name, &number)?;
            println!("updated location {id}");
            Ok(())
        }
        LocationCommands::Remove { id } => {
            ctx.store.delete_location(id)?;
            println!("removed location {id}");
            Ok(())
        }
    }
}

fn parse_department(value: &str) -> Result<Department, CliError> {
    value
        .parse()
        .map_err(|e: String| CliError::args(e).with_hint("one of NONE, PARTNER, EXECUTIVE, CENTRAL, DIRECTOR, BOH, FOH"))
}

fn require_names(first: &str, last: &str) -> Result<(), CliError> {
    if first.is_empty() || last.is_empty() {
        return Err(CliError::args("first name and last name are required"));
    }
    Ok(())
}

fn parse_salary(value: &str) -> Result<Option<i64>, CliError> {
    let cents = parse_amount_arg(value)?;
    if cents < 0 {
        return Err(CliError::args(format!("salary cannot be negative: {value}")));
    }
    Ok((cents > 0).then_some(cents))
}

pub fn cmd_employee(ctx: &mut Context, cmd: EmployeeCommands) -> Result<(), CliError> {
    match cmd {
        EmployeeCommands::List { location, all, json } => {
            ctx.store.get_location(location)?;
            let mut employees: Vec<Employee> = ctx
                .store
                .list_employees(location)?
                .into_iter()
                .filter(|e| all || e.is_active())
                .collect();
            employees.sort_by(|a, b| {
                (a.last_name.to_lowercase(), a.first_name.to_lowercase())
                    .cmp(&(b.last_name.to_lowercase(), b.first_name.to_lowercase()))
            });
            if json {
                return print_json(&employees);
            }
            for e in &employees {
                let status = match e.termination_date {
                    Some(date) => format!("terminated {date}"),
                    None => String::new(),
                };
                let salary = e.annual_salary_cents.map(money).unwrap_or_default();
                println!(
                    "{:>5}  {}  {}  {}  {}",
                    e.id,
                    pad_right(&e.display_name(), 28),
                    pad_right(e.department.as_str(), 9),
                    pad_right(&salary, 12),
                    status
                );
            }
            Ok(())
        }
        EmployeeCommands::Add {
            location,
            first,
            last,
            time_punch_name,
            department,
            birthday,
            salary,
        } => {
            let new = NewEmployee {
                first_name: first.trim().to_string(),
                last_name: last.trim().to_string(),
                time_punch_name: time_punch_name.unwrap_or_default(),
                department: department.as_deref().map(parse_department).transpose()?.unwrap_or_default(),
                birthday: birthday.as_deref().map(parse_date_arg).transpose()?,
                annual_salary_cents: salary.as_deref().map(parse_salary).transpose()?.flatten(),
            };
            require_names(&new.first_name, &new.last_name)?;
            let employee = ctx.store.create_employee(location, new)?;
            println!("created employee {} ({})", employee.id, employee.display_name());
            Ok(())
        }
        EmployeeCommands::Edit {
            id,
            first,
            last,
            time_punch_name,
            department,
            birthday,
            salary,
            terminate,
            reinstate,
        } => {
            let mut employee = ctx.store.get_employee(id)?;
            let renamed = first.is_some() || last.is_some();
            if let Some(first) = first {
                employee.first_name = first.trim().to_string();
            }
            if let Some(last) = last {
                employee.last_name = last.trim().to_string();
            }
            if let Some(name) = time_punch_name {
                employee.time_punch_name = name;
            }
            if let Some(department) = department {
                employee.department = parse_department(&department)?;
            }
            if let Some(birthday) = birthday {
                employee.birthday = Some(parse_date_arg(&birthday)?);
            }
            if let Some(salary) = salary {
                employee.annual_salary_cents = parse_salary(&salary)?;
            }
            if renamed {
                require_names(&employee.first_name, &employee.last_name)?;
            }
            let terminate = terminate.as_deref().map(parse_date_arg).transpose()?;

            ctx.store.update_employee(&employee)?;
            if let Some(date) = terminate {
                ctx.store.terminate_employee(id, date)?;
            } else if reinstate {
                ctx.store.reinstate_employee(id)?;
            }
            println!("updated employee {id}");
            Ok(())
        }
        EmployeeCommands::Remove { id } => {
            ctx.store.delete_employee(id)?;
            println!("removed employee {id}");
            Ok(())
        }
    }
}
