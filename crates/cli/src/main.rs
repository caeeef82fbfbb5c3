// Totem CLI - restaurant report imports, employee reconciliation and rollups

mod exit_codes;
mod file_store;
mod imports;
mod output;
mod payroll;
mod performance;
mod roster;
mod sales;
mod timepunch;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use totem_config::{ConfigError, Settings};
use totem_recon::{CommonRanges, ReconError, StoreError};
use totem_reports::ReportError;
use tracing_subscriber::EnvFilter;

use exit_codes::{store_exit_code, EXIT_CONFIG, EXIT_IO, EXIT_PARSE, EXIT_SUCCESS, EXIT_USAGE};
use file_store::FileStore;

#[derive(Parser)]
#[command(name = "totem")]
#[command(about = "Restaurant operations: report imports, employee reconciliation, labor and sales rollups")]
#[command(version)]
#[command(long_version = long_version())]
struct Cli {
    /// Settings file (default: <config dir>/totem/totem.toml)
    #[arg(long, global = true, env = "TOTEM_CONFIG")]
    config: Option<PathBuf>,

    /// Store file, overriding the settings file
    #[arg(long, global = true, env = "TOTEM_STORE")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or initialize the settings file
    #[command(subcommand)]
    Config(ConfigCommands),

    #[command(flatten)]
    Data(DataCommands),
}

/// Commands that work against the store.
#[derive(Subcommand)]
enum DataCommands {
    /// Manage locations
    #[command(subcommand)]
    Location(roster::LocationCommands),

    /// Manage employees
    #[command(subcommand)]
    Employee(roster::EmployeeCommands),

    /// Reconcile roster, birthdate and department uploads against employees
    #[command(subcommand)]
    Import(imports::ImportCommands),

    /// Import and review day-part and destination sales
    #[command(subcommand)]
    Sales(sales::SalesCommands),

    /// Import daily labor totals
    #[command(subcommand)]
    Labor(sales::LaborCommands),

    /// Record bonuses, tip outs and other payroll events
    #[command(subcommand)]
    Payroll(payroll::PayrollCommands),

    /// Manage location salary lines
    #[command(subcommand)]
    Salary(payroll::SalaryCommands),

    /// Summarize time-punch reports
    #[command(subcommand)]
    Timepunch(timepunch::TimepunchCommands),

    /// Daily sales vs labor over a range (JSON)
    #[command(after_help = "\
Examples:
  totem performance --location 1
  totem performance --location 1 --start 2024-01-01 --end 2024-03-31
  totem performance --location 1 --preset month")]
    Performance {
        #[arg(long)]
        location: i64,

        #[command(flatten)]
        range: RangeArgs,
    },
}

/// Date filter shared by the range reports.
#[derive(Args, Debug, Clone)]
pub struct RangeArgs {
    /// Range start (default: end minus reports.default_range_days)
    #[arg(long)]
    pub start: Option<String>,

    /// Range end (default: today)
    #[arg(long)]
    pub end: Option<String>,

    /// A common range ending today
    #[arg(long, value_enum, conflicts_with_all = ["start", "end"])]
    pub preset: Option<RangePreset>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePreset {
    /// Month to date
    Month,
    /// Last 90 days
    Ninety,
    /// Year to date
    Ytd,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the settings file path and the effective settings
    Show,
    /// Write a settings file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        let hint = match &err {
            StoreError::LocationNotFound(_) => Some("run `totem location list` to see location ids".to_string()),
            StoreError::EmployeeNotFound(_) => {
                Some("run `totem employee list --location <ID>` to see employee ids".to_string())
            }
            _ => None,
        };
        Self { code: store_exit_code(&err), message: err.to_string(), hint }
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        Self {
            code: store_exit_code(&err.source),
            message: err.to_string(),
            hint: None,
        }
    }
}

impl From<ReportError> for CliError {
    fn from(err: ReportError) -> Self {
        Self::parse(err.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self {
            code: EXIT_CONFIG,
            message: err.to_string(),
            hint: Some("fix the file or run `totem config init --force`".to_string()),
        }
    }
}

// ============================================================================
// Shared context
// ============================================================================

/// What every store-backed command needs.
pub struct Context {
    pub store: FileStore,
    pub settings: Settings,
    pub today: NaiveDate,
}

impl Context {
    /// Resolve a preset, or a `--start`/`--end` pair with gaps filled from
    /// the configured default range.
    pub fn range(&self, args: &RangeArgs) -> Result<(NaiveDate, NaiveDate), CliError> {
        if let Some(preset) = args.preset {
            let ranges = CommonRanges::for_today(self.today);
            let start = match preset {
                RangePreset::Month => ranges.month_start,
                RangePreset::Ninety => ranges.ninety_start,
                RangePreset::Ytd => ranges.ytd_start,
            };
            return Ok((start, ranges.today));
        }
        let start = args.start.as_deref().map(parse_date_arg).transpose()?;
        let end = args.end.as_deref().map(parse_date_arg).transpose()?;
        Ok(totem_recon::resolve_range(
            start,
            end,
            self.today,
            self.settings.reports.default_range_days,
        ))
    }
}

/// Accepts the same layouts as the report parsers (ISO, M/D/YYYY, ...).
pub fn parse_date_arg(value: &str) -> Result<NaiveDate, CliError> {
    totem_reports::dates::parse_date(value)
        .ok_or_else(|| CliError::args(format!("invalid date: {value}")).with_hint("use YYYY-MM-DD"))
}

/// `"1,234.50"`, `"$12"`, `"-5"` → cents.
pub fn parse_amount_arg(value: &str) -> Result<i64, CliError> {
    let cleaned: String = value.trim().chars().filter(|c| *c != '$' && *c != ',').collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(totem_reports::money::parse_money(&cleaned)),
        _ => Err(CliError::args(format!("invalid amount: {value}"))),
    }
}

pub fn read_input(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|e| CliError::io(format!("cannot read {}: {e}", path.display())))
}

pub fn read_text_input(path: &Path) -> Result<String, CliError> {
    let bytes = read_input(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// ============================================================================
// Entry
// ============================================================================

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.unwrap_or_else(Settings::config_path);

    let command = match cli.command {
        Commands::Config(cmd) => return cmd_config(&cmd, &config_path),
        Commands::Data(command) => command,
    };

    let settings = Settings::load_from(&config_path)?;
    init_tracing(&settings);

    let store_path = cli.store.unwrap_or_else(|| settings.store_path());
    tracing::debug!(store = %store_path.display(), "opening store");
    let store = FileStore::open(&store_path)?;
    let mut ctx = Context {
        store,
        settings,
        today: chrono::Local::now().date_naive(),
    };

    match command {
        DataCommands::Location(cmd) => roster::cmd_location(&mut ctx, cmd),
        DataCommands::Employee(cmd) => roster::cmd_employee(&mut ctx, cmd),
        DataCommands::Import(cmd) => imports::cmd_import(&mut ctx, cmd),
        DataCommands::Sales(cmd) => sales::cmd_sales(&mut ctx, cmd),
        DataCommands::Labor(cmd) => sales::cmd_labor(&mut ctx, cmd),
        DataCommands::Payroll(cmd) => payroll::cmd_payroll(&mut ctx, cmd),
        DataCommands::Salary(cmd) => payroll::cmd_salary(&mut ctx, cmd),
        DataCommands::Timepunch(cmd) => timepunch::cmd_timepunch(&mut ctx, cmd),
        DataCommands::Performance { location, range } => performance::cmd_performance(&ctx, location, &range),
    }
}

fn cmd_config(cmd: &ConfigCommands, path: &Path) -> Result<(), CliError> {
    match cmd {
        ConfigCommands::Show => {
            let settings = Settings::load_from(path)?;
            println!("# {}", path.display());
            println!("# store: {}", settings.store_path().display());
            let text = settings
                .to_toml()
                .map_err(|e| CliError::io(format!("cannot render settings: {e}")))?;
            print!("{text}");
            Ok(())
        }
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::args(format!("{} already exists", path.display()))
                    .with_hint("pass --force to overwrite"));
            }
            Settings::default().save_to(path)?;
            println!("wrote {}", path.display());
            Ok(())
        }
    }
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}
