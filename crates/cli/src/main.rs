// fiberaudit - reconcile a splitter wiring ledger against an inventory export

mod audit;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use fiberaudit_io::SheetSelector;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use audit::{KindArg, RunArgs, Sources};
use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "fiberaudit")]
#[command(about = "Reconcile access-network wiring ledgers against inventory exports")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// More log output on stderr (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a ledger against an inventory export and report per room
    #[command(after_help = "\
Examples:
  fiberaudit run --ledger ledger.xlsx --exported export.csv
  fiberaudit run --ledger ledger.csv --exported export.csv --kind link
  fiberaudit run --workbook audit.xlsx --config audit.toml --json
  fiberaudit run --ledger l.xlsx --ledger-sheet 台账 --exported e.xlsx --output report.json

Exit codes:
  0  every compared group perfect
  3  some ports wrong, verdict success
  4  verdict error (more ports wrong than right)
  5  a ledger room is missing from the export
  6  invalid config
  7  ledger or export could not be read
  8  ledger has no data rows")]
    Run {
        /// Ledger file (csv, tsv, xlsx, xls, ods)
        #[arg(long, requires = "exported", conflicts_with = "workbook")]
        ledger: Option<PathBuf>,

        /// Inventory export file (csv, tsv, xlsx, xls, ods)
        #[arg(long, requires = "ledger", conflicts_with = "workbook")]
        exported: Option<PathBuf>,

        /// One workbook holding both: first sheet ledger, second sheet export
        #[arg(long, required_unless_present = "ledger")]
        workbook: Option<PathBuf>,

        /// Ledger sheet, by name or 0-based index (workbooks only)
        #[arg(long, requires = "ledger")]
        ledger_sheet: Option<String>,

        /// Export sheet, by name or 0-based index (workbooks only)
        #[arg(long, requires = "exported")]
        exported_sheet: Option<String>,

        /// Audit kind when no --config is given (default: port)
        #[arg(long, value_enum)]
        kind: Option<KindArg>,

        /// TOML audit config (see `fiberaudit preset`)
        #[arg(long, env = "FIBERAUDIT_CONFIG")]
        config: Option<PathBuf>,

        /// Print the JSON report to stdout
        #[arg(long)]
        json: bool,

        /// Write the JSON report to a file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Check that an audit config parses and its columns are valid
    #[command(after_help = "\
Examples:
  fiberaudit validate audit.toml")]
    Validate {
        /// Config file to check
        config: PathBuf,
    },

    /// Print a built-in audit config as TOML
    #[command(after_help = "\
Examples:
  fiberaudit preset port > audit.toml
  fiberaudit preset link")]
    Preset {
        #[arg(value_enum)]
        kind: KindArg,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nrecon:   fiberaudit-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            ledger,
            exported,
            workbook,
            ledger_sheet,
            exported_sheet,
            kind,
            config,
            json,
            output,
        } => run_sources(ledger, exported, workbook, ledger_sheet, exported_sheet).and_then(
            |sources| {
                audit::cmd_run(RunArgs {
                    sources,
                    kind,
                    config,
                    json,
                    output,
                })
            },
        ),
        Commands::Validate { config } => audit::cmd_validate(config),
        Commands::Preset { kind } => audit::cmd_preset(kind),
    };

    match result {
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

fn run_sources(
    ledger: Option<PathBuf>,
    exported: Option<PathBuf>,
    workbook: Option<PathBuf>,
    ledger_sheet: Option<String>,
    exported_sheet: Option<String>,
) -> Result<Sources, CliError> {
    match (ledger, exported, workbook) {
        (Some(ledger), Some(exported), None) => Ok(Sources::Files {
            ledger,
            exported,
            ledger_sheet: ledger_sheet.as_deref().map(SheetSelector::parse).unwrap_or_default(),
            exported_sheet: exported_sheet.as_deref().map(SheetSelector::parse).unwrap_or_default(),
        }),
        (None, None, Some(workbook)) => Ok(Sources::Workbook(workbook)),
        _ => Err(CliError::args("need --ledger and --exported, or --workbook")),
    }
}

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
        Self { code: exit_codes::EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
