//! `fiberaudit run | validate | preset`: ledger vs export audits.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use fiberaudit_io::{load_sheet, load_sheet_pair, SheetSelector};
use fiberaudit_recon::{AuditConfig, AuditKind, GridSheet, ReconError, Report, ReportSegment};

use crate::exit_codes::{
    report_exit_code, EXIT_AUDIT_EMPTY_LEDGER, EXIT_AUDIT_INVALID_CONFIG, EXIT_AUDIT_SHEET,
    EXIT_ERROR, EXIT_SUCCESS,
};
use crate::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Splitter port occupancy and next hop
    Port,
    /// Major grouping, next hop and next port id
    Link,
}

impl From<KindArg> for AuditKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Port => AuditKind::PortAudit,
            KindArg::Link => AuditKind::LinkAudit,
        }
    }
}

/// Where the two datasets come from.
pub enum Sources {
    Files {
        ledger: PathBuf,
        exported: PathBuf,
        ledger_sheet: SheetSelector,
        exported_sheet: SheetSelector,
    },
    /// One workbook: first sheet ledger, second sheet export.
    Workbook(PathBuf),
}

pub struct RunArgs {
    pub sources: Sources,
    pub kind: Option<KindArg>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub output: Option<PathBuf>,
}

fn audit_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

fn config_err(e: ReconError) -> CliError {
    audit_err(EXIT_AUDIT_INVALID_CONFIG, e.to_string())
}

fn read_config(path: &Path) -> Result<AuditConfig, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        audit_err(EXIT_AUDIT_INVALID_CONFIG, format!("cannot read config {}: {e}", path.display()))
    })?;
    AuditConfig::from_toml(&text).map_err(config_err)
}

/// Config file if given, else the built-in preset for `kind` (port by default).
fn resolve_config(config: Option<&Path>, kind: Option<KindArg>) -> Result<AuditConfig, CliError> {
    match config {
        Some(path) => {
            let config = read_config(path)?;
            if let Some(kind) = kind {
                let kind = AuditKind::from(kind);
                if kind != config.kind {
                    return Err(CliError::args(format!(
                        "--kind {kind} conflicts with config kind {}",
                        config.kind
                    ))
                    .with_hint("drop --kind; the config file decides the audit kind"));
                }
            }
            Ok(config)
        }
        None => Ok(AuditConfig::preset(kind.unwrap_or(KindArg::Port).into())),
    }
}

fn load_sources(sources: &Sources) -> Result<(GridSheet, GridSheet), CliError> {
    let sheet_err = |e: fiberaudit_io::SheetError| audit_err(EXIT_AUDIT_SHEET, e.to_string());
    match sources {
        Sources::Files {
            ledger,
            exported,
            ledger_sheet,
            exported_sheet,
        } => {
            let ledger = load_sheet(ledger, ledger_sheet).map_err(sheet_err)?;
            let exported = load_sheet(exported, exported_sheet).map_err(sheet_err)?;
            Ok((ledger, exported))
        }
        Sources::Workbook(path) => load_sheet_pair(path).map_err(sheet_err),
    }
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let config = resolve_config(args.config.as_deref(), args.kind)?;
    let (ledger, exported) = load_sources(&args.sources)?;

    tracing::debug!(
        ledger = ledger.name(),
        exported = exported.name(),
        kind = %config.kind,
        "loaded sheets"
    );

    let report = fiberaudit_recon::run(&config, &ledger, &exported).map_err(|e| match e {
        ReconError::EmptyLedger { .. } => audit_err(EXIT_AUDIT_EMPTY_LEDGER, e.to_string())
            .with_hint(format!(
                "check that the ledger is the first file and data starts at row {}",
                config.ledger.start_row
            )),
        other => config_err(other),
    })?;

    let json_str = serde_json::to_string_pretty(&report)
        .map_err(|e| audit_err(EXIT_ERROR, format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if args.json {
        println!("{json_str}");
    }

    // Human summary to stderr
    eprint!("{}", render_summary(&report));

    match report_exit_code(&report) {
        EXIT_SUCCESS => Ok(()),
        code => Err(audit_err(code, "")),
    }
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    eprintln!(
        "valid: {} '{}' (ledger from row {}, export from row {})",
        config.kind, config.name, config.ledger.start_row, config.exported.start_row,
    );
    Ok(())
}

pub fn cmd_preset(kind: KindArg) -> Result<(), CliError> {
    let toml = AuditConfig::preset(kind.into()).to_toml().map_err(config_err)?;
    print!("{toml}");
    Ok(())
}

/// Plain-text report, one block per segment.
pub fn render_summary(report: &Report) -> String {
    let mut out = String::new();

    for segment in &report.segments {
        match segment {
            ReportSegment::Group {
                room,
                major,
                verdict,
                splitter_count,
                total_ports,
                occupied_ports,
                idle_ports,
                right_ports,
                wrong_ports,
                errors,
            } => {
                let title = match major {
                    Some(major) => format!("{room} / {major}"),
                    None => room.clone(),
                };
                let _ = write!(out, "{title}: {splitter_count} splitter(s), {total_ports} port(s)");
                if let (Some(occupied), Some(idle)) = (occupied_ports, idle_ports) {
                    let _ = write!(out, ", {occupied} occupied, {idle} idle");
                }
                let _ = writeln!(out, " [{verdict}]");
                let _ = writeln!(out, "  matched against export: {right_ports} right, {wrong_ports} wrong");
                for e in errors {
                    let _ = writeln!(out, "  {e}");
                }
            }
            ReportSegment::UnmatchedRoom { message, .. } => {
                let _ = writeln!(out, "{message}; remaining rooms not compared");
            }
        }
    }

    let _ = writeln!(out, "verdict: {}", report.verdict);
    out
}
