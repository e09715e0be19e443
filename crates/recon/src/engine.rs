use crate::config::AuditConfig;
use crate::diff::diff;
use crate::error::ReconError;
use crate::extract::{extract_with_rules, ExtractRules};
use crate::model::{Hierarchy, Report, ReportMeta};
use crate::report::format;
use crate::sheet::TabularSheet;

/// Both hierarchies built from one file pair.
#[derive(Debug, Clone)]
pub struct AuditInput {
    pub ledger: Hierarchy,
    pub exported: Hierarchy,
}

/// Extract the ledger and exported sheets per config.
pub fn load(
    config: &AuditConfig,
    ledger: &dyn TabularSheet,
    exported: &dyn TabularSheet,
) -> Result<AuditInput, ReconError> {
    let rules = ExtractRules {
        idle_marker: config.idle_marker.clone(),
        path_separator: config.path_separator.clone(),
    };

    let ledger = extract_with_rules(
        ledger,
        &config.ledger_mapping()?,
        config.ledger.start_row,
        config.kind,
        &rules,
    );
    let exported = extract_with_rules(
        exported,
        &config.exported_mapping()?,
        config.exported.start_row,
        config.kind,
        &rules,
    );

    Ok(AuditInput { ledger, exported })
}

/// Run an audit per config. Fails only when the ledger yields no rooms;
/// everything the comparison finds is reported as data.
pub fn run(
    config: &AuditConfig,
    ledger: &dyn TabularSheet,
    exported: &dyn TabularSheet,
) -> Result<Report, ReconError> {
    let input = load(config, ledger, exported)?;
    run_hierarchies(config, &input)
}

/// Compare already-extracted hierarchies.
pub fn run_hierarchies(config: &AuditConfig, input: &AuditInput) -> Result<Report, ReconError> {
    if input.ledger.is_empty() {
        return Err(ReconError::EmptyLedger {
            start_row: config.ledger.start_row,
        });
    }

    let result = diff(&input.ledger, &input.exported);
    let segments = format(&result);

    tracing::info!(
        config = %config.name,
        kind = %config.kind,
        groups = result.groups().count(),
        unmatched_room = result.unmatched_room().unwrap_or(""),
        verdict = %result.verdict,
        "audit complete"
    );

    Ok(Report {
        meta: ReportMeta {
            config_name: config.name.clone(),
            kind: config.kind,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            ledger_rooms: input.ledger.rooms.len(),
            ledger_ports: input.ledger.port_count(),
            exported_rooms: input.exported.rooms.len(),
            exported_ports: input.exported.port_count(),
        },
        verdict: result.verdict,
        segments,
    })
}
