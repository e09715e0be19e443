use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::sheet::column_index;

/// Status cell text that marks a port as idle. Anything else is occupied.
pub const DEFAULT_IDLE_MARKER: &str = "空闲";

/// Separator inside fully qualified port identifiers (`OLT1/0/3/PON5`).
pub const DEFAULT_PATH_SEPARATOR: &str = "/";

// ---------------------------------------------------------------------------
// Audit kind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    /// Tracks port occupancy; one synthetic major per room.
    PortAudit,
    /// Tracks a major grouping and the next-port identifier.
    LinkAudit,
}

impl std::fmt::Display for AuditKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PortAudit => write!(f, "port_audit"),
            Self::LinkAudit => write!(f, "link_audit"),
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuditConfig {
    pub name: String,
    pub kind: AuditKind,
    #[serde(default = "default_idle_marker")]
    pub idle_marker: String,
    #[serde(default = "default_path_separator")]
    pub path_separator: String,
    pub ledger: SourceLayout,
    pub exported: SourceLayout,
}

fn default_idle_marker() -> String {
    DEFAULT_IDLE_MARKER.into()
}

fn default_path_separator() -> String {
    DEFAULT_PATH_SEPARATOR.into()
}

/// Where one dataset keeps its data: first data row plus column letters.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceLayout {
    /// First data row, 1-based. Header rows sit above it.
    pub start_row: usize,
    pub columns: ColumnLetters,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColumnLetters {
    pub room: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    pub splitter: String,
    pub port: String,
    pub next_hop: String,
    /// Status column in a port audit, next-port-id column in a link audit.
    pub next_port_or_status: String,
}

/// Resolved 0-based column indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub room: usize,
    pub major: Option<usize>,
    pub splitter: usize,
    pub port: usize,
    pub next_hop: usize,
    pub next_port_or_status: usize,
}

impl ColumnLetters {
    pub fn resolve(&self, side: &str) -> Result<ColumnMapping, ReconError> {
        let idx = |label: &str| {
            column_index(label).ok_or_else(|| ReconError::InvalidColumn {
                side: side.into(),
                column: label.into(),
            })
        };

        Ok(ColumnMapping {
            room: idx(&self.room)?,
            major: self.major.as_deref().map(idx).transpose()?,
            splitter: idx(&self.splitter)?,
            port: idx(&self.port)?,
            next_hop: idx(&self.next_hop)?,
            next_port_or_status: idx(&self.next_port_or_status)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

fn letters(
    room: &str,
    major: Option<&str>,
    splitter: &str,
    port: &str,
    next_hop: &str,
    next_port_or_status: &str,
) -> ColumnLetters {
    ColumnLetters {
        room: room.into(),
        major: major.map(Into::into),
        splitter: splitter.into(),
        port: port.into(),
        next_hop: next_hop.into(),
        next_port_or_status: next_port_or_status.into(),
    }
}

impl AuditConfig {
    /// Built-in layouts for the standard ledger and export templates.
    pub fn preset(kind: AuditKind) -> Self {
        match kind {
            AuditKind::PortAudit => Self {
                name: "Port audit".into(),
                kind,
                idle_marker: default_idle_marker(),
                path_separator: default_path_separator(),
                ledger: SourceLayout {
                    start_row: 3,
                    columns: letters("C", None, "E", "F", "H", "G"),
                },
                exported: SourceLayout {
                    start_row: 2,
                    columns: letters("A", None, "B", "C", "E", "N"),
                },
            },
            AuditKind::LinkAudit => Self {
                name: "Link audit".into(),
                kind,
                idle_marker: default_idle_marker(),
                path_separator: default_path_separator(),
                ledger: SourceLayout {
                    start_row: 3,
                    columns: letters("A", Some("B"), "J", "K", "L", "M"),
                },
                exported: SourceLayout {
                    start_row: 2,
                    columns: letters("C", None, "A", "B", "D", "E"),
                },
            },
        }
    }

    pub fn to_toml(&self) -> Result<String, ReconError> {
        toml::to_string_pretty(self).map_err(|e| ReconError::ConfigSerialize(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl AuditConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: AuditConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        for (side, layout) in [("ledger", &self.ledger), ("exported", &self.exported)] {
            if layout.start_row == 0 {
                return Err(ReconError::ConfigValidation(format!(
                    "{side}: start_row is 1-based, got 0"
                )));
            }
            layout.columns.resolve(side)?;
        }

        if self.path_separator.is_empty() {
            return Err(ReconError::ConfigValidation(
                "path_separator must not be empty".into(),
            ));
        }

        match self.kind {
            AuditKind::PortAudit => {
                for (side, layout) in [("ledger", &self.ledger), ("exported", &self.exported)] {
                    if layout.columns.major.is_some() {
                        return Err(ReconError::ConfigValidation(format!(
                            "{side}: port_audit has no major column"
                        )));
                    }
                }
            }
            AuditKind::LinkAudit => {
                if self.ledger.columns.major.is_none() {
                    return Err(ReconError::ConfigValidation(
                        "ledger: link_audit requires a major column".into(),
                    ));
                }
                // Export data carries no major dimension.
                if self.exported.columns.major.is_some() {
                    return Err(ReconError::ConfigValidation(
                        "exported: link_audit export has no major column".into(),
                    ));
                }
            }
        }

        Ok(())
    }

    pub fn ledger_mapping(&self) -> Result<ColumnMapping, ReconError> {
        self.ledger.columns.resolve("ledger")
    }

    pub fn exported_mapping(&self) -> Result<ColumnMapping, ReconError> {
        self.exported.columns.resolve("exported")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
