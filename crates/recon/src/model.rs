use indexmap::IndexMap;
use serde::Serialize;

use crate::config::AuditKind;

/// Key of the single synthetic major used where the data has no major column.
pub const DEFAULT_MAJOR: &str = "_default";

// ---------------------------------------------------------------------------
// Topology
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PortStatus {
    Occupied,
    Idle,
}

/// A splitter port as read from one sheet row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Port {
    pub name: String,
    pub next_hop: String,
    /// Link audit only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_port_id: Option<String>,
    /// Port audit only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PortStatus>,
    /// 1-based row that created the port.
    pub source_line: usize,
    /// Name of the owning splitter.
    pub splitter: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Splitter {
    pub name: String,
    pub ports: IndexMap<String, Port>,
}

impl Splitter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ports: IndexMap::new(),
        }
    }
}

/// Discipline grouping. Port audits carry a single [`DEFAULT_MAJOR`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Major {
    pub name: String,
    pub splitters: IndexMap<String, Splitter>,
}

impl Major {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            splitters: IndexMap::new(),
        }
    }

    pub fn port_count(&self) -> usize {
        self.splitters.values().map(|s| s.ports.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineRoom {
    pub name: String,
    pub majors: IndexMap<String, Major>,
}

impl MachineRoom {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            majors: IndexMap::new(),
        }
    }

    pub fn splitter_count(&self) -> usize {
        self.majors.values().map(|m| m.splitters.len()).sum()
    }
}

/// Rooms keyed by name, in order of first appearance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hierarchy {
    pub kind: AuditKind,
    pub rooms: IndexMap<String, MachineRoom>,
}

impl Hierarchy {
    pub fn empty(kind: AuditKind) -> Self {
        Self {
            kind,
            rooms: IndexMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn port_count(&self) -> usize {
        self.rooms
            .values()
            .flat_map(|r| r.majors.values())
            .map(Major::port_count)
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Diff
// ---------------------------------------------------------------------------

/// Which field comparison failed for a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    Name,
    Status,
    NextHop,
}

impl std::fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "port name mismatch"),
            Self::Status => write!(f, "port occupancy status mismatch"),
            Self::NextHop => write!(f, "port next-hop mismatch"),
        }
    }
}

/// A mismatch tied to the ledger row it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineError {
    pub line: usize,
    pub kind: MismatchKind,
}

impl std::fmt::Display for LineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

/// Counts for one room (port audit) or one room + major (link audit).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDiff {
    pub room: String,
    /// Link audit only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    pub splitter_count: usize,
    pub total_ports: usize,
    /// Port audit only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupied_count: Option<usize>,
    /// Port audit only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_count: Option<usize>,
    pub right_count: usize,
    pub wrong_count: usize,
    pub line_errors: Vec<LineError>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiffEntry {
    Group(GroupDiff),
    /// Ledger room with no counterpart in the export. Always the last entry.
    UnmatchedRoom { room: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffResult {
    pub kind: AuditKind,
    pub entries: Vec<DiffEntry>,
    pub verdict: Verdict,
}

impl DiffResult {
    pub fn groups(&self) -> impl Iterator<Item = &GroupDiff> {
        self.entries.iter().filter_map(|e| match e {
            DiffEntry::Group(g) => Some(g),
            DiffEntry::UnmatchedRoom { .. } => None,
        })
    }

    pub fn unmatched_room(&self) -> Option<&str> {
        self.entries.iter().find_map(|e| match e {
            DiffEntry::UnmatchedRoom { room } => Some(room.as_str()),
            DiffEntry::Group(_) => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Verdict + Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Perfect,
    Success,
    Error,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Perfect => write!(f, "perfect"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReportSegment {
    Group {
        room: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        major: Option<String>,
        verdict: Verdict,
        splitter_count: usize,
        total_ports: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        occupied_ports: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        idle_ports: Option<usize>,
        right_ports: usize,
        wrong_ports: usize,
        errors: Vec<String>,
    },
    UnmatchedRoom {
        room: String,
        message: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub verdict: Verdict,
    pub segments: Vec<ReportSegment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub config_name: String,
    pub kind: AuditKind,
    pub engine_version: String,
    pub ledger_rooms: usize,
    pub ledger_ports: usize,
    pub exported_rooms: usize,
    pub exported_ports: usize,
}
