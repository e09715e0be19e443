//! Sheet rows → room / major / splitter / port hierarchy.

use crate::config::{AuditKind, ColumnMapping, DEFAULT_IDLE_MARKER, DEFAULT_PATH_SEPARATOR};
use crate::model::{Hierarchy, MachineRoom, Major, Port, PortStatus, Splitter, DEFAULT_MAJOR};
use crate::sheet::TabularSheet;

/// Text rules applied while reading cells.
#[derive(Debug, Clone)]
pub struct ExtractRules {
    pub idle_marker: String,
    pub path_separator: String,
}

impl Default for ExtractRules {
    fn default() -> Self {
        Self {
            idle_marker: DEFAULT_IDLE_MARKER.into(),
            path_separator: DEFAULT_PATH_SEPARATOR.into(),
        }
    }
}

impl ExtractRules {
    /// Last segment of a fully qualified identifier.
    fn last_segment<'a>(&self, value: &'a str) -> &'a str {
        value.rsplit(self.path_separator.as_str()).next().unwrap_or(value)
    }

    fn status(&self, cell: Option<&str>) -> PortStatus {
        match cell {
            Some(s) if s.trim() == self.idle_marker => PortStatus::Idle,
            _ => PortStatus::Occupied,
        }
    }
}

/// Build a hierarchy with the default idle marker and path separator.
pub fn extract(
    sheet: &dyn TabularSheet,
    mapping: &ColumnMapping,
    start_row: usize,
    kind: AuditKind,
) -> Hierarchy {
    extract_with_rules(sheet, mapping, start_row, kind, &ExtractRules::default())
}

/// Scan rows `start_row..=last_row` and build the hierarchy.
///
/// First occurrence wins at every level: a repeated room, major or splitter
/// is reused as-is and a repeated port row is ignored. A sheet whose last row
/// is not past `start_row` yields an empty hierarchy.
pub fn extract_with_rules(
    sheet: &dyn TabularSheet,
    mapping: &ColumnMapping,
    start_row: usize,
    kind: AuditKind,
    rules: &ExtractRules,
) -> Hierarchy {
    let mut hierarchy = Hierarchy::empty(kind);

    let last_row = match sheet.extent() {
        Some(extent) => extent.last_row,
        None => 0,
    };
    if last_row <= start_row {
        tracing::debug!(last_row, start_row, "sheet has no data rows");
        return hierarchy;
    }

    // Row 0 does not exist; clamp so a start_row of 0 scans from the top.
    for row in start_row.max(1)..=last_row {
        let Some(room_name) = sheet.text(mapping.room, row) else {
            continue;
        };

        let major_name = match (kind, mapping.major) {
            (AuditKind::LinkAudit, Some(col)) => {
                sheet.text(col, row).unwrap_or_else(|| DEFAULT_MAJOR.to_string())
            }
            _ => DEFAULT_MAJOR.to_string(),
        };

        let room = hierarchy
            .rooms
            .entry(room_name.clone())
            .or_insert_with(|| MachineRoom::new(room_name));
        let major = room
            .majors
            .entry(major_name.clone())
            .or_insert_with(|| Major::new(major_name));

        let Some(splitter_name) = sheet.text(mapping.splitter, row) else {
            continue;
        };
        let splitter = major
            .splitters
            .entry(splitter_name.clone())
            .or_insert_with(|| Splitter::new(splitter_name));

        let Some(port_cell) = sheet.text(mapping.port, row) else {
            continue;
        };
        let port_name = match kind {
            AuditKind::LinkAudit => rules.last_segment(&port_cell).to_string(),
            AuditKind::PortAudit => port_cell,
        };
        if port_name.is_empty() || splitter.ports.contains_key(&port_name) {
            continue;
        }

        let next_hop = sheet
            .text(mapping.next_hop, row)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        let detail = sheet.text(mapping.next_port_or_status, row);

        let (status, next_port_id) = match kind {
            AuditKind::PortAudit => (Some(rules.status(detail.as_deref())), None),
            AuditKind::LinkAudit => {
                let id = detail
                    .as_deref()
                    .map(|s| rules.last_segment(s.trim()).to_string())
                    .unwrap_or_default();
                (None, Some(id))
            }
        };

        splitter.ports.insert(
            port_name.clone(),
            Port {
                name: port_name,
                next_hop,
                next_port_id,
                status,
                source_line: row,
                splitter: splitter.name.clone(),
            },
        );
    }

    tracing::debug!(
        rooms = hierarchy.rooms.len(),
        ports = hierarchy.port_count(),
        %kind,
        "extracted hierarchy"
    );

    hierarchy
}
