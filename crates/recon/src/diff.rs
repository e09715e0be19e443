use indexmap::IndexMap;

use crate::classify::{classify_group, overall_verdict};
use crate::config::AuditKind;
use crate::model::{
    DiffEntry, DiffResult, GroupDiff, Hierarchy, LineError, Major, MismatchKind, Port, PortStatus,
    Splitter, DEFAULT_MAJOR,
};

/// Walk the ledger hierarchy and compare it against the export.
///
/// Rooms are visited in ledger order. The first ledger room missing from the
/// export ends the walk: it is recorded as an unmatched entry and no later
/// room is compared.
pub fn diff(ledger: &Hierarchy, exported: &Hierarchy) -> DiffResult {
    let kind = ledger.kind;
    let mut entries = Vec::new();
    let empty = IndexMap::new();

    for (room_name, ledger_room) in &ledger.rooms {
        let Some(exported_room) = exported.rooms.get(room_name) else {
            tracing::debug!(room = %room_name, "ledger room missing from export, stopping");
            entries.push(DiffEntry::UnmatchedRoom {
                room: ledger_room.name.clone(),
            });
            break;
        };

        match kind {
            AuditKind::PortAudit => {
                let mut group = new_group(kind, &ledger_room.name, None);
                for (major_name, ledger_major) in &ledger_room.majors {
                    let exported_splitters = exported_room
                        .majors
                        .get(major_name)
                        .map(|m| &m.splitters)
                        .unwrap_or(&empty);
                    count_major(kind, ledger_major, exported_splitters, &mut group);
                }
                entries.push(DiffEntry::Group(group));
            }
            AuditKind::LinkAudit => {
                // Export data has no major dimension; every ledger major is
                // compared against the export's synthetic one.
                let exported_splitters = exported_room
                    .majors
                    .get(DEFAULT_MAJOR)
                    .map(|m| &m.splitters)
                    .unwrap_or(&empty);
                for ledger_major in ledger_room.majors.values() {
                    let mut group =
                        new_group(kind, &ledger_room.name, Some(ledger_major.name.clone()));
                    count_major(kind, ledger_major, exported_splitters, &mut group);
                    entries.push(DiffEntry::Group(group));
                }
            }
        }
    }

    let verdict = overall_verdict(&entries);

    DiffResult {
        kind,
        entries,
        verdict,
    }
}

fn new_group(kind: AuditKind, room: &str, major: Option<String>) -> GroupDiff {
    let port_audit = kind == AuditKind::PortAudit;
    GroupDiff {
        room: room.to_string(),
        major,
        splitter_count: 0,
        total_ports: 0,
        occupied_count: port_audit.then_some(0),
        idle_count: port_audit.then_some(0),
        right_count: 0,
        wrong_count: 0,
        line_errors: Vec::new(),
    }
}

/// Accumulate one ledger major's splitters into `group`.
fn count_major(
    kind: AuditKind,
    ledger_major: &Major,
    exported_splitters: &IndexMap<String, Splitter>,
    group: &mut GroupDiff,
) {
    group.splitter_count += ledger_major.splitters.len();

    for (splitter_name, ledger_splitter) in &ledger_major.splitters {
        group.total_ports += ledger_splitter.ports.len();

        let Some(exported_splitter) = exported_splitters.get(splitter_name) else {
            // Whole splitter counts as wrong, without per-line detail.
            group.wrong_count += ledger_splitter.ports.len();
            continue;
        };

        for (port_name, ledger_port) in &ledger_splitter.ports {
            if kind == AuditKind::PortAudit {
                match ledger_port.status {
                    Some(PortStatus::Idle) => {
                        *group.idle_count.get_or_insert(0) += 1;
                    }
                    _ => {
                        *group.occupied_count.get_or_insert(0) += 1;
                    }
                }
            }

            match compare_port(kind, ledger_port, exported_splitter.ports.get(port_name)) {
                Some(mismatch) => {
                    group.wrong_count += 1;
                    group.line_errors.push(LineError {
                        line: ledger_port.source_line,
                        kind: mismatch,
                    });
                }
                None => group.right_count += 1,
            }
        }
    }
}

/// First failing field in check order: name, status (port audit), next hop.
fn compare_port(kind: AuditKind, ledger: &Port, exported: Option<&Port>) -> Option<MismatchKind> {
    let exported = match exported {
        Some(p) if p.name == ledger.name => p,
        _ => return Some(MismatchKind::Name),
    };
    if kind == AuditKind::PortAudit && ledger.status != exported.status {
        return Some(MismatchKind::Status);
    }
    if ledger.next_hop != exported.next_hop {
        return Some(MismatchKind::NextHop);
    }
    None
}

/// Group verdicts in traversal order, for callers that want more than the
/// overall verdict.
pub fn group_verdicts(result: &DiffResult) -> Vec<crate::model::Verdict> {
    result.groups().map(classify_group).collect()
}
