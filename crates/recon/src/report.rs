use crate::classify::classify_group;
use crate::model::{DiffEntry, DiffResult, ReportSegment};

/// One segment per diff entry, in traversal order.
pub fn format(result: &DiffResult) -> Vec<ReportSegment> {
    result
        .entries
        .iter()
        .map(|entry| match entry {
            DiffEntry::Group(g) => ReportSegment::Group {
                room: g.room.clone(),
                major: g.major.clone(),
                verdict: classify_group(g),
                splitter_count: g.splitter_count,
                total_ports: g.total_ports,
                occupied_ports: g.occupied_count,
                idle_ports: g.idle_count,
                right_ports: g.right_count,
                wrong_ports: g.wrong_count,
                errors: g.line_errors.iter().map(|e| e.to_string()).collect(),
            },
            DiffEntry::UnmatchedRoom { room } => ReportSegment::UnmatchedRoom {
                room: room.clone(),
                message: format!("{room} is invalid/unmatched"),
            },
        })
        .collect()
}
