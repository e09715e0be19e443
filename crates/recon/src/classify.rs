use crate::model::{DiffEntry, GroupDiff, Verdict};

/// Verdict for a single group.
///
/// Every port right → Perfect. Otherwise more wrong than right → Error,
/// else Success.
pub fn classify_group(group: &GroupDiff) -> Verdict {
    if group.right_count == group.total_ports {
        Verdict::Perfect
    } else if group.wrong_count > group.right_count {
        Verdict::Error
    } else {
        Verdict::Success
    }
}

/// Overall verdict of a diff: the verdict of the last group processed.
///
/// This is not an aggregate across groups. An earlier room full of errors
/// is masked by a later perfect room; callers that need the worst case
/// should inspect the per-group verdicts. With no group processed the
/// verdict is Success.
pub fn overall_verdict(entries: &[DiffEntry]) -> Verdict {
    entries
        .iter()
        .rev()
        .find_map(|e| match e {
            DiffEntry::Group(g) => Some(classify_group(g)),
            DiffEntry::UnmatchedRoom { .. } => None,
        })
        .unwrap_or(Verdict::Success)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(total: usize, right: usize, wrong: usize) -> GroupDiff {
        GroupDiff {
            room: "R".into(),
            major: None,
            splitter_count: 1,
            total_ports: total,
            occupied_count: None,
            idle_count: None,
            right_count: right,
            wrong_count: wrong,
            line_errors: Vec::new(),
        }
    }

    #[test]
    fn perfect_when_all_right() {
        assert_eq!(classify_group(&group(3, 3, 0)), Verdict::Perfect);
        // An empty group has nothing wrong.
        assert_eq!(classify_group(&group(0, 0, 0)), Verdict::Perfect);
    }

    #[test]
    fn error_when_wrong_exceeds_right() {
        assert_eq!(classify_group(&group(3, 1, 2)), Verdict::Error);
        assert_eq!(classify_group(&group(1, 0, 1)), Verdict::Error);
    }

    #[test]
    fn success_on_tie_or_mostly_right() {
        assert_eq!(classify_group(&group(2, 1, 1)), Verdict::Success);
        assert_eq!(classify_group(&group(5, 4, 1)), Verdict::Success);
    }

    #[test]
    fn overall_is_last_group_not_worst() {
        let entries = vec![
            DiffEntry::Group(group(3, 0, 3)),
            DiffEntry::Group(group(3, 3, 0)),
        ];
        assert_eq!(overall_verdict(&entries), Verdict::Perfect);
    }

    #[test]
    fn overall_skips_trailing_unmatched_room() {
        let entries = vec![
            DiffEntry::Group(group(3, 0, 3)),
            DiffEntry::UnmatchedRoom { room: "R9".into() },
        ];
        assert_eq!(overall_verdict(&entries), Verdict::Error);
        assert_eq!(overall_verdict(&[]), Verdict::Success);
    }
}
