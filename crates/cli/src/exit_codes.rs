//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Domain    | Description                                        |
//! |------|-----------|----------------------------------------------------|
//! | 0    | Universal | Success / every group perfect                      |
//! | 1    | Universal | General error (unspecified)                        |
//! | 2    | Universal | CLI usage error (bad args, missing file)           |
//! | 3-5  | audit     | Comparison outcome (partial, error, unmatched room)|
//! | 6-8  | audit     | Could not compare (config, sheet, empty ledger)    |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use fiberaudit_recon::{Report, ReportSegment, Verdict};

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed, audit verdict perfect.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, conflicting options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Audit outcome (3-5)
// =============================================================================

/// Overall verdict Success: some ports wrong, but no more wrong than right.
pub const EXIT_AUDIT_PARTIAL: u8 = 3;

/// Overall verdict Error: more ports wrong than right.
pub const EXIT_AUDIT_ERROR: u8 = 4;

/// A ledger room has no counterpart in the export; comparison stopped there.
pub const EXIT_AUDIT_UNMATCHED_ROOM: u8 = 5;

// =============================================================================
// Audit setup (6-8)
// =============================================================================

/// Config file could not be parsed or failed validation.
pub const EXIT_AUDIT_INVALID_CONFIG: u8 = 6;

/// Ledger or export file could not be read or decoded.
pub const EXIT_AUDIT_SHEET: u8 = 7;

/// Ledger sheet has no rows at or after the configured start row.
pub const EXIT_AUDIT_EMPTY_LEDGER: u8 = 8;

/// Exit code for a finished audit. An unmatched room outranks the verdict,
/// since the verdict only reflects the rooms compared before it.
pub fn report_exit_code(report: &Report) -> u8 {
    let unmatched = report
        .segments
        .iter()
        .any(|s| matches!(s, ReportSegment::UnmatchedRoom { .. }));
    if unmatched {
        return EXIT_AUDIT_UNMATCHED_ROOM;
    }
    match report.verdict {
        Verdict::Perfect => EXIT_SUCCESS,
        Verdict::Success => EXIT_AUDIT_PARTIAL,
        Verdict::Error => EXIT_AUDIT_ERROR,
    }
}
