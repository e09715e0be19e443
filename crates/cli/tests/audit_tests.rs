// End-to-end tests for `fiberaudit run | validate | preset`.
// Run with: cargo test -p fiberaudit-cli --test audit_tests

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fiberaudit() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_fiberaudit"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("FIBERAUDIT_CONFIG");
    cmd
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../recon/tests/fixtures")
        .join(name)
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn port_fixtures_exit_partial() {
    let out = fiberaudit()
        .arg("run")
        .arg("--ledger")
        .arg(fixture("port-ledger.csv"))
        .arg("--exported")
        .arg(fixture("port-export.csv"))
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(3), "stderr: {}", stderr(&out));
    let err = stderr(&out);
    assert!(err.contains("R1: 2 splitter(s), 5 port(s), 2 occupied, 1 idle [error]"), "{err}");
    assert!(err.contains("  line 5: port next-hop mismatch"), "{err}");
    assert!(err.contains("verdict: success"), "{err}");
    // Outcome exit codes carry no error line
    assert!(!err.contains("error: "), "{err}");
}

#[test]
fn json_report_on_stdout() {
    let out = fiberaudit()
        .arg("run")
        .arg("--ledger")
        .arg(fixture("port-ledger.csv"))
        .arg("--exported")
        .arg(fixture("port-export.csv"))
        .arg("--config")
        .arg(fixture("port-audit.toml"))
        .arg("--json")
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(3), "stderr: {}", stderr(&out));
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["meta"]["config_name"], "Splitter port audit");
    assert_eq!(json["verdict"], "success");
    assert_eq!(json["segments"][0]["room"], "R1");
    assert_eq!(json["segments"][1]["errors"][0], "line 11: port occupancy status mismatch");
}

#[test]
fn output_file_written() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("report.json");

    let out = fiberaudit()
        .arg("run")
        .arg("--ledger")
        .arg(fixture("link-ledger.csv"))
        .arg("--exported")
        .arg(fixture("link-export.csv"))
        .args(["--kind", "link", "--output"])
        .arg(&report)
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    assert!(out.stdout.is_empty());
    assert!(stderr(&out).contains("wrote "));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["meta"]["kind"], "link_audit");
    assert_eq!(json["verdict"], "perfect");
}

/// Two-sheet workbook in the preset port layout: ledger first, export second.
fn write_audit_workbook(path: &Path, export_next_hop: &str) {
    let mut wb = rust_xlsxwriter::Workbook::new();

    let ledger = wb.add_worksheet();
    ledger.set_name("ledger").unwrap();
    ledger.write_string(0, 0, "Splitter port ledger").unwrap();
    for (col, header) in [(2, "room"), (4, "splitter"), (5, "port"), (6, "status"), (7, "next_hop")] {
        ledger.write_string(1, col, header).unwrap();
    }
    for (row, port, status, next) in [(2, "P1", "在用", "D1"), (3, "P2", "在用", "D2")] {
        ledger.write_string(row, 2, "R1").unwrap();
        ledger.write_string(row, 4, "S1").unwrap();
        ledger.write_string(row, 5, port).unwrap();
        ledger.write_string(row, 6, status).unwrap();
        ledger.write_string(row, 7, next).unwrap();
    }

    let exported = wb.add_worksheet();
    exported.set_name("export").unwrap();
    for (col, header) in [(0, "room"), (1, "splitter"), (2, "port"), (4, "next_hop"), (13, "status")] {
        exported.write_string(0, col, header).unwrap();
    }
    for (row, port, next) in [(1, "P1", "D1"), (2, "P2", export_next_hop)] {
        exported.write_string(row, 0, "R1").unwrap();
        exported.write_string(row, 1, "S1").unwrap();
        exported.write_string(row, 2, port).unwrap();
        exported.write_string(row, 4, next).unwrap();
        exported.write_string(row, 13, "在用").unwrap();
    }

    wb.save(path).unwrap();
}

#[test]
fn workbook_mode_reads_both_sheets() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.xlsx");
    write_audit_workbook(&path, "D2");

    let out = fiberaudit()
        .arg("run")
        .arg("--workbook")
        .arg(&path)
        .arg("--json")
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["verdict"], "perfect");
    assert_eq!(json["meta"]["ledger_ports"], 2);
    assert_eq!(json["meta"]["exported_ports"], 2);
    assert_eq!(json["segments"][0]["right_ports"], 2);
}

#[test]
fn workbook_mode_reports_spreadsheet_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.xlsx");
    write_audit_workbook(&path, "D9");

    let out = fiberaudit()
        .arg("run")
        .arg("--workbook")
        .arg(&path)
        .arg("--json")
        .output()
        .unwrap();

    // One right, one wrong: verdict success
    assert_eq!(out.status.code(), Some(3), "stderr: {}", stderr(&out));
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["segments"][0]["errors"][0], "line 4: port next-hop mismatch");
}

#[test]
fn workbook_mode_rejects_csv() {
    let out = fiberaudit()
        .arg("run")
        .arg("--workbook")
        .arg(fixture("port-ledger.csv"))
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(7));
}

#[test]
fn unmatched_room_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("ledger.csv");
    std::fs::write(
        &ledger,
        "Ledger,,,,,,,\nno,area,room,site,splitter,port,status,next\n1,,R9,,S1,P1,在用,D1\n2,,R1,,S1,P1,在用,D1\n",
    )
    .unwrap();

    let out = fiberaudit()
        .arg("run")
        .arg("--ledger")
        .arg(&ledger)
        .arg("--exported")
        .arg(fixture("port-export.csv"))
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(5), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("R9 is invalid/unmatched"));
}

#[test]
fn empty_ledger_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = dir.path().join("ledger.csv");
    std::fs::write(&ledger, "Ledger,,\nno,room,port\n").unwrap();

    let out = fiberaudit()
        .arg("run")
        .arg("--ledger")
        .arg(&ledger)
        .arg("--exported")
        .arg(fixture("port-export.csv"))
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(8), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("hint:"));
}

#[test]
fn missing_file_exit_code() {
    let out = fiberaudit()
        .args(["run", "--ledger", "no-such-ledger.csv", "--exported"])
        .arg(fixture("port-export.csv"))
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(7));
    assert!(stderr(&out).starts_with("error: "));
}

#[test]
fn kind_conflicts_with_config() {
    let out = fiberaudit()
        .arg("run")
        .arg("--ledger")
        .arg(fixture("port-ledger.csv"))
        .arg("--exported")
        .arg(fixture("port-export.csv"))
        .arg("--config")
        .arg(fixture("port-audit.toml"))
        .args(["--kind", "link"])
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn ledger_without_export_is_usage_error() {
    let out = fiberaudit()
        .arg("run")
        .arg("--ledger")
        .arg(fixture("port-ledger.csv"))
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn preset_round_trips_through_validate() {
    let dir = tempfile::tempdir().unwrap();

    for kind in ["port", "link"] {
        let out = fiberaudit().args(["preset", kind]).output().unwrap();
        assert_eq!(out.status.code(), Some(0));

        let path = dir.path().join(format!("{kind}.toml"));
        std::fs::write(&path, &out.stdout).unwrap();

        let out = fiberaudit().arg("validate").arg(&path).output().unwrap();
        assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
        assert!(stderr(&out).starts_with("valid: "));
    }
}

#[test]
fn validate_rejects_bad_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    let text = std::fs::read_to_string(fixture("port-audit.toml"))
        .unwrap()
        .replace("room = \"C\"", "room = \"C3\"");
    std::fs::write(&path, text).unwrap();

    let out = fiberaudit().arg("validate").arg(&path).output().unwrap();
    assert_eq!(out.status.code(), Some(6));
    assert!(stderr(&out).starts_with("error: "));
}
