//! Runs the coordinator binary itself

use std::fs;
use std::process::Command;

#[test]
fn test_rejected_amount_is_written_to_audit_log() {
    let dir = tempfile::tempdir().unwrap();
    let log_file = dir.path().join("coordinator.log");
    fs::write(&log_file, "earlier run\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_coordinator"))
        .arg(&log_file)
        .args(["0", "127.0.0.1", "9001", "alice", "127.0.0.1", "9002", "bob"])
        .output()
        .unwrap();

    assert!(!output.status.success());

    let log = fs::read_to_string(&log_file).unwrap();
    assert!(log.starts_with("earlier run\n"), "log was truncated:\n{log}");
    assert!(
        log.contains("Rejected transaction: Invalid transfer amount 0"),
        "missing rejection in:\n{log}"
    );
}
