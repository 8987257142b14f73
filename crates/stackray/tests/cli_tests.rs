//! CLI integration tests for stackray.

use std::process::{Command, Output};

/// Runs stackray with the given arguments from the crate root.
fn run_stackray(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stackray"))
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("failed to execute stackray")
}

const FIXTURE: &str = "tests/fixtures/calling_convention_chk.lst";

#[test]
fn test_help() {
    let output = run_stackray(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("disassembly listing"));
    assert!(stdout.contains("--verbose"));
}

#[test]
fn test_recovers_parameters_from_fixture() {
    let output = run_stackray(&[FIXTURE, "four_chars_int"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Function name: four_chars_int"));
    assert!(stdout.contains("Function address: 0x401136"));
    assert!(stdout.contains("Function parameters: BYTE,BYTE,BYTE,BYTE,DWORD"));
    assert!(stdout.contains("Content:\n  401136:"));
}

#[test]
fn test_function_with_no_stack_parameters() {
    let output = run_stackray(&[FIXTURE, "helper"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Function parameters: \n"));
}

#[test]
fn test_missing_function_fails() {
    let output = run_stackray(&[FIXTURE, "no_such_function"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no_such_function"));
}
