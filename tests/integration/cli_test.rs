//! Runs the `iscop` binary and checks its output and exit codes

use super::fixtures::*;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

/// Run the binary inside `dir`, isolated from any user configuration
fn iscop(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_iscop"))
        .args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run iscop")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_error_diagnostics_exit_with_one() {
    let dir = tempdir().unwrap();
    write_json(dir.path(), "warehouse.json", &project("Warehouse", UNGUARDED_MAIN));

    let output = iscop(
        dir.path(),
        &["--project", "warehouse.json", "--no-progress", "--no-colors", "--quiet"],
    );
    assert_eq!(output.status.code(), Some(1));

    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with("ERRO\tExtract\t-1073450985\t\t"));
    assert!(lines[5].starts_with("WARN\tLoad\tIS1001\tMainShouldHandleErrors\t"));
    assert!(lines[5].ends_with("\tST_Load (ST Main)\t3"));
}

#[test]
fn test_warnings_only_exit_with_zero() {
    let dir = tempdir().unwrap();
    write_json(dir.path(), "warehouse.json", &project("Warehouse", GUARDED_MAIN));

    let output = iscop(
        dir.path(),
        &["--project", "warehouse.json", "--no-progress", "--no-validation", "--no-colors"],
    );
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("4 diagnostics in 2 packages of 1 projects"));
}

#[test]
fn test_run_failure_exits_with_two() {
    let dir = tempdir().unwrap();

    let output = iscop(dir.path(), &["--project", "missing.json", "--no-progress"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.json"));

    let output = iscop(dir.path(), &["--patterns", "nope.toml", "--no-progress"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_json_output_file() {
    let dir = tempdir().unwrap();
    write_json(dir.path(), "warehouse.json", &project("Warehouse", UNGUARDED_MAIN));

    let output = iscop(
        dir.path(),
        &["--output", "json", "--output-file", "report.json", "--no-progress", "--quiet"],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("report.json")).unwrap()).unwrap();
    assert_eq!(report["projects"][0], "Warehouse");
    assert_eq!(report["diagnostics"].as_array().unwrap().len(), 6);
    assert_eq!(report["summary"]["errors"], 1);
}

#[test]
fn test_config_file_layer() {
    let dir = tempdir().unwrap();
    write_json(dir.path(), "warehouse.json", &project("Warehouse", UNGUARDED_MAIN));
    fs::write(
        dir.path().join(".iscop.toml"),
        "package_filter = [\"Load\"]\ninclude_validation = false\nshow_progress = false\n",
    )
    .unwrap();

    let output = iscop(dir.path(), &["--quiet", "--no-colors"]);
    let text = stdout(&output);
    assert_eq!(output.status.code(), Some(0));
    assert!(text.lines().all(|line| line.contains("\tLoad\t")));
    assert_eq!(text.lines().count(), 3);

    // flags win over the file
    let output = iscop(dir.path(), &["--quiet", "--no-colors", "--package", "Extract"]);
    assert_eq!(stdout(&output).lines().count(), 2);
}

#[test]
fn test_list_rules() {
    let dir = tempdir().unwrap();
    let output = iscop(dir.path(), &["--list-rules"]);
    assert_eq!(output.status.code(), Some(0));

    let text = stdout(&output);
    let ids: Vec<&str> = text.lines().filter_map(|line| line.split('\t').next()).collect();
    assert_eq!(
        ids,
        vec![
            "BIDS0001", "BIDS0002", "BIDS0003", "BIDS0004", "BIDS0005", "BIDS0006", "IS0006",
            "IS0101", "IS0102", "IS0108", "SSIS0001", "SSIS0002", "SSIS0004"
        ]
    );
}

#[test]
fn test_init_writes_config() {
    let dir = tempdir().unwrap();
    let output = iscop(dir.path(), &["--init"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(dir.path().join(".iscop.toml").is_file());

    // the generated file is picked up and parses
    write_json(dir.path(), "clean.json", &clean_project("Clean"));
    let output = iscop(dir.path(), &["--no-progress", "--quiet"]);
    assert_eq!(output.status.code(), Some(0));

    let output = iscop(dir.path(), &["--init"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("already exists"));
}
