//! End-to-end analysis through the library API

use super::fixtures::*;
use iscop::{
    core::{Analyzer, ComponentResolver, Engine},
    error::IscopError,
    models::{RuleFailurePolicy, Settings, Severity},
    Diagnostic, ProjectLoader,
};
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

fn settings() -> Settings {
    Settings {
        show_progress: false,
        ..Settings::default()
    }
}

fn ids(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(|d| d.rule_id.as_str()).collect()
}

#[test]
fn test_project_diagnostics_in_order() {
    let dir = tempdir().unwrap();
    let path = write_json(dir.path(), "warehouse.json", &project("Warehouse", UNGUARDED_MAIN));

    let project = ProjectLoader::open(&path).unwrap();
    let engine = Engine::new(&settings(), Arc::new(ComponentResolver::builtin())).unwrap();
    let diagnostics = engine.run(&project).collect_all().unwrap();

    assert_eq!(
        ids(&diagnostics),
        vec!["-1073450985", "BIDS0005", "BIDS0006", "BIDS0004", "IS0006", "IS1001"]
    );

    let validation = &diagnostics[0];
    assert_eq!(validation.severity, Severity::Error);
    assert_eq!(validation.package, "Extract");
    assert_eq!(validation.rule_name, None);
    assert_eq!(validation.line, None);

    let access_mode = &diagnostics[3];
    assert_eq!(access_mode.package, "Load");
    assert_eq!(access_mode.source.as_deref(), Some("DFT Load/OLE DB Source"));

    let script = &diagnostics[5];
    assert_eq!(script.rule_name.as_deref(), Some("MainShouldHandleErrors"));
    assert_eq!(script.source.as_deref(), Some("ST_Load (ST Main)"));
    assert_eq!(script.line, Some(3));
}

#[test]
fn test_guarded_script_is_clean() {
    let dir = tempdir().unwrap();
    let path = write_json(dir.path(), "warehouse.json", &project("Warehouse", GUARDED_MAIN));

    let project = ProjectLoader::open(&path).unwrap();
    let engine = Engine::new(&settings(), Arc::new(ComponentResolver::builtin())).unwrap();
    let diagnostics = engine.run(&project).collect_all().unwrap();

    assert!(!ids(&diagnostics).contains(&"IS1001"));
    assert_eq!(diagnostics.len(), 5);
}

#[test]
fn test_analyzer_over_directory() {
    let dir = tempdir().unwrap();
    write_json(dir.path(), "a_warehouse.json", &project("Warehouse", UNGUARDED_MAIN));
    write_json(dir.path(), "b_clean.json", &clean_project("Clean"));
    fs::write(dir.path().join("README.md"), "not a project").unwrap();

    let report = Analyzer::new(&settings())
        .unwrap()
        .analyze_path(dir.path(), |_| {})
        .unwrap();

    assert_eq!(report.projects, vec!["Warehouse", "Clean"]);
    assert_eq!(report.summary.total_packages, 3);
    assert_eq!(report.summary.errors, 1);
    assert_eq!(report.summary.warnings, 5);
    assert!(report.has_errors());
}

#[test]
fn test_package_filter_and_validation_toggle() {
    let dir = tempdir().unwrap();
    let path = write_json(dir.path(), "warehouse.json", &project("Warehouse", UNGUARDED_MAIN));

    let settings = Settings {
        package_filter: vec!["extract".to_string()],
        include_validation: false,
        ..settings()
    };
    let report = Analyzer::new(&settings).unwrap().analyze_path(&path, |_| {}).unwrap();

    assert_eq!(ids(&report.diagnostics), vec!["BIDS0005", "BIDS0006"]);
    assert_eq!(report.summary.total_packages, 1);
    assert!(!report.has_errors());
}

#[test]
fn test_custom_patterns_file() {
    let dir = tempdir().unwrap();
    let patterns = dir.path().join("patterns.toml");
    fs::write(
        &patterns,
        r#"
            [[entry_point]]
            pattern = "Log\\.Error\\("
            description = "Log.Error(...)"

            [[public_method]]
            pattern = "Log\\.Warn\\("
            description = "Log.Warn(...)"
        "#,
    )
    .unwrap();
    let path = write_json(dir.path(), "warehouse.json", &project("Warehouse", GUARDED_MAIN));

    let settings = Settings {
        pattern_file: Some(patterns),
        ..settings()
    };
    let report = Analyzer::new(&settings).unwrap().analyze_path(&path, |_| {}).unwrap();

    let script = report
        .diagnostics
        .iter()
        .find(|d| d.rule_id == "IS1001")
        .expect("catch block lacks Log.Error");
    assert!(script.message.contains("Log.Error(...)"));
}

#[test]
fn test_configuration_errors_fail_before_analysis() {
    let dir = tempdir().unwrap();
    let patterns = dir.path().join("patterns.toml");
    fs::write(
        &patterns,
        "[[entry_point]]\npattern = \"(unclosed\"\ndescription = \"bad\"\n",
    )
    .unwrap();

    let settings = Settings {
        pattern_file: Some(patterns),
        ..settings()
    };
    assert!(matches!(
        Analyzer::new(&settings),
        Err(IscopError::InvalidPattern { .. })
    ));
}

#[test]
fn test_missing_project_is_critical() {
    let dir = tempdir().unwrap();
    let result = Analyzer::new(&settings())
        .unwrap()
        .analyze_path(&dir.path().join("missing.json"), |_| {});

    let err = result.unwrap_err();
    assert!(matches!(err, IscopError::ProjectNotFound { .. }));
    assert!(err.is_critical());
}

#[test]
fn test_skip_policy_is_configurable() {
    let settings = Settings {
        rule_failure_policy: RuleFailurePolicy::Skip,
        ..settings()
    };
    let dir = tempdir().unwrap();
    let path = write_json(dir.path(), "clean.json", &clean_project("Clean"));

    let report = Analyzer::new(&settings).unwrap().analyze_path(&path, |_| {}).unwrap();
    assert!(report.diagnostics.is_empty());
    assert_eq!(report.summary.total_projects, 1);
}
