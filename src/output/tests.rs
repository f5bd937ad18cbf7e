//! Tests for output formatting

#[cfg(test)]
mod tests {
    use crate::core::parallel::ProgressUpdate;
    use crate::models::config::OutputFormat;
    use crate::models::{AnalysisReport, Diagnostic, Severity};
    use crate::output::{
        create_formatter, create_progress_callback, create_writer, format_diagnostic_text,
        CsvFormatter, FileWriter, Formatter, JsonFormatter, OutputWriter, ProgressReporter,
        TextFormatter,
    };
    use std::fs;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::tempdir;

    fn create_test_report() -> AnalysisReport {
        let mut report = AnalysisReport::new();
        report.add_project("Warehouse", 2);
        report.extend(vec![
            Diagnostic {
                severity: Severity::Error,
                package: "Extract".to_string(),
                rule_id: "-1073450985".to_string(),
                rule_name: None,
                message: "Connection manager\r\nnot found".to_string(),
                source: Some("Extract".to_string()),
                line: None,
            },
            Diagnostic::new(
                Severity::Warning,
                "Load",
                "IS1001",
                "MainShouldHandleErrors",
                "The method ScriptMain.Main must handle errors in a try/catch block.",
            )
            .with_source("ST_1 (Script Task)")
            .with_line(12),
        ]);
        report.set_duration(Duration::from_millis(1500));
        report
    }

    #[test]
    fn test_text_formatter() {
        let report = create_test_report();

        let output = TextFormatter::new(false, false, false).format(&report).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "ERRO\tExtract\t-1073450985\t\tConnection managernot found\tExtract\t");
        assert_eq!(
            lines[1],
            "WARN\tLoad\tIS1001\tMainShouldHandleErrors\tThe method ScriptMain.Main must handle errors in a try/catch block.\tST_1 (Script Task)\t12"
        );
        assert!(output.contains("2 diagnostics in 2 packages of 1 projects"));
        assert!(output.contains("ERRO: 1"));
        assert!(!output.contains("By rule:"));

        let verbose = TextFormatter::new(false, true, false).format(&report).unwrap();
        assert!(verbose.contains("By rule:"));
        assert!(verbose.contains("IS1001: 1"));

        let quiet = TextFormatter::new(false, false, true).format(&report).unwrap();
        assert_eq!(quiet.lines().count(), 2);
    }

    #[test]
    fn test_colored_text_keeps_fields() {
        let report = create_test_report();
        let line = format_diagnostic_text(&report.diagnostics[1], true);
        assert!(line.contains("\u{1b}["));
        assert!(line.ends_with(
            "\tLoad\tIS1001\tMainShouldHandleErrors\tThe method ScriptMain.Main must handle errors in a try/catch block.\tST_1 (Script Task)\t12"
        ));
    }

    #[test]
    fn test_json_formatter() {
        let report = create_test_report();
        let output = JsonFormatter.format(&report).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["projects"][0], "Warehouse");
        assert_eq!(parsed["summary"]["errors"], 1);
        assert_eq!(parsed["summary"]["warnings"], 1);
        assert_eq!(parsed["diagnostics"][1]["rule_id"], "IS1001");
        assert_eq!(parsed["diagnostics"][1]["line"], 12);
        assert!(parsed["diagnostics"][0]["line"].is_null());
        assert!(parsed["generated_at"].is_string());
    }

    #[test]
    fn test_csv_formatter() {
        let report = create_test_report();
        let output = CsvFormatter.format(&report).unwrap();

        let mut reader = csv::Reader::from_reader(output.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.get(2), Some("Rule Id"));

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(0), Some("error"));
        assert_eq!(rows[0].get(4), Some("Connection managernot found"));
        assert_eq!(rows[1].get(5), Some("ST_1 (Script Task)"));
        assert_eq!(rows[1].get(6), Some("12"));
    }

    #[test]
    fn test_create_formatter() {
        let report = create_test_report();
        let json = create_formatter(OutputFormat::Json, true, false, false)
            .format(&report)
            .unwrap();
        assert!(json.trim_start().starts_with('{'));

        let text = create_formatter(OutputFormat::Text, false, false, true)
            .format(&report)
            .unwrap();
        assert!(text.starts_with("ERRO\t"));
    }

    #[test]
    fn test_file_writer() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");

        FileWriter::new(&path).write("WARN\tLoad\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "WARN\tLoad\n");

        create_writer(Some(&path)).write("replaced").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "replaced");

        let missing = FileWriter::new(dir.path().join("missing").join("report.txt"));
        assert!(missing.write("x").is_err());
    }

    #[test]
    fn test_progress_reporter() {
        let reporter = Arc::new(ProgressReporter::new(true, false));
        reporter.start("Analysing");
        let callback = create_progress_callback(reporter.clone());
        callback(ProgressUpdate::new(3, 10, "Load"));
        assert_eq!(reporter.position(), Some(3));
        reporter.finish("done");

        let hidden = ProgressReporter::hidden();
        assert!(!hidden.is_enabled());
        hidden.update(1, 2, "Extract");
        assert_eq!(hidden.position(), None);
    }
}
