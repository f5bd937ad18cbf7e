//! Output formatting functionality
//!
//! This module provides formatters for different output formats.

use crate::error::{IscopError, Result};
use crate::models::{AnalysisReport, Diagnostic, Severity};
use ansi_term::Colour::{Blue, Red, Yellow};
use ansi_term::Style;

/// Severity tag, coloured when requested
fn severity_tag(severity: Severity, use_colors: bool) -> String {
    if !use_colors {
        return severity.tag().to_string();
    }
    match severity {
        Severity::Error => Red.bold().paint(severity.tag()).to_string(),
        Severity::Warning => Yellow.paint(severity.tag()).to_string(),
        Severity::Information => Blue.paint(severity.tag()).to_string(),
    }
}

/// One diagnostic as a tab-separated line
pub fn format_diagnostic_text(diagnostic: &Diagnostic, use_colors: bool) -> String {
    let line = diagnostic.to_tab_separated();
    if !use_colors {
        return line;
    }
    // the tag is always the first field
    match line.split_once('\t') {
        Some((_, rest)) => format!("{}\t{}", severity_tag(diagnostic.severity, true), rest),
        None => line,
    }
}

/// Summary block printed after the diagnostic lines
pub fn format_summary_text(report: &AnalysisReport, use_colors: bool, verbose: bool) -> String {
    let summary = &report.summary;
    let mut output = String::new();

    let header = format!(
        "{} diagnostics in {} packages of {} projects",
        summary.total(),
        summary.total_packages,
        summary.total_projects
    );
    if use_colors {
        output.push_str(&format!("{}\n", Style::new().bold().paint(header)));
    } else {
        output.push_str(&format!("{}\n", header));
    }

    let counts = [
        (Severity::Error, summary.errors),
        (Severity::Warning, summary.warnings),
        (Severity::Information, summary.information),
    ];
    for (severity, count) in counts {
        output.push_str(&format!("  {}: {}\n", severity_tag(severity, use_colors), count));
    }

    if verbose {
        if !summary.by_rule.is_empty() {
            output.push_str("\nBy rule:\n");
            for (rule, count) in &summary.by_rule {
                output.push_str(&format!("  {}: {}\n", rule, count));
            }
        }
        output.push_str(&format!("\nDuration: {:.2?}\n", summary.duration));
    }

    output
}

/// Diagnostic lines followed, unless quiet, by the summary
pub fn format_report_text(
    report: &AnalysisReport,
    use_colors: bool,
    verbose: bool,
    quiet: bool,
) -> String {
    let mut output = String::new();
    for diagnostic in &report.diagnostics {
        output.push_str(&format_diagnostic_text(diagnostic, use_colors));
        output.push('\n');
    }

    if !quiet {
        if !report.diagnostics.is_empty() {
            output.push('\n');
        }
        output.push_str(&format_summary_text(report, use_colors, verbose));
    }
    output
}

/// Format the whole report as JSON
pub fn format_report_json(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| IscopError::JsonSerialize { source: e })
}

/// Format the diagnostics as CSV, one row per diagnostic
pub fn format_report_csv(report: &AnalysisReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);

    writer.write_record([
        "Severity", "Package", "Rule Id", "Rule Name", "Message", "Source", "Line",
    ])?;

    for diagnostic in &report.diagnostics {
        let line = diagnostic.line.map(|line| line.to_string()).unwrap_or_default();
        writer.write_record([
            diagnostic.severity.to_string().as_str(),
            diagnostic.package.as_str(),
            diagnostic.rule_id.as_str(),
            diagnostic.rule_name.as_deref().unwrap_or(""),
            diagnostic.single_line_message().as_str(),
            diagnostic.source.as_deref().unwrap_or(""),
            line.as_str(),
        ])?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| IscopError::io_error(e.into_error()))?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}
