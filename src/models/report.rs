//! Aggregated results of an analysis run

use super::diagnostic::{Diagnostic, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Everything a run produced, in output order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub projects: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
    pub summary: ReportSummary,
}

impl AnalysisReport {
    /// Create a new empty report stamped with the current time
    pub fn new() -> Self {
        Self {
            generated_at: Utc::now(),
            projects: Vec::new(),
            diagnostics: Vec::new(),
            summary: ReportSummary::default(),
        }
    }

    pub fn add_project(&mut self, name: impl Into<String>, packages: usize) {
        self.projects.push(name.into());
        self.summary.total_projects += 1;
        self.summary.total_packages += packages;
    }

    /// Add a diagnostic and update the summary counts
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.summary.errors += 1,
            Severity::Warning => self.summary.warnings += 1,
            Severity::Information => self.summary.information += 1,
        }
        *self
            .summary
            .by_rule
            .entry(diagnostic.rule_id.clone())
            .or_insert(0) += 1;
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.add_diagnostic(diagnostic);
        }
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.summary.duration = duration;
    }

    /// True when any Error-severity diagnostic was emitted
    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }
}

impl Default for AnalysisReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary statistics of a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_projects: usize,
    pub total_packages: usize,
    pub errors: usize,
    pub warnings: usize,
    pub information: usize,
    /// Diagnostic count per rule id
    pub by_rule: BTreeMap<String, usize>,
    pub duration: Duration,
}

impl ReportSummary {
    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.information
    }
}
